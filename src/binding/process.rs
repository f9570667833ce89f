use async_trait::async_trait;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::Binding;
use crate::consts::HOME_DIR_FLAG;
use crate::error::{BridgeError, Result};

/// Reaches an engine that lives in its own executable.
///
/// Each call spawns the program, writes the request to stdin and reads the
/// response from stdout, so concurrent calls never share a pipe.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessBinding {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessBinding {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, e: std::io::Error) -> BridgeError {
        BridgeError::Transport {
            reason: format!("failed to start {}: {}", self.program.display(), e),
        }
    }

    fn stdout(&self, output: Output) -> Result<String> {
        if !output.status.success() {
            return Err(BridgeError::Transport {
                reason: format!(
                    "{} exited with code {}: {}",
                    self.program.display(),
                    output.status.code().unwrap_or(-1),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        String::from_utf8(output.stdout).map_err(|e| BridgeError::Transport {
            reason: format!("engine wrote invalid UTF-8: {}", e),
        })
    }
}

#[async_trait]
impl Binding for ProcessBinding {
    async fn execute(&self, request: &str) -> Result<String> {
        let mut child = self
            .command()
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Feed stdin while draining stdout/stderr, or a chatty engine fills
        // its pipes and both sides block.
        let stdin = child.stdin.take();
        let send = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            stdin.write_all(request.as_bytes()).await?;
            stdin.shutdown().await
        };
        let (written, output) = tokio::join!(send, child.wait_with_output());

        let output = output.map_err(|e| self.spawn_error(e))?;
        // A closed pipe means the engine quit early; its exit status says why.
        if let Err(e) = written
            && e.kind() != std::io::ErrorKind::BrokenPipe
        {
            return Err(BridgeError::Transport {
                reason: format!("failed to send request: {}", e),
            });
        }
        self.stdout(output)
    }

    async fn home_dir(&self) -> Result<PathBuf> {
        let output = self
            .command()
            .arg(HOME_DIR_FLAG)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;
        let path = self.stdout(output)?;
        let path = path.trim();
        if path.is_empty() {
            return Err(BridgeError::Transport {
                reason: format!("{} reported no home directory", self.program.display()),
            });
        }
        Ok(PathBuf::from(path))
    }
}
