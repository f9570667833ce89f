use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use super::Binding;
use crate::command::RawCommand;
use crate::error::{BridgeError, Result};

/// A scripted engine for tests. Answers by command name and remembers
/// every request it saw.
pub struct ScriptedBinding {
    responses: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    echo: bool,
    home: PathBuf,
    requests: Mutex<Vec<String>>,
}

impl Default for ScriptedBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedBinding {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            delays: HashMap::new(),
            echo: false,
            home: PathBuf::from("/mock/home"),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer `cmd` with this exact response text.
    pub fn respond(mut self, cmd: &str, response: impl Into<String>) -> Self {
        self.responses.insert(cmd.to_string(), response.into());
        self
    }

    /// Hold the answer to `cmd` back for a while.
    pub fn delay(mut self, cmd: &str, delay: Duration) -> Self {
        self.delays.insert(cmd.to_string(), delay);
        self
    }

    /// Unscripted commands succeed with their own params as the result.
    pub fn echo(mut self) -> Self {
        self.echo = true;
        self
    }

    pub fn home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = home.into();
        self
    }

    /// Every request text received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Binding for ScriptedBinding {
    async fn execute(&self, request: &str) -> Result<String> {
        self.requests.lock().unwrap().push(request.to_string());

        let raw: RawCommand = serde_json::from_str(request).map_err(|e| BridgeError::Transport {
            reason: format!("ScriptedBinding: unreadable request: {}", e),
        })?;

        if let Some(delay) = self.delays.get(&raw.cmd) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(response) = self.responses.get(&raw.cmd) {
            return Ok(response.clone());
        }
        if self.echo {
            let res = raw.params.unwrap_or(Value::Null);
            return Ok(json!({ "res": res, "panic": false }).to_string());
        }
        Err(BridgeError::Transport {
            reason: format!("ScriptedBinding: no response for '{}'", raw.cmd),
        })
    }

    async fn home_dir(&self) -> Result<PathBuf> {
        Ok(self.home.clone())
    }
}
