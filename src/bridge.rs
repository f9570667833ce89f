//! The public entry point: send a command, get a result or exactly one error.

use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use crate::binding::BindingHandle;
use crate::command::ops::LogsRequest;
use crate::command::{Command, RawCommand, Request};
use crate::error::{BridgeError, Result};
use crate::protocol;

/// Dispatcher and home directory accessor over one resolved handle.
/// Clones share the handle; calls share nothing else.
#[derive(Debug, Clone)]
pub struct Bridge {
    handle: Arc<BindingHandle>,
}

impl Bridge {
    pub fn new(handle: Arc<BindingHandle>) -> Self {
        Self { handle }
    }

    /// Encode, send, decode, and sort the response into success or one error.
    /// `res` comes back exactly as the engine sent it.
    pub async fn execute(&self, command: &Command) -> Result<Value> {
        let binding = self.handle.binding()?;
        let request = protocol::encode(command)?;

        tracing::debug!(cmd = command.name(), "dispatching command");
        let response = binding.execute(&request).await?;

        let result = protocol::decode(&response)?.into_result();
        match &result {
            Err(BridgeError::Panic { cmd, msg }) => {
                tracing::warn!(cmd = command.name(), engine_cmd = %cmd, "engine panicked: {msg}");
            }
            Err(e) => tracing::debug!(cmd = command.name(), "command failed: {e}"),
            Ok(_) => tracing::debug!(cmd = command.name(), "command succeeded"),
        }
        result
    }

    /// Validate a free-form command, then execute it.
    pub async fn execute_raw(&self, raw: RawCommand) -> Result<Value> {
        let command = Command::try_from(raw)?;
        self.execute(&command).await
    }

    /// Execute a typed request and decode the result into its output type.
    pub async fn call<R: Request>(&self, request: R) -> Result<R::Output> {
        let command: Command = request.into();
        let res = self.execute(&command).await?;
        typed(command.name(), res)
    }

    /// Dispatch every command at once and wait for all of them.
    /// Results line up with `commands`, whatever order they finished in.
    pub async fn execute_all(&self, commands: &[Command]) -> Vec<Result<Value>> {
        join_all(commands.iter().map(|command| self.execute(command))).await
    }

    pub async fn logs(&self) -> Result<Vec<String>> {
        self.call(LogsRequest).await
    }

    /// Straight passthrough; the engine answers with a plain path.
    pub async fn home_dir(&self) -> Result<PathBuf> {
        self.handle.binding()?.home_dir().await
    }
}

/// The engine may hand its payload back as JSON text inside a string.
fn typed<T: DeserializeOwned>(cmd: &str, res: Value) -> Result<T> {
    let nested = match &res {
        Value::String(text) => Some(text.clone()),
        _ => None,
    };
    match serde_json::from_value(res) {
        Ok(value) => Ok(value),
        Err(source) => match nested.and_then(|text| serde_json::from_str(&text).ok()) {
            Some(value) => Ok(value),
            None => Err(BridgeError::UnexpectedResult {
                cmd: cmd.to_string(),
                source,
            }),
        },
    }
}
