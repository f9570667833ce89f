//! Every way a call across the bridge can fail.

use crate::consts::LINKING_ERROR;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// No transport path to the engine was resolved.
    #[error("{}", LINKING_ERROR)]
    Linking,

    /// The engine hit an unrecoverable fault while running `cmd`.
    #[error("engine panic in command '{cmd}': {msg}")]
    Panic { cmd: String, msg: String },

    /// The engine rejected the call with a domain error.
    #[error("engine error: {message}")]
    Execution { message: String },

    #[error("malformed response from engine: {0}")]
    Decode(#[source] serde_json::Error),

    /// The response parsed but breaks the result invariant.
    #[error("protocol violation: {reason}")]
    Protocol { reason: String },

    #[error("failed to encode command: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("unknown command: '{cmd}'")]
    UnknownCommand { cmd: String },

    #[error("invalid params for command '{cmd}': {source}")]
    InvalidParams {
        cmd: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("result of command '{cmd}' has an unexpected shape: {source}")]
    UnexpectedResult {
        cmd: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("transport failure: {reason}")]
    Transport { reason: String },
}

impl BridgeError {
    /// Linking and protocol faults mean the bridge itself is broken, not the call.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BridgeError::Linking | BridgeError::Decode(_) | BridgeError::Protocol { .. }
        )
    }
}
