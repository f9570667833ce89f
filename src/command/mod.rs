//! Commands the bridge can send to the engine.
//!
//! [`Command`] is a closed set: every variant carries a typed parameter
//! struct, and anything the engine does not know is rejected here, before
//! a single byte crosses the boundary. [`RawCommand`] is the loose
//! `{cmd, params}` form used for free-form input.

pub mod ops;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, Result};
use ops::{FibonacciInput, FindPrimesInput, HashDataInput, SortNumbersInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params", rename_all = "snake_case")]
pub enum Command {
    /// Drain the engine's buffered log lines.
    Logs,
    Fibonacci(FibonacciInput),
    HashData(HashDataInput),
    SortNumbers(SortNumbersInput),
    FindPrimes(FindPrimesInput),
}

impl Command {
    /// Wire identifiers of every known command.
    pub const NAMES: &'static [&'static str] = &[
        "logs",
        "fibonacci",
        "hash_data",
        "sort_numbers",
        "find_primes",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Logs => "logs",
            Command::Fibonacci(_) => "fibonacci",
            Command::HashData(_) => "hash_data",
            Command::SortNumbers(_) => "sort_numbers",
            Command::FindPrimes(_) => "find_primes",
        }
    }
}

/// A typed request: knows which command it becomes and what comes back.
pub trait Request: Into<Command> {
    type Output: DeserializeOwned;
}

/// Untyped `{cmd, params}` pair, as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCommand {
    pub cmd: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RawCommand {
    pub fn new(cmd: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            cmd: cmd.into(),
            params,
        }
    }
}

impl TryFrom<RawCommand> for Command {
    type Error = BridgeError;

    fn try_from(raw: RawCommand) -> Result<Self> {
        if !Command::NAMES.contains(&raw.cmd.as_str()) {
            return Err(BridgeError::UnknownCommand { cmd: raw.cmd });
        }

        let mut wire = serde_json::Map::new();
        wire.insert("cmd".to_string(), Value::String(raw.cmd.clone()));
        if let Some(params) = raw.params
            && !params.is_null()
        {
            wire.insert("params".to_string(), params);
        }

        serde_json::from_value(Value::Object(wire)).map_err(|source| BridgeError::InvalidParams {
            cmd: raw.cmd,
            source,
        })
    }
}

impl From<&Command> for RawCommand {
    fn from(command: &Command) -> Self {
        let params = match command {
            Command::Logs => None,
            Command::Fibonacci(p) => serde_json::to_value(p).ok(),
            Command::HashData(p) => serde_json::to_value(p).ok(),
            Command::SortNumbers(p) => serde_json::to_value(p).ok(),
            Command::FindPrimes(p) => serde_json::to_value(p).ok(),
        };
        RawCommand::new(command.name(), params)
    }
}
