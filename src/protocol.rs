//! Transport text: how commands go out and results come back.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::command::Command;
use crate::error::{BridgeError, Result};

/// What the engine reports about a fault it could not recover from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanicDetails {
    pub cmd: String,
    pub msg: String,
}

/// A response exactly as the engine sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    /// `Some(Value::Null)` when the key is present with `null`.
    #[serde(default, deserialize_with = "present")]
    pub res: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    pub panic: bool,
    #[serde(default)]
    pub panic_details: Option<PanicDetails>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A response that satisfied the result invariant.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    Error(String),
    Panic(PanicDetails),
}

impl CommandResult {
    /// Check the invariant and collapse into a single outcome.
    ///
    /// A panic wins over anything else in the response. The engine writes
    /// absent fields as `null`, so a `null` result next to an error is
    /// treated as absent.
    pub fn into_outcome(self) -> Result<Outcome> {
        if self.panic {
            return match self.panic_details {
                Some(details) => Ok(Outcome::Panic(details)),
                None => Err(BridgeError::Protocol {
                    reason: "panic reported without panic_details".to_string(),
                }),
            };
        }

        match (self.error, self.res) {
            (Some(message), None | Some(Value::Null)) => Ok(Outcome::Error(message)),
            (Some(_), Some(_)) => Err(BridgeError::Protocol {
                reason: "response carries both an error and a result".to_string(),
            }),
            (None, Some(res)) => Ok(Outcome::Success(res)),
            (None, None) => Err(BridgeError::Protocol {
                reason: "response carries neither an error nor a result".to_string(),
            }),
        }
    }

    /// Turn the outcome into the caller-facing result.
    pub fn into_result(self) -> Result<Value> {
        match self.into_outcome()? {
            Outcome::Success(res) => Ok(res),
            Outcome::Error(message) => Err(BridgeError::Execution { message }),
            Outcome::Panic(PanicDetails { cmd, msg }) => Err(BridgeError::Panic { cmd, msg }),
        }
    }
}

pub fn encode(command: &Command) -> Result<String> {
    serde_json::to_string(command).map_err(BridgeError::Encode)
}

pub fn decode(text: &str) -> Result<CommandResult> {
    serde_json::from_str(text).map_err(BridgeError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome(text: &str) -> Result<Outcome> {
        decode(text)?.into_outcome()
    }

    #[test]
    fn success_payload_is_untouched() {
        let res = outcome(r#"{"res":{"result":55},"panic":false}"#).unwrap();
        assert_eq!(res, Outcome::Success(json!({"result": 55})));
    }

    #[test]
    fn null_result_counts_as_present() {
        let res = outcome(r#"{"res":null,"panic":false}"#).unwrap();
        assert_eq!(res, Outcome::Success(Value::Null));
    }

    #[test]
    fn error_without_result() {
        let res = outcome(r#"{"error":"invalid input","panic":false}"#).unwrap();
        assert_eq!(res, Outcome::Error("invalid input".to_string()));
    }

    #[test]
    fn error_next_to_null_result_as_the_engine_writes_it() {
        let res = outcome(r#"{"res":null,"error":"bad n","panic":false,"panic_details":null}"#)
            .unwrap();
        assert_eq!(res, Outcome::Error("bad n".to_string()));
    }

    #[test]
    fn panic_wins_over_error_and_result() {
        let res = outcome(
            r#"{"res":1,"error":"ignored","panic":true,"panic_details":{"cmd":"hash_data","msg":"overflow"}}"#,
        )
        .unwrap();
        assert_eq!(
            res,
            Outcome::Panic(PanicDetails {
                cmd: "hash_data".to_string(),
                msg: "overflow".to_string(),
            })
        );
    }

    #[test]
    fn panic_without_details_is_a_violation() {
        let err = outcome(r#"{"panic":true,"panic_details":null}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Protocol { .. }));
    }

    #[test]
    fn error_and_result_together_is_a_violation() {
        let err = outcome(r#"{"res":[1],"error":"x","panic":false}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Protocol { .. }));
    }

    #[test]
    fn empty_response_is_a_violation() {
        let err = outcome(r#"{"panic":false}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Protocol { .. }));
    }

    #[test]
    fn missing_panic_flag_fails_to_decode() {
        let err = decode(r#"{"res":1}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Decode(_)));
    }

    #[test]
    fn garbage_fails_to_decode() {
        assert!(matches!(decode("not json"), Err(BridgeError::Decode(_))));
    }

    #[test]
    fn into_result_maps_each_outcome() {
        let err = decode(r#"{"panic":true,"panic_details":{"cmd":"c","msg":"m"}}"#)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert!(matches!(err, BridgeError::Panic { ref cmd, ref msg } if cmd == "c" && msg == "m"));

        let err = decode(r#"{"error":"nope","panic":false}"#)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert!(matches!(err, BridgeError::Execution { ref message } if message == "nope"));
    }
}
