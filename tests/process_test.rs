use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use conduit::binding::process::ProcessBinding;
use conduit::binding::{Binding, BindingHandle, TransportPath};
use conduit::command::ops::{FibonacciInput, SortAlgorithm, SortNumbersInput};
use conduit::protocol;
use conduit::{Bridge, BridgeError, Command};

/// A tiny engine in shell: answers `--home-dir`, otherwise swallows the
/// request and prints a canned response.
fn shell_engine(response: &str) -> ProcessBinding {
    let script = format!(
        r#"if [ "$0" = "--home-dir" ]; then echo /tmp/engine-home; else cat > /dev/null; printf '%s' '{response}'; fi"#
    );
    ProcessBinding::new("sh", vec!["-c".to_string(), script])
}

fn bridge(binding: ProcessBinding) -> Bridge {
    Bridge::new(Arc::new(BindingHandle::Linked {
        path: TransportPath::ModuleTable,
        binding: Arc::new(binding),
    }))
}

#[tokio::test]
async fn process_engine_result_comes_back() {
    let bridge = bridge(shell_engine(r#"{"res":{"result":55},"panic":false}"#));

    let res = bridge
        .execute(&Command::Fibonacci(FibonacciInput { n: 10 }))
        .await
        .unwrap();

    assert_eq!(res, json!({"result": 55}));
}

#[tokio::test]
async fn process_engine_receives_request_on_stdin() {
    let binding = ProcessBinding::new("cat", vec![]);

    let echoed = binding.execute(r#"{"cmd":"logs"}"#).await.unwrap();

    assert_eq!(echoed, r#"{"cmd":"logs"}"#);
}

#[tokio::test]
async fn large_request_does_not_stall_on_full_pipes() {
    let command = Command::SortNumbers(SortNumbersInput {
        numbers: (0..200_000).rev().collect(),
        algorithm: SortAlgorithm::Parallel,
    });
    let request = protocol::encode(&command).unwrap();
    assert!(request.len() > 1_000_000);
    let binding = ProcessBinding::new("cat", vec![]);

    let echoed = tokio::time::timeout(Duration::from_secs(10), binding.execute(&request))
        .await
        .expect("execute did not finish")
        .unwrap();

    assert_eq!(echoed.len(), request.len());
    assert_eq!(echoed, request);
}

#[tokio::test]
async fn engine_logging_to_stderr_while_reading_still_answers() {
    // Copies stdin to stderr before answering on stdout.
    let binding = ProcessBinding::new(
        "sh",
        vec![
            "-c".to_string(),
            r#"cat >&2; printf '%s' '{"res":1,"panic":false}'"#.to_string(),
        ],
    );
    let request = "x".repeat(1_000_000);

    let response = tokio::time::timeout(Duration::from_secs(10), binding.execute(&request))
        .await
        .expect("execute did not finish")
        .unwrap();

    assert_eq!(response, r#"{"res":1,"panic":false}"#);
}

#[tokio::test]
async fn empty_home_dir_reply_is_a_transport_error() {
    let binding = ProcessBinding::new("sh", vec!["-c".to_string(), "true".to_string()]);

    let err = binding.home_dir().await.unwrap_err();

    assert!(matches!(err, BridgeError::Transport { ref reason } if reason.contains("no home directory")));
}

#[tokio::test]
async fn process_engine_home_dir_is_trimmed() {
    let binding = shell_engine("{}");

    assert_eq!(
        binding.home_dir().await.unwrap(),
        PathBuf::from("/tmp/engine-home")
    );
}

#[tokio::test]
async fn failing_process_is_a_transport_error() {
    let binding = ProcessBinding::new(
        "sh",
        vec!["-c".to_string(), "echo engine crashed >&2; exit 3".to_string()],
    );

    let err = binding.execute("{}").await.unwrap_err();

    assert!(matches!(err, BridgeError::Transport { ref reason } if reason.contains("engine crashed") && reason.contains('3')));
}

#[tokio::test]
async fn missing_program_is_a_transport_error() {
    let binding = ProcessBinding::new("/nonexistent/conduit-engine", vec![]);

    let err = binding.execute("{}").await.unwrap_err();

    assert!(matches!(err, BridgeError::Transport { .. }));
}
