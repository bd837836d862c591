//! Integration tests for the subprocess executor.
//!
//! A tiny shell script stands in for `Rscript`: the executor invokes
//! `<program> --vanilla <script> <output>`, so the stub sees the script file
//! as `$2` and the output path as `$3`. This exercises the whole lifecycle —
//! temp-file creation, process spawn, capture, cleanup — without needing an
//! R installation.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::Duration;

use grbridge_core::{BridgeError, ExecOutcome, ExecutorConfig, Interpreter, RExecutor, ResultTag};
use serde_json::json;
use tempfile::TempDir;

fn write_stub(dir: &Path, body: &str) -> String {
    let path = dir.join("fake-rscript");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path.to_string_lossy().into_owned()
}

fn executor_with(body: &str) -> (RExecutor, TempDir) {
    executor_with_timeout(body, None)
}

fn executor_with_timeout(body: &str, timeout: Option<Duration>) -> (RExecutor, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = ExecutorConfig {
        rscript: write_stub(dir.path(), body),
        scratch_dir: dir.path().join("scratch"),
        timeout,
    };
    (RExecutor::new(config).unwrap(), dir)
}

fn scratch_entries(executor: &RExecutor) -> Vec<String> {
    std::fs::read_dir(executor.scratch_dir())
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

const SUCCESS_STUB: &str = r#"cat > "$3" <<'EOF'
{"success":[true],"result":{"type":["generic"],"data":[42]}}
EOF"#;

#[tokio::test]
async fn success_outcome_is_captured() {
    let (executor, _dir) = executor_with(SUCCESS_STUB);
    let outcome = executor.execute("1 + 1").await.unwrap();
    assert_eq!(
        outcome,
        ExecOutcome::Success {
            tag: ResultTag::Generic,
            data: json!([42])
        }
    );
}

#[tokio::test]
async fn command_text_reaches_the_script_file() {
    // The stub answers success only if the command marker is present in the
    // wrapper script it was handed.
    let body = r#"if grep -q "gr.reduce(MARKER_XYZ)" "$2"; then
  printf '%s' '{"success":true,"result":{"type":"generic","data":1}}' > "$3"
else
  printf '%s' '{"success":false,"error":"marker missing"}' > "$3"
fi"#;
    let (executor, _dir) = executor_with(body);
    let outcome = executor.execute("gr.reduce(MARKER_XYZ)").await.unwrap();
    assert!(matches!(outcome, ExecOutcome::Success { .. }));
}

#[tokio::test]
async fn interpreter_error_text_is_propagated_verbatim() {
    let body = r#"printf '%s' '{"success":[false],"error":["object '\''x'\'' not found"]}' > "$3""#;
    let (executor, _dir) = executor_with(body);
    let outcome = executor.execute("x").await.unwrap();
    assert_eq!(
        outcome,
        ExecOutcome::Failure {
            message: "object 'x' not found".to_string()
        }
    );
}

#[tokio::test]
async fn missing_output_reports_the_exit_code() {
    let (executor, _dir) = executor_with("exit 3");
    let outcome = executor.execute("whatever").await.unwrap();
    match outcome {
        ExecOutcome::Failure { message } => {
            assert!(message.contains("exited with code 3"), "message: {message}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_output_is_a_typed_error() {
    let body = r#"printf '%s' 'this is not json' > "$3""#;
    let (executor, _dir) = executor_with(body);
    let err = executor.execute("whatever").await.unwrap_err();
    assert!(matches!(err, BridgeError::MalformedOutput { .. }));
}

#[tokio::test]
async fn temp_files_are_removed_on_every_path() {
    // Success path.
    let (executor, _dir) = executor_with(SUCCESS_STUB);
    executor.execute("1").await.unwrap();
    assert!(scratch_entries(&executor).is_empty(), "after success");

    // Missing-output path.
    let (executor, _dir) = executor_with("exit 1");
    executor.execute("1").await.unwrap();
    assert!(scratch_entries(&executor).is_empty(), "after missing output");

    // Malformed-output path.
    let body = r#"printf '%s' '{broken' > "$3""#;
    let (executor, _dir) = executor_with(body);
    let _ = executor.execute("1").await;
    assert!(scratch_entries(&executor).is_empty(), "after malformed output");
}

#[tokio::test]
async fn concurrent_calls_never_collide() {
    // Each call's result carries the script filename it ran from; distinct
    // filenames prove the calls never shared temp files.
    let body = r#"name=$(basename "$2")
printf '{"success":true,"result":{"type":"generic","data":"%s"}}' "$name" > "$3""#;
    let (executor, _dir) = executor_with(body);

    let (a, b, c, d) = tokio::join!(
        executor.execute("1"),
        executor.execute("2"),
        executor.execute("3"),
        executor.execute("4"),
    );

    let mut names = Vec::new();
    for outcome in [a.unwrap(), b.unwrap(), c.unwrap(), d.unwrap()] {
        match outcome {
            ExecOutcome::Success { data, .. } => names.push(data.as_str().unwrap().to_string()),
            other => panic!("expected success, got {other:?}"),
        }
    }
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 4, "script filenames must be distinct");
    assert!(scratch_entries(&executor).is_empty());
}

#[tokio::test]
async fn timeout_synthesizes_a_failure() {
    let (executor, _dir) = executor_with_timeout("sleep 5", Some(Duration::from_millis(100)));
    let start = std::time::Instant::now();
    let outcome = executor.execute("slow").await.unwrap();
    assert!(start.elapsed() < Duration::from_secs(2));
    match outcome {
        ExecOutcome::Failure { message } => assert!(message.contains("timed out")),
        other => panic!("expected timeout failure, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_program_is_a_failure_not_a_panic() {
    let dir = TempDir::new().unwrap();
    let config = ExecutorConfig {
        rscript: dir
            .path()
            .join("definitely-not-a-real-interpreter")
            .to_string_lossy()
            .into_owned(),
        scratch_dir: dir.path().join("scratch"),
        timeout: None,
    };
    let executor = RExecutor::new(config).unwrap();
    let outcome = executor.execute("1").await.unwrap();
    assert!(matches!(outcome, ExecOutcome::Failure { .. }));
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let (executor, _dir) = executor_with(SUCCESS_STUB);
    executor.initialize().await.unwrap();
    executor.initialize().await.unwrap();
}

#[tokio::test]
async fn initialize_fails_fast_when_probe_fails() {
    let body = r#"printf '%s' '{"success":false,"error":"gUtils package not found"}' > "$3""#;
    let (executor, _dir) = executor_with(body);
    let err = executor.initialize().await.unwrap_err();
    match err {
        BridgeError::Initialization(message) => {
            assert!(message.contains("gUtils") || message.contains("unavailable"));
        }
        other => panic!("expected initialization error, got {other:?}"),
    }
}

#[tokio::test]
async fn close_removes_the_scratch_directory() {
    let (executor, _dir) = executor_with(SUCCESS_STUB);
    executor.execute("1").await.unwrap();
    executor.close().await;
    assert!(!executor.scratch_dir().exists());
}
