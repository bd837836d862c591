//! Subprocess executor — one short-lived `Rscript` process per command.
//!
//! Each call writes a wrapper script and a unique output path into a scratch
//! directory, spawns the interpreter, and reads back a tagged JSON envelope:
//! `{success: true, result: {type, data}}` or `{success: false, error}`.
//! Interpreter-side failures are data (`ExecOutcome::Failure`), never `Err`;
//! only an unusable scratch directory or an unparseable output file surfaces
//! as a typed error. Script and output files are removed on every exit path.
//!
//! Calls share nothing but the scratch directory, so concurrent execution is
//! safe as long as generated filenames never collide — which the name
//! generator guarantees with a process-wide counter.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tokio::sync::OnceCell;

use crate::error::{BridgeError, BridgeResult};
use crate::parse::unbox;

/// Configuration for the subprocess executor.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Interpreter program. Anything that accepts
    /// `<program> --vanilla <script> <output>` works; tests substitute a
    /// stub shell script here.
    pub rscript: String,
    /// Scratch directory for transient script/output pairs. Created at
    /// construction, removed wholesale by [`RExecutor::close`].
    pub scratch_dir: PathBuf,
    /// Optional per-command deadline. `None` (the default) waits
    /// unboundedly for the interpreter to finish.
    pub timeout: Option<Duration>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            rscript: "Rscript".to_string(),
            scratch_dir: PathBuf::from(".rbridge-temp"),
            timeout: None,
        }
    }
}

/// Result kind declared by the wrapper script.
///
/// The tag comes from the interpreter-side `inherits()` inspection; the
/// bridge never sniffs the payload shape. Unknown tags fall back to
/// `Generic` passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTag {
    Ranges,
    RangesList,
    Table,
    Generic,
}

impl ResultTag {
    pub fn from_wire(s: &str) -> Self {
        match s {
            "GRanges" => ResultTag::Ranges,
            "GRangesList" => ResultTag::RangesList,
            "DataTable" => ResultTag::Table,
            _ => ResultTag::Generic,
        }
    }
}

/// Outcome of one interpreter invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    Success { tag: ResultTag, data: Value },
    Failure { message: String },
}

/// The seam between dispatch and the interpreter process.
///
/// Production uses [`RExecutor`]; dispatcher tests substitute a mock.
#[async_trait]
pub trait Interpreter: Send + Sync {
    /// One-time readiness probe. Idempotent: repeated calls after the first
    /// success are no-ops.
    async fn initialize(&self) -> BridgeResult<()>;

    /// Run one command to completion.
    async fn execute(&self, command: &str) -> BridgeResult<ExecOutcome>;

    /// Tear down transient state. Safe to call more than once.
    async fn close(&self);
}

/// Drives `Rscript` with disposable script/output file pairs.
pub struct RExecutor {
    config: ExecutorConfig,
    ready: OnceCell<()>,
}

static NAME_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a collision-free basename for a script/output pair.
///
/// The atomic counter guarantees uniqueness within the process; time and
/// pid entropy keep concurrent bridges in the same scratch directory apart.
fn unique_name() -> String {
    let state = RandomState::new();
    let mut hasher = state.build_hasher();
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    hasher.write_u128(now.as_nanos());
    hasher.write_u32(std::process::id());
    let counter = NAME_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("cmd-{:016x}-{:06x}", hasher.finish(), counter)
}

/// Removes a script/output pair when dropped, whatever path execution took.
struct TempFiles {
    script: PathBuf,
    output: PathBuf,
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.script);
        let _ = std::fs::remove_file(&self.output);
    }
}

/// Wrap a command in the R harness that captures its result as tagged JSON.
///
/// The output path is read from `commandArgs` rather than spliced into the
/// source, so no filesystem path ever passes through an R string literal.
/// gUtils is loaded with a non-fatal `require` so that interpreter probes
/// still run on hosts where the library is missing; commands that need it
/// then fail with R's own message.
fn wrap_command(command: &str) -> String {
    format!(
        r#"if (!requireNamespace("jsonlite", quietly = TRUE)) {{
  stop("jsonlite package is required. Install it with: install.packages('jsonlite')")
}}
output_file <- commandArgs(trailingOnly = TRUE)[[1]]
invisible(suppressWarnings(suppressPackageStartupMessages(require("gUtils", quietly = TRUE))))
tryCatch({{
  result <- {{ {command} }}
  output <- if (inherits(result, "GRanges")) {{
    list(type = "GRanges", data = list(
      seqnames = as.character(seqnames(result)),
      start = start(result),
      end = end(result),
      strand = as.character(strand(result)),
      metadata = if (ncol(mcols(result)) > 0) as.list(mcols(result)) else list()
    ))
  }} else if (inherits(result, "GRangesList")) {{
    list(type = "GRangesList", data = lapply(seq_along(result), function(i) {{
      gr <- result[[i]]
      list(
        id = if (is.null(names(result))) as.character(i) else names(result)[[i]],
        ranges = list(
          seqnames = as.character(seqnames(gr)),
          start = start(gr),
          end = end(gr),
          strand = as.character(strand(gr)),
          metadata = if (ncol(mcols(gr)) > 0) as.list(mcols(gr)) else list()
        )
      )
    }}))
  }} else if (is.data.frame(result) || inherits(result, "data.table")) {{
    list(type = "DataTable", data = as.list(result))
  }} else {{
    list(type = "generic", data = result)
  }}
  jsonlite::write_json(list(success = TRUE, result = output), output_file)
}}, error = function(e) {{
  jsonlite::write_json(list(success = FALSE, error = as.character(e$message)), output_file)
}})
"#
    )
}

/// Parse the wrapper's JSON envelope. jsonlite boxes scalars in one-element
/// arrays, so every scalar field is unboxed before inspection.
fn parse_envelope(bytes: &[u8]) -> Result<ExecOutcome, String> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| format!("invalid JSON: {e}"))?;
    let obj = value.as_object().ok_or("expected a JSON object")?;

    let success = obj
        .get("success")
        .map(unbox)
        .and_then(Value::as_bool)
        .ok_or("missing or non-boolean 'success' field")?;

    if success {
        let result = obj
            .get("result")
            .map(unbox)
            .and_then(Value::as_object)
            .ok_or("missing 'result' object")?;
        let tag = result
            .get("type")
            .map(unbox)
            .and_then(Value::as_str)
            .ok_or("missing 'result.type' tag")?;
        let data = result.get("data").cloned().unwrap_or(Value::Null);
        Ok(ExecOutcome::Success {
            tag: ResultTag::from_wire(tag),
            data,
        })
    } else {
        let message = obj
            .get("error")
            .map(unbox)
            .and_then(Value::as_str)
            .unwrap_or("unknown interpreter error")
            .to_string();
        Ok(ExecOutcome::Failure { message })
    }
}

const LOAD_CHECK: &str = r#"if (!requireNamespace("gUtils", quietly = TRUE)) {
  stop("gUtils package not found. Please install it first.")
}
"gUtils environment ready""#;

impl RExecutor {
    /// Create an executor and its scratch directory.
    pub fn new(config: ExecutorConfig) -> BridgeResult<Self> {
        std::fs::create_dir_all(&config.scratch_dir).map_err(|e| {
            BridgeError::Initialization(format!(
                "failed to create scratch directory {}: {e}",
                config.scratch_dir.display()
            ))
        })?;
        Ok(Self {
            config,
            ready: OnceCell::new(),
        })
    }

    /// The scratch directory holding transient script/output pairs.
    pub fn scratch_dir(&self) -> &Path {
        &self.config.scratch_dir
    }

    async fn run(&self, command: &str) -> BridgeResult<ExecOutcome> {
        let nonce = unique_name();
        let script = self.config.scratch_dir.join(format!("{nonce}.R"));
        let output = self.config.scratch_dir.join(format!("{nonce}.json"));
        let _cleanup = TempFiles {
            script: script.clone(),
            output: output.clone(),
        };

        tokio::fs::write(&script, wrap_command(command))
            .await
            .map_err(|e| {
                BridgeError::execution(format!("failed to write command script: {e}"))
            })?;

        let mut cmd = Command::new(&self.config.rscript);
        cmd.arg("--vanilla")
            .arg(&script)
            .arg(&output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return Ok(ExecOutcome::Failure {
                    message: format!("failed to start {}: {e}", self.config.rscript),
                });
            }
        };

        let waited = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(result) => result,
                // Dropping the timed-out future kills the child (kill_on_drop).
                Err(_) => {
                    return Ok(ExecOutcome::Failure {
                        message: format!("command timed out after {}ms", limit.as_millis()),
                    });
                }
            },
            None => child.wait_with_output().await,
        };

        let process_output = match waited {
            Ok(out) => out,
            Err(e) => {
                return Ok(ExecOutcome::Failure {
                    message: format!("R process error: {e}"),
                });
            }
        };

        if !process_output.stderr.is_empty() {
            tracing::debug!(
                stderr = %String::from_utf8_lossy(&process_output.stderr),
                "interpreter stderr"
            );
        }

        match tokio::fs::read(&output).await {
            Ok(bytes) => parse_envelope(&bytes).map_err(|message| {
                tracing::warn!(%message, "malformed interpreter output");
                BridgeError::MalformedOutput {
                    op: String::new(),
                    message,
                }
            }),
            Err(_) => {
                let code = process_output.status.code().unwrap_or(1);
                Ok(ExecOutcome::Failure {
                    message: format!("R process exited with code {code}"),
                })
            }
        }
    }
}

#[async_trait]
impl Interpreter for RExecutor {
    async fn initialize(&self) -> BridgeResult<()> {
        self.ready
            .get_or_try_init(|| async {
                match self.run("R.version.string").await? {
                    ExecOutcome::Failure { message } => {
                        return Err(BridgeError::Initialization(format!(
                            "R interpreter unavailable: {message}"
                        )));
                    }
                    ExecOutcome::Success { data, .. } => {
                        tracing::debug!(version = %unbox(&data), "R interpreter reachable");
                    }
                }
                match self.run(LOAD_CHECK).await? {
                    ExecOutcome::Failure { message } => {
                        Err(BridgeError::Initialization(message))
                    }
                    ExecOutcome::Success { .. } => {
                        tracing::info!("gUtils environment ready");
                        Ok(())
                    }
                }
            })
            .await
            .copied()
    }

    async fn execute(&self, command: &str) -> BridgeResult<ExecOutcome> {
        self.run(command).await
    }

    async fn close(&self) {
        if let Err(e) = tokio::fs::remove_dir_all(&self.config.scratch_dir).await {
            tracing::debug!(error = %e, "scratch directory cleanup skipped");
        }
    }
}
