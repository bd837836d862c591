//! Bridge error taxonomy.
//!
//! Every failure a caller can observe is one of these variants. Interpreter
//! error text travels as an opaque string — it is never parsed or
//! classified. `MalformedOutput` reaches the caller looking like any other
//! execution failure; the distinct variant exists for internal diagnostics.

use thiserror::Error;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Bridge operation errors.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// Unknown operation id. Reported before any serialization or
    /// subprocess work happens.
    #[error("operation not found: {0}")]
    NotFound(String),

    /// The interpreter or the gUtils library is unavailable. Fatal to
    /// startup; surfaced before any tool call is accepted.
    #[error("bridge initialization failed: {0}")]
    Initialization(String),

    /// The interpreter evaluation threw, the process exited without
    /// producing output, or the scratch directory was unusable.
    #[error("failed to execute {op}: {message}")]
    Execution { op: String, message: String },

    /// The output file existed but did not hold valid tagged JSON.
    #[error("failed to execute {op}: malformed interpreter output: {message}")]
    MalformedOutput { op: String, message: String },

    /// The call's arguments did not satisfy the operation's contract.
    #[error("invalid arguments for {op}: {message}")]
    InvalidArgs { op: String, message: String },
}

impl BridgeError {
    /// Attach an operation id to an error raised below the dispatch
    /// boundary. Variants that already carry one are left untouched.
    pub fn for_op(self, op: &str) -> Self {
        match self {
            BridgeError::Execution { message, .. } => BridgeError::Execution {
                op: op.to_string(),
                message,
            },
            BridgeError::MalformedOutput { message, .. } => BridgeError::MalformedOutput {
                op: op.to_string(),
                message,
            },
            BridgeError::InvalidArgs { message, .. } => BridgeError::InvalidArgs {
                op: op.to_string(),
                message,
            },
            other => other,
        }
    }

    /// Shorthand for an execution failure not yet bound to an operation.
    pub fn execution(message: impl Into<String>) -> Self {
        BridgeError::Execution {
            op: String::new(),
            message: message.into(),
        }
    }
}
