//! Operation dispatch — the single execution path for all tool calls.
//!
//! ```text
//! {operationId, arguments}
//!     │
//!     ├── catalog lookup ──────────── unknown id → NotFound, nothing spawned
//!     ├── interpreter.initialize() ── idempotent readiness probe
//!     ├── spec.render(args) ───────── one R command string
//!     ├── interpreter.execute() ───── one short-lived subprocess
//!     └── parse::deserialize() ────── typed domain value
//! ```
//!
//! Every failure below this boundary is normalized into a [`BridgeError`]
//! carrying the operation id; no raw I/O or parse error escapes to the
//! transport layer.

use std::sync::Arc;

use grbridge_types::RValue;
use serde_json::{Map, Value};

use crate::args::OpArgs;
use crate::catalog::{Catalog, ResultKind};
use crate::error::{BridgeError, BridgeResult};
use crate::executor::{ExecOutcome, Interpreter, ResultTag};
use crate::parse;

/// Routes a flat operation namespace onto bridge invocations.
pub struct Dispatcher {
    catalog: Catalog,
    interpreter: Arc<dyn Interpreter>,
}

impl Dispatcher {
    pub fn new(interpreter: Arc<dyn Interpreter>) -> Self {
        Self {
            catalog: Catalog::new(),
            interpreter,
        }
    }

    /// The immutable operation table, for tool listing.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Fail-fast readiness probe, also run idempotently per dispatch.
    pub async fn initialize(&self) -> BridgeResult<()> {
        self.interpreter.initialize().await
    }

    /// Tear down interpreter scratch state.
    pub async fn close(&self) {
        self.interpreter.close().await;
    }

    /// Execute one operation to completion.
    pub async fn dispatch(
        &self,
        op: &str,
        arguments: Map<String, Value>,
    ) -> BridgeResult<RValue> {
        // Unknown ids never reach the filesystem or a subprocess.
        let spec = self
            .catalog
            .get(op)
            .ok_or_else(|| BridgeError::NotFound(op.to_string()))?;

        self.interpreter.initialize().await?;

        let args = OpArgs::new(arguments);
        let command = (spec.render)(&args).map_err(|e| BridgeError::InvalidArgs {
            op: op.to_string(),
            message: e.to_string(),
        })?;

        tracing::info!(op, "executing operation");
        tracing::debug!(op, %command, "rendered command");

        let outcome = self
            .interpreter
            .execute(&command)
            .await
            .map_err(|e| e.for_op(op))?;

        if let ExecOutcome::Success { tag, .. } = &outcome {
            if !tag_matches(*tag, spec.result) {
                tracing::debug!(
                    op,
                    actual = ?tag,
                    declared = ?spec.result,
                    "interpreter result kind differs from declared kind"
                );
            }
        }

        let value = parse::deserialize(outcome).map_err(|e| e.for_op(op))?;
        tracing::info!(op, "operation completed");
        Ok(value)
    }
}

fn tag_matches(tag: ResultTag, declared: ResultKind) -> bool {
    matches!(
        (tag, declared),
        (ResultTag::Ranges, ResultKind::Ranges)
            | (ResultTag::RangesList, ResultKind::RangesList)
            | (ResultTag::Table, ResultKind::Table)
            | (ResultTag::Generic, ResultKind::Generic)
    )
}
