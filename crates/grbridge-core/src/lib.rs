//! grbridge-core: the bridge between typed genomic values and the gUtils
//! R interpreter.
//!
//! This crate provides:
//!
//! - **Format**: serialization of domain values into R literal syntax
//! - **Executor**: one short-lived `Rscript` process per command, with JSON
//!   result capture and guaranteed temp-file cleanup
//! - **Parse**: deserialization of the wrapper's tagged output back into
//!   domain values
//! - **Catalog**: the immutable table of operations (name, argument
//!   contract, command template, result kind)
//! - **Dispatch**: routing of a flat operation namespace onto bridge
//!   invocations, with a uniform error envelope

pub mod args;
pub mod catalog;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod format;
pub mod parse;

pub use catalog::{Catalog, OpGroup, OpSpec, ParamKind, ParamSpec, ResultKind};
pub use dispatch::Dispatcher;
pub use error::BridgeError;
pub use executor::{ExecOutcome, ExecutorConfig, Interpreter, RExecutor, ResultTag};
