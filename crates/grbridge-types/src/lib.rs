//! grbridge-types: shared domain types for the grbridge workspace.
//!
//! This crate provides:
//!
//! - **Ranges**: `GenomicRange`, `GRanges`, `GRangesList` and the `Strand` enum
//! - **Table**: `DataTable`, a column-oriented table with a derived row count
//! - **Value**: `RValue`, the domain value union that flows through the bridge
//!
//! All values are call-scoped: they are built fresh for each tool call and
//! discarded once the response is emitted. Nothing here caches or persists.

pub mod ranges;
pub mod table;
pub mod value;

pub use ranges::{GRanges, GRangesList, GenomicRange, NamedRanges, Strand};
pub use table::{DataTable, TableError};
pub use value::RValue;
