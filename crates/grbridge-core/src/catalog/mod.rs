//! The operation catalog.
//!
//! One immutable table, built once at startup, mapping every operation id to
//! its argument contract, command template, and declared result kind. Each
//! entry carries an explicit [`OpGroup`] tag; construction validates names
//! once instead of splitting identifiers into tokens at call time.
//!
//! ```text
//! Catalog
//! ├── convert    (gr2dt, dt2gr, parse.*, seg2gr, si2gr, gr.string)
//! ├── range      (gr.start, gr.end, gr.mid, gr.tile, ...)
//! ├── overlap    (gr.findoverlaps, gr.reduce, gr.setdiff, ...)
//! ├── list       (grl.reduce, grl.unlist, grl.eval, ...)
//! ├── aggregate  (gr.val, gr.sum, gr.quantile, gr.breaks)
//! ├── operator   (%(%, %&%, %O%, %Q%, %$%, ...)
//! └── util       (hg_seqlengths, gr.fix, grbind, rrbind, ...)
//! ```

mod aggregate;
mod convert;
mod list;
mod operator;
mod overlap;
mod range;
mod util;

use std::collections::HashMap;

use serde_json::Value;

use crate::args::{ArgResult, OpArgs};
use crate::format::{format_granges, format_granges_list, r_bool, r_string};

/// Functional family of an operation. Explicit per entry; never derived by
/// splitting the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpGroup {
    Convert,
    Range,
    Overlap,
    List,
    Aggregate,
    Operator,
    Util,
}

impl OpGroup {
    /// Human label used in server instructions.
    pub fn label(&self) -> &'static str {
        match self {
            OpGroup::Convert => "data conversion",
            OpGroup::Range => "range manipulation",
            OpGroup::Overlap => "overlap and set operations",
            OpGroup::List => "grouped-range operations",
            OpGroup::Aggregate => "aggregation",
            OpGroup::Operator => "operator shortcuts",
            OpGroup::Util => "utilities",
        }
    }
}

/// Result kind an operation is expected to produce.
///
/// The wrapper's runtime tag is authoritative for deserialization; this
/// declared kind feeds tool descriptions and a mismatch diagnostic in the
/// dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Ranges,
    RangesList,
    Table,
    Generic,
}

/// Parameter type for schema generation and documentation.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    String,
    Number,
    Bool,
    StringArray,
    NumberArray,
    /// A number or an array of numbers.
    NumberOrArray,
    /// A string or an array of strings.
    StringOrArray,
    /// Array of range objects (`seqnames`/`start`/`end`/`strand`/`metadata`).
    Ranges,
    /// Array of `{id, ranges}` objects.
    RangesList,
    /// Array of range collections.
    RangesArray,
    /// Array of labeled collections.
    RangesListArray,
    /// Free-form keyed object (column mappings, seqlengths).
    Object,
    /// Array of keyed objects.
    ObjectArray,
    /// String restricted to a fixed set.
    Enum(&'static [&'static str]),
}

/// One parameter of an operation's argument contract.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<Value>,
    pub description: &'static str,
}

impl ParamSpec {
    pub fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            description,
        }
    }

    pub fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
            description,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// One entry of the catalog.
pub struct OpSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub group: OpGroup,
    pub result: ResultKind,
    pub params: Vec<ParamSpec>,
    /// Command template: arguments in, one R command string out.
    pub render: fn(&OpArgs) -> ArgResult<String>,
}

/// The immutable operation table.
pub struct Catalog {
    ops: Vec<OpSpec>,
    index: HashMap<&'static str, usize>,
}

impl Catalog {
    /// Build the full catalog. Panics on a duplicate or malformed operation
    /// name — both are programming errors caught at startup, not call time.
    pub fn new() -> Self {
        let mut ops = Vec::new();
        ops.extend(convert::specs());
        ops.extend(range::specs());
        ops.extend(overlap::specs());
        ops.extend(list::specs());
        ops.extend(aggregate::specs());
        ops.extend(operator::specs());
        ops.extend(util::specs());

        let mut index = HashMap::with_capacity(ops.len());
        for (i, op) in ops.iter().enumerate() {
            assert!(
                op.name.starts_with("gutils_"),
                "operation '{}' is outside the gutils namespace",
                op.name
            );
            assert!(
                index.insert(op.name, i).is_none(),
                "duplicate operation '{}'",
                op.name
            );
        }
        Self { ops, index }
    }

    pub fn get(&self, name: &str) -> Option<&OpSpec> {
        self.index.get(name).map(|&i| &self.ops[i])
    }

    /// Operations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &OpSpec> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of operations carrying the given group tag.
    pub fn group_len(&self, group: OpGroup) -> usize {
        self.ops.iter().filter(|op| op.group == group).count()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

// ── Shared template helpers ─────────────────────────────────────────────────

/// Render a required range-collection argument as a `GRanges(...)` literal.
pub(crate) fn ranges_literal(args: &OpArgs, name: &str) -> ArgResult<String> {
    Ok(format_granges(&args.require_ranges(name)?))
}

/// Render a required labeled-collection argument as a `GRangesList(...)`
/// literal.
pub(crate) fn ranges_list_literal(args: &OpArgs, name: &str) -> ArgResult<String> {
    Ok(format_granges_list(&args.require_ranges_list(name)?))
}

/// Append `, <r_name> = TRUE/FALSE` when the argument is present.
pub(crate) fn push_bool(
    cmd: &mut String,
    args: &OpArgs,
    key: &str,
    r_name: &str,
) -> ArgResult<()> {
    if let Some(b) = args.get_bool(key)? {
        cmd.push_str(&format!(", {r_name} = {}", r_bool(b)));
    }
    Ok(())
}

/// Append `, <r_name> = <n>` when the argument is present.
pub(crate) fn push_num(cmd: &mut String, args: &OpArgs, key: &str, r_name: &str) -> ArgResult<()> {
    if let Some(n) = args.get_num(key)? {
        cmd.push_str(&format!(", {r_name} = {n}"));
    }
    Ok(())
}

/// Append `, <r_name> = "<s>"` when the argument is present.
pub(crate) fn push_str(cmd: &mut String, args: &OpArgs, key: &str, r_name: &str) -> ArgResult<()> {
    if let Some(s) = args.get_str(key)? {
        cmd.push_str(&format!(", {r_name} = {}", r_string(s)));
    }
    Ok(())
}

/// `c("a", "b", ...)` from a list of strings.
pub(crate) fn quoted_vec(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| r_string(s)).collect();
    format!("c({})", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_all_sixty_five_operations() {
        let catalog = Catalog::new();
        assert_eq!(catalog.len(), 65);
    }

    #[test]
    fn group_sizes_match_the_original_server() {
        let catalog = Catalog::new();
        assert_eq!(catalog.group_len(OpGroup::Convert), 7);
        assert_eq!(catalog.group_len(OpGroup::Range), 11);
        assert_eq!(catalog.group_len(OpGroup::Overlap), 9);
        assert_eq!(catalog.group_len(OpGroup::List), 11);
        assert_eq!(catalog.group_len(OpGroup::Aggregate), 4);
        assert_eq!(catalog.group_len(OpGroup::Operator), 11);
        assert_eq!(catalog.group_len(OpGroup::Util), 12);
    }

    #[test]
    fn lookup_is_exact_match() {
        let catalog = Catalog::new();
        assert!(catalog.get("gutils_gr_reduce").is_some());
        assert!(catalog.get("gutils_gr_reduc").is_none());
        assert!(catalog.get("gr_reduce").is_none());
    }

    #[test]
    fn every_operation_documents_its_parameters() {
        let catalog = Catalog::new();
        for op in catalog.iter() {
            assert!(!op.description.is_empty(), "{} has no description", op.name);
            for p in &op.params {
                assert!(!p.description.is_empty(), "{}.{} undocumented", op.name, p.name);
            }
        }
    }

    #[test]
    fn required_params_carry_no_default() {
        let catalog = Catalog::new();
        for op in catalog.iter() {
            for p in op.params.iter().filter(|p| p.required) {
                assert!(p.default.is_none(), "{}.{} is required with a default", op.name, p.name);
            }
        }
    }
}
