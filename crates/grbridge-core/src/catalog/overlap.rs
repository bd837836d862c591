//! Overlap detection and set operations.

use serde_json::json;

use crate::args::{ArgResult, OpArgs};

use super::{
    push_bool, push_num, push_str, quoted_vec, ranges_list_literal, ranges_literal, OpGroup,
    OpSpec, ParamKind, ParamSpec, ResultKind,
};

const OVERLAP_TYPES: &[&str] = &["any", "start", "end", "within", "equal"];
const SELECT_MODES: &[&str] = &["all", "first", "last", "arbitrary"];

pub(super) fn specs() -> Vec<OpSpec> {
    vec![
        OpSpec {
            name: "gutils_gr_findoverlaps",
            description: "Find overlapping ranges between query and subject with advanced options",
            group: OpGroup::Overlap,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("query", ParamKind::Ranges, "Query ranges"),
                ParamSpec::required("subject", ParamKind::Ranges, "Subject ranges"),
                ParamSpec::optional(
                    "maxgap",
                    ParamKind::Number,
                    "Maximum gap between ranges to consider overlapping",
                )
                .with_default(json!(-1)),
                ParamSpec::optional("minoverlap", ParamKind::Number, "Minimum overlap required")
                    .with_default(json!(1)),
                ParamSpec::optional(
                    "type",
                    ParamKind::Enum(OVERLAP_TYPES),
                    "Type of overlap to detect",
                )
                .with_default(json!("any")),
                ParamSpec::optional(
                    "select",
                    ParamKind::Enum(SELECT_MODES),
                    "Which overlaps to return",
                )
                .with_default(json!("all")),
                ParamSpec::optional(
                    "ignore_strand",
                    ParamKind::Bool,
                    "Ignore strand when finding overlaps",
                )
                .with_default(json!(false)),
            ],
            render: render_findoverlaps,
        },
        OpSpec {
            name: "gutils_gr_in",
            description: "Test which query ranges overlap any subject ranges",
            group: OpGroup::Overlap,
            result: ResultKind::Generic,
            params: vec![
                ParamSpec::required("query", ParamKind::Ranges, "Query ranges"),
                ParamSpec::required("subject", ParamKind::Ranges, "Subject ranges"),
                ParamSpec::optional(
                    "ignore_strand",
                    ParamKind::Bool,
                    "Ignore strand when testing overlap",
                )
                .with_default(json!(true)),
            ],
            render: render_gr_in,
        },
        OpSpec {
            name: "gutils_gr_match",
            description: "Find exact matching ranges between two GRanges",
            group: OpGroup::Overlap,
            result: ResultKind::Generic,
            params: vec![
                ParamSpec::required("x", ParamKind::Ranges, "First set of ranges"),
                ParamSpec::required("table", ParamKind::Ranges, "Second set of ranges to match against"),
                ParamSpec::optional(
                    "ignore_strand",
                    ParamKind::Bool,
                    "Ignore strand when matching",
                )
                .with_default(json!(false)),
            ],
            render: render_gr_match,
        },
        OpSpec {
            name: "gutils_gr_reduce",
            description: "Reduce overlapping ranges to minimal non-overlapping set",
            group: OpGroup::Overlap,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Ranges to reduce"),
                ParamSpec::optional(
                    "by",
                    ParamKind::StringArray,
                    "Metadata columns to group by before reducing",
                ),
                ParamSpec::optional(
                    "ignore_strand",
                    ParamKind::Bool,
                    "Ignore strand when reducing",
                )
                .with_default(json!(true)),
                ParamSpec::optional("pad", ParamKind::Number, "Padding to add before reducing")
                    .with_default(json!(0)),
            ],
            render: render_gr_reduce,
        },
        OpSpec {
            name: "gutils_gr_disjoin",
            description: "Break ranges at all overlap boundaries",
            group: OpGroup::Overlap,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Ranges to disjoin"),
                ParamSpec::optional(
                    "ignore_strand",
                    ParamKind::Bool,
                    "Ignore strand when disjoining",
                )
                .with_default(json!(true)),
            ],
            render: render_gr_disjoin,
        },
        OpSpec {
            name: "gutils_gr_setdiff",
            description: "Remove portions of x that overlap y",
            group: OpGroup::Overlap,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("x", ParamKind::Ranges, "Ranges to subtract from"),
                ParamSpec::required("y", ParamKind::Ranges, "Ranges to subtract"),
                ParamSpec::optional(
                    "ignore_strand",
                    ParamKind::Bool,
                    "Ignore strand when computing difference",
                )
                .with_default(json!(true)),
            ],
            render: render_gr_setdiff,
        },
        OpSpec {
            name: "gutils_gr_simplify",
            description: "Reduce to minimal non-redundant footprint",
            group: OpGroup::Overlap,
            result: ResultKind::Ranges,
            params: vec![ParamSpec::required("ranges", ParamKind::Ranges, "Ranges to simplify")],
            render: |args| Ok(format!("gr.simplify({})", ranges_literal(args, "ranges")?)),
        },
        OpSpec {
            name: "gutils_gr_collapse",
            description: "Merge adjacent or nearby ranges",
            group: OpGroup::Overlap,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Ranges to collapse"),
                ParamSpec::optional("maxgap", ParamKind::Number, "Maximum gap to merge across")
                    .with_default(json!(0)),
                ParamSpec::optional(
                    "ignore_strand",
                    ParamKind::Bool,
                    "Ignore strand when collapsing",
                )
                .with_default(json!(true)),
            ],
            render: render_gr_collapse,
        },
        OpSpec {
            name: "gutils_gr_overlaps",
            description: "Test overlap between rearrangement junctions (GRangesList)",
            group: OpGroup::Overlap,
            result: ResultKind::Table,
            params: vec![
                ParamSpec::required(
                    "ra1",
                    ParamKind::RangesList,
                    "First set of rearrangements (GRangesList)",
                ),
                ParamSpec::required(
                    "ra2",
                    ParamKind::RangesList,
                    "Second set of rearrangements (GRangesList)",
                ),
                ParamSpec::optional("thresh", ParamKind::Number, "Overlap threshold")
                    .with_default(json!(1)),
            ],
            render: render_gr_overlaps,
        },
    ]
}

fn render_findoverlaps(args: &OpArgs) -> ArgResult<String> {
    let query = ranges_literal(args, "query")?;
    let subject = ranges_literal(args, "subject")?;
    let mut cmd = format!("gr.findoverlaps(query = {query}, subject = {subject}");
    push_num(&mut cmd, args, "maxgap", "maxgap")?;
    push_num(&mut cmd, args, "minoverlap", "minoverlap")?;
    push_str(&mut cmd, args, "type", "type")?;
    push_str(&mut cmd, args, "select", "select")?;
    push_bool(&mut cmd, args, "ignore_strand", "ignore.strand")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_gr_in(args: &OpArgs) -> ArgResult<String> {
    let query = ranges_literal(args, "query")?;
    let subject = ranges_literal(args, "subject")?;
    let mut cmd = format!("gr.in(query = {query}, subject = {subject}");
    push_bool(&mut cmd, args, "ignore_strand", "ignore.strand")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_gr_match(args: &OpArgs) -> ArgResult<String> {
    let x = ranges_literal(args, "x")?;
    let table = ranges_literal(args, "table")?;
    let mut cmd = format!("gr.match(x = {x}, table = {table}");
    push_bool(&mut cmd, args, "ignore_strand", "ignore.strand")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_gr_reduce(args: &OpArgs) -> ArgResult<String> {
    let mut cmd = format!("gr.reduce({}", ranges_literal(args, "ranges")?);
    if let Some(by) = args.get_strings("by")? {
        if !by.is_empty() {
            cmd.push_str(&format!(", by = {}", quoted_vec(&by)));
        }
    }
    push_bool(&mut cmd, args, "ignore_strand", "ignore.strand")?;
    push_num(&mut cmd, args, "pad", "pad")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_gr_disjoin(args: &OpArgs) -> ArgResult<String> {
    let mut cmd = format!("gr.disjoin({}", ranges_literal(args, "ranges")?);
    push_bool(&mut cmd, args, "ignore_strand", "ignore.strand")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_gr_setdiff(args: &OpArgs) -> ArgResult<String> {
    let x = ranges_literal(args, "x")?;
    let y = ranges_literal(args, "y")?;
    let mut cmd = format!("gr.setdiff(x = {x}, y = {y}");
    push_bool(&mut cmd, args, "ignore_strand", "ignore.strand")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_gr_collapse(args: &OpArgs) -> ArgResult<String> {
    let mut cmd = format!("gr.collapse({}", ranges_literal(args, "ranges")?);
    push_num(&mut cmd, args, "maxgap", "maxgap")?;
    push_bool(&mut cmd, args, "ignore_strand", "ignore.strand")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_gr_overlaps(args: &OpArgs) -> ArgResult<String> {
    let ra1 = ranges_list_literal(args, "ra1")?;
    let ra2 = ranges_list_literal(args, "ra2")?;
    let mut cmd = format!("gr.overlaps(ra1 = {ra1}, ra2 = {ra2}");
    push_num(&mut cmd, args, "thresh", "thresh")?;
    cmd.push(')');
    Ok(cmd)
}
