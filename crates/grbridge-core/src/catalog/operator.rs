//! Named-function versions of the gUtils operator shortcuts.
//!
//! Each operation renders an infix expression rather than a function call:
//! `%(%`/`%)%` for strand-aware ends, `%&%`/`%&&%` for intersection,
//! `%O%`/`%o%`/`%N%` for overlap statistics, `%-%`/`%+%` for set difference
//! and shifting, and `%Q%`/`%$%` for metadata query and aggregation.

use serde_json::json;

use crate::args::{ArgResult, OpArgs};
use crate::format::r_string;

use super::{ranges_literal, OpGroup, OpSpec, ParamKind, ParamSpec, ResultKind};

pub(super) fn specs() -> Vec<OpSpec> {
    vec![
        OpSpec {
            name: "gutils_op_left_side",
            description: "Get left/5' side of intervals (strand-aware) - equivalent to %(%",
            group: OpGroup::Operator,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Input ranges"),
                ParamSpec::optional("width", ParamKind::Number, "Width of output")
                    .with_default(json!(1)),
            ],
            render: |args| render_side("%(%", args),
        },
        OpSpec {
            name: "gutils_op_right_side",
            description: "Get right/3' side of intervals (strand-aware) - equivalent to %)%",
            group: OpGroup::Operator,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Input ranges"),
                ParamSpec::optional("width", ParamKind::Number, "Width of output")
                    .with_default(json!(1)),
            ],
            render: |args| render_side("%)%", args),
        },
        OpSpec {
            name: "gutils_op_intersect_agnostic",
            description: "Strand-agnostic intersection check - equivalent to %&%",
            group: OpGroup::Operator,
            result: ResultKind::Ranges,
            params: query_subject_params(),
            render: |args| render_infix("%&%", args),
        },
        OpSpec {
            name: "gutils_op_intersect_specific",
            description: "Strand-specific intersection check - equivalent to %&&%",
            group: OpGroup::Operator,
            result: ResultKind::Ranges,
            params: query_subject_params(),
            render: |args| render_infix("%&&%", args),
        },
        OpSpec {
            name: "gutils_op_fraction_overlap",
            description: "Fraction of query width overlapping - equivalent to %O%",
            group: OpGroup::Operator,
            result: ResultKind::Generic,
            params: query_subject_params(),
            render: |args| render_infix("%O%", args),
        },
        OpSpec {
            name: "gutils_op_base_overlap",
            description: "Number of bases overlapping - equivalent to %o%",
            group: OpGroup::Operator,
            result: ResultKind::Generic,
            params: query_subject_params(),
            render: |args| render_infix("%o%", args),
        },
        OpSpec {
            name: "gutils_op_count_overlaps",
            description: "Count of overlapping ranges - equivalent to %N%",
            group: OpGroup::Operator,
            result: ResultKind::Generic,
            params: query_subject_params(),
            render: |args| render_infix("%N%", args),
        },
        OpSpec {
            name: "gutils_op_set_difference",
            description: "Set difference - equivalent to %-%",
            group: OpGroup::Operator,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("x", ParamKind::Ranges, "Ranges to subtract from"),
                ParamSpec::required("y", ParamKind::Ranges, "Ranges to subtract"),
            ],
            render: render_set_difference,
        },
        OpSpec {
            name: "gutils_op_shift",
            description: "Shift ranges by amount - equivalent to %+%",
            group: OpGroup::Operator,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Ranges to shift"),
                ParamSpec::required(
                    "shift",
                    ParamKind::Number,
                    "Amount to shift (positive or negative)",
                ),
            ],
            render: render_shift,
        },
        OpSpec {
            name: "gutils_op_query_metadata",
            description: "Query by metadata expression - equivalent to %Q%",
            group: OpGroup::Operator,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Ranges to query"),
                ParamSpec::required(
                    "expression",
                    ParamKind::String,
                    "R expression to evaluate on metadata",
                ),
            ],
            render: render_query_metadata,
        },
        OpSpec {
            name: "gutils_op_aggregate_metadata",
            description: "Aggregate metadata across territories - equivalent to %$%",
            group: OpGroup::Operator,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("territories", ParamKind::Ranges, "Territory ranges"),
                ParamSpec::required("data", ParamKind::Ranges, "Data ranges with metadata"),
                ParamSpec::required("column", ParamKind::String, "Metadata column to aggregate"),
                ParamSpec::optional("fun", ParamKind::String, "Aggregation function")
                    .with_default(json!("sum")),
            ],
            render: render_aggregate_metadata,
        },
    ]
}

fn query_subject_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::required("query", ParamKind::Ranges, "Query ranges"),
        ParamSpec::required("subject", ParamKind::Ranges, "Subject ranges"),
    ]
}

fn render_side(op: &str, args: &OpArgs) -> ArgResult<String> {
    let ranges = ranges_literal(args, "ranges")?;
    let width = args.get_num("width")?.unwrap_or_else(|| "1".to_string());
    Ok(format!("{ranges} {op} {width}"))
}

fn render_infix(op: &str, args: &OpArgs) -> ArgResult<String> {
    let query = ranges_literal(args, "query")?;
    let subject = ranges_literal(args, "subject")?;
    Ok(format!("{query} {op} {subject}"))
}

fn render_set_difference(args: &OpArgs) -> ArgResult<String> {
    let x = ranges_literal(args, "x")?;
    let y = ranges_literal(args, "y")?;
    Ok(format!("{x} %-% {y}"))
}

fn render_shift(args: &OpArgs) -> ArgResult<String> {
    let ranges = ranges_literal(args, "ranges")?;
    let shift = args.require_num("shift")?;
    Ok(format!("{ranges} %+% {shift}"))
}

fn render_query_metadata(args: &OpArgs) -> ArgResult<String> {
    let ranges = ranges_literal(args, "ranges")?;
    let expression = args.require_str("expression")?;
    Ok(format!("{ranges} %Q% ({expression})"))
}

fn render_aggregate_metadata(args: &OpArgs) -> ArgResult<String> {
    let territories = ranges_literal(args, "territories")?;
    let data = ranges_literal(args, "data")?;
    let column = args.require_str("column")?;
    let fun = args.get_str("fun")?.unwrap_or("sum");
    Ok(format!(
        "{territories} %$% list(data = {data}, column = {}, fun = {fun})",
        r_string(column)
    ))
}
