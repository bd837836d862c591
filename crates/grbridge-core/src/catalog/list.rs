//! Operations over labeled range collections (GRangesList).

use grbridge_types::GRangesList;
use serde_json::json;

use crate::args::{ArgError, ArgResult, OpArgs};
use crate::format::format_granges_list;

use super::{
    push_bool, push_num, push_str, ranges_list_literal, ranges_literal, OpGroup, OpSpec,
    ParamKind, ParamSpec, ResultKind,
};

fn grl_param(description: &'static str) -> ParamSpec {
    ParamSpec::required("grl", ParamKind::RangesList, description)
}

pub(super) fn specs() -> Vec<OpSpec> {
    vec![
        OpSpec {
            name: "gutils_grl_reduce",
            description: "Reduce GRanges within each GRangesList element",
            group: OpGroup::List,
            result: ResultKind::RangesList,
            params: vec![
                grl_param("GRangesList to reduce"),
                ParamSpec::optional("pad", ParamKind::Number, "Padding to add before reducing")
                    .with_default(json!(0)),
                ParamSpec::optional("clip", ParamKind::Bool, "Clip to sequence bounds")
                    .with_default(json!(false)),
            ],
            render: render_grl_reduce,
        },
        OpSpec {
            name: "gutils_grl_string",
            description: "Create UCSC-style string representation of GRangesList",
            group: OpGroup::List,
            result: ResultKind::Generic,
            params: vec![
                grl_param("GRangesList to convert"),
                ParamSpec::optional("sep", ParamKind::String, "Separator between ranges")
                    .with_default(json!(";")),
            ],
            render: render_grl_string,
        },
        OpSpec {
            name: "gutils_grl_unlist",
            description: "Unlist GRangesList with tracking of origin",
            group: OpGroup::List,
            result: ResultKind::Ranges,
            params: vec![
                grl_param("GRangesList to unlist"),
                ParamSpec::optional("keep_names", ParamKind::Bool, "Keep list element names")
                    .with_default(json!(true)),
            ],
            render: render_grl_unlist,
        },
        OpSpec {
            name: "gutils_grl_pivot",
            description: "Invert the structure of nested GRangesList",
            group: OpGroup::List,
            result: ResultKind::RangesList,
            params: vec![grl_param("GRangesList to pivot")],
            render: |args| Ok(format!("grl.pivot({})", ranges_list_literal(args, "grl")?)),
        },
        OpSpec {
            name: "gutils_grl_eval",
            description: "Evaluate expressions on each GRanges element",
            group: OpGroup::List,
            result: ResultKind::Generic,
            params: vec![
                grl_param("GRangesList to evaluate on"),
                ParamSpec::required(
                    "expr",
                    ParamKind::String,
                    "R expression to evaluate on each element",
                ),
                ParamSpec::optional(
                    "condition",
                    ParamKind::String,
                    "Optional condition to filter elements",
                ),
            ],
            render: render_grl_eval,
        },
        OpSpec {
            name: "gutils_grl_expand",
            description: "Expand ranges within GRangesList",
            group: OpGroup::List,
            result: ResultKind::RangesList,
            params: vec![
                grl_param("GRangesList to expand"),
                ParamSpec::required("width", ParamKind::Number, "Amount to expand by"),
            ],
            render: |args| {
                Ok(format!(
                    "grl.expand({}, width = {})",
                    ranges_list_literal(args, "grl")?,
                    args.require_num("width")?
                ))
            },
        },
        OpSpec {
            name: "gutils_grl_shrink",
            description: "Shrink ranges within GRangesList",
            group: OpGroup::List,
            result: ResultKind::RangesList,
            params: vec![
                grl_param("GRangesList to shrink"),
                ParamSpec::required("width", ParamKind::Number, "Amount to shrink by"),
            ],
            render: |args| {
                Ok(format!(
                    "grl.shrink({}, width = {})",
                    ranges_list_literal(args, "grl")?,
                    args.require_num("width")?
                ))
            },
        },
        OpSpec {
            name: "gutils_grl_start",
            description: "Get start positions from GRangesList",
            group: OpGroup::List,
            result: ResultKind::Ranges,
            params: vec![
                grl_param("GRangesList"),
                ParamSpec::optional("width", ParamKind::Number, "Width of output ranges")
                    .with_default(json!(1)),
                ParamSpec::optional("ignore_strand", ParamKind::Bool, "Ignore strand")
                    .with_default(json!(true)),
            ],
            render: |args| render_grl_position("grl.start", args),
        },
        OpSpec {
            name: "gutils_grl_end",
            description: "Get end positions from GRangesList",
            group: OpGroup::List,
            result: ResultKind::Ranges,
            params: vec![
                grl_param("GRangesList"),
                ParamSpec::optional("width", ParamKind::Number, "Width of output ranges")
                    .with_default(json!(1)),
                ParamSpec::optional("ignore_strand", ParamKind::Bool, "Ignore strand")
                    .with_default(json!(true)),
            ],
            render: |args| render_grl_position("grl.end", args),
        },
        OpSpec {
            name: "gutils_grl_in",
            description: "Test GRangesList overlap with windows",
            group: OpGroup::List,
            result: ResultKind::Generic,
            params: vec![
                grl_param("GRangesList to test"),
                ParamSpec::required("windows", ParamKind::Ranges, "Windows to test against"),
                ParamSpec::optional("ignore_strand", ParamKind::Bool, "Ignore strand when testing")
                    .with_default(json!(true)),
            ],
            render: render_grl_in,
        },
        OpSpec {
            name: "gutils_grl_bind",
            description: "Concatenate GRangesList objects",
            group: OpGroup::List,
            result: ResultKind::RangesList,
            params: vec![ParamSpec::required(
                "lists",
                ParamKind::RangesListArray,
                "Array of GRangesList objects to bind",
            )],
            render: render_grl_bind,
        },
    ]
}

fn render_grl_reduce(args: &OpArgs) -> ArgResult<String> {
    let mut cmd = format!("grl.reduce({}", ranges_list_literal(args, "grl")?);
    push_num(&mut cmd, args, "pad", "pad")?;
    push_bool(&mut cmd, args, "clip", "clip")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_grl_string(args: &OpArgs) -> ArgResult<String> {
    let mut cmd = format!("grl.string({}", ranges_list_literal(args, "grl")?);
    push_str(&mut cmd, args, "sep", "sep")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_grl_unlist(args: &OpArgs) -> ArgResult<String> {
    let mut cmd = format!("grl.unlist({}", ranges_list_literal(args, "grl")?);
    push_bool(&mut cmd, args, "keep_names", "keep.names")?;
    cmd.push(')');
    Ok(cmd)
}

/// Expressions are passed through verbatim inside `expression(...)`; the
/// interpreter owns their syntax and their errors.
fn render_grl_eval(args: &OpArgs) -> ArgResult<String> {
    let grl = ranges_list_literal(args, "grl")?;
    let expr = args.require_str("expr")?;
    let mut cmd = format!("grl.eval({grl}, expr = expression({expr})");
    if let Some(condition) = args.get_str("condition")? {
        cmd.push_str(&format!(", condition = expression({condition})"));
    }
    cmd.push(')');
    Ok(cmd)
}

fn render_grl_position(func: &str, args: &OpArgs) -> ArgResult<String> {
    let mut cmd = format!("{func}({}", ranges_list_literal(args, "grl")?);
    push_num(&mut cmd, args, "width", "width")?;
    push_bool(&mut cmd, args, "ignore_strand", "ignore.strand")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_grl_in(args: &OpArgs) -> ArgResult<String> {
    let grl = ranges_list_literal(args, "grl")?;
    let windows = ranges_literal(args, "windows")?;
    let mut cmd = format!("grl.in({grl}, windows = {windows}");
    push_bool(&mut cmd, args, "ignore_strand", "ignore.strand")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_grl_bind(args: &OpArgs) -> ArgResult<String> {
    let lists = args.require_array("lists")?;
    let mut literals = Vec::with_capacity(lists.len());
    for (i, item) in lists.iter().enumerate() {
        let grl: GRangesList = serde_json::from_value(item.clone()).map_err(|e| {
            ArgError::new(format!("'lists' element {i} is not a labeled range collection: {e}"))
        })?;
        literals.push(format_granges_list(&grl));
    }
    Ok(format!("grl.bind({})", literals.join(", ")))
}
