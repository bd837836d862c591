//! Aggregation and annotation operations.

use serde_json::json;

use crate::args::{ArgResult, OpArgs};
use crate::format::r_string;

use super::{
    push_bool, push_num, quoted_vec, ranges_literal, OpGroup, OpSpec, ParamKind, ParamSpec,
    ResultKind,
};

pub(super) fn specs() -> Vec<OpSpec> {
    vec![
        OpSpec {
            name: "gutils_gr_val",
            description: "Annotate ranges with aggregated values from overlapping target ranges",
            group: OpGroup::Aggregate,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("query", ParamKind::Ranges, "Query ranges to annotate"),
                ParamSpec::required("target", ParamKind::Ranges, "Target ranges with values"),
                ParamSpec::optional(
                    "val",
                    ParamKind::StringOrArray,
                    "Column(s) to aggregate from target",
                ),
                ParamSpec::optional("by", ParamKind::String, "Grouping column"),
                ParamSpec::optional(
                    "FUN",
                    ParamKind::String,
                    "Aggregation function (sum, mean, median, min, max)",
                )
                .with_default(json!("sum")),
                ParamSpec::optional("na_rm", ParamKind::Bool, "Remove NA values")
                    .with_default(json!(true)),
                ParamSpec::optional(
                    "weighted",
                    ParamKind::Bool,
                    "Use weighted aggregation by overlap width",
                )
                .with_default(json!(false)),
                ParamSpec::optional(
                    "mean",
                    ParamKind::Bool,
                    "Return mean instead of sum for numeric values",
                )
                .with_default(json!(false)),
                ParamSpec::optional(
                    "ignore_strand",
                    ParamKind::Bool,
                    "Ignore strand when finding overlaps",
                )
                .with_default(json!(true)),
            ],
            render: render_gr_val,
        },
        OpSpec {
            name: "gutils_gr_sum",
            description: "Aggregate values across GRanges",
            group: OpGroup::Aggregate,
            result: ResultKind::Table,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Ranges with values to aggregate"),
                ParamSpec::required("val", ParamKind::String, "Column to sum"),
                ParamSpec::optional("by", ParamKind::StringOrArray, "Grouping columns"),
                ParamSpec::optional("na_rm", ParamKind::Bool, "Remove NA values")
                    .with_default(json!(true)),
            ],
            render: render_gr_sum,
        },
        OpSpec {
            name: "gutils_gr_quantile",
            description: "Compute quantiles of values in GRanges",
            group: OpGroup::Aggregate,
            result: ResultKind::Generic,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Ranges with values"),
                ParamSpec::required("val", ParamKind::String, "Column to compute quantiles for"),
                ParamSpec::optional("probs", ParamKind::NumberArray, "Quantile probabilities")
                    .with_default(json!([0, 0.25, 0.5, 0.75, 1])),
                ParamSpec::optional("na_rm", ParamKind::Bool, "Remove NA values")
                    .with_default(json!(true)),
            ],
            render: render_gr_quantile,
        },
        OpSpec {
            name: "gutils_gr_breaks",
            description: "Create break points from GRanges for histogram-like operations",
            group: OpGroup::Aggregate,
            result: ResultKind::Generic,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Input ranges"),
                ParamSpec::optional("n", ParamKind::Number, "Number of breaks"),
                ParamSpec::optional("by", ParamKind::String, "Column to compute breaks for"),
            ],
            render: render_gr_breaks,
        },
    ]
}

fn render_gr_val(args: &OpArgs) -> ArgResult<String> {
    let query = ranges_literal(args, "query")?;
    let target = ranges_literal(args, "target")?;
    let mut cmd = format!("gr.val(query = {query}, target = {target}");
    if let Some(vals) = args.get_strings("val")? {
        match vals.as_slice() {
            [single] => cmd.push_str(&format!(", val = {}", r_string(single))),
            many => cmd.push_str(&format!(", val = {}", quoted_vec(many))),
        }
    }
    if let Some(by) = args.get_str("by")? {
        cmd.push_str(&format!(", by = {}", r_string(by)));
    }
    // FUN is an R function name, passed bare: gr.val(..., FUN = mean).
    if let Some(fun) = args.get_str("FUN")? {
        cmd.push_str(&format!(", FUN = {fun}"));
    }
    push_bool(&mut cmd, args, "na_rm", "na.rm")?;
    push_bool(&mut cmd, args, "weighted", "weighted")?;
    push_bool(&mut cmd, args, "mean", "mean")?;
    push_bool(&mut cmd, args, "ignore_strand", "ignore.strand")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_gr_sum(args: &OpArgs) -> ArgResult<String> {
    let ranges = ranges_literal(args, "ranges")?;
    let val = args.require_str("val")?;
    let mut cmd = format!("gr.sum({ranges}, val = {}", r_string(val));
    if let Some(by) = args.get_strings("by")? {
        match by.as_slice() {
            [] => {}
            [single] => cmd.push_str(&format!(", by = {}", r_string(single))),
            many => cmd.push_str(&format!(", by = {}", quoted_vec(many))),
        }
    }
    push_bool(&mut cmd, args, "na_rm", "na.rm")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_gr_quantile(args: &OpArgs) -> ArgResult<String> {
    let ranges = ranges_literal(args, "ranges")?;
    let val = args.require_str("val")?;
    let mut cmd = format!("gr.quantile({ranges}, val = {}", r_string(val));
    if let Some(probs) = args.get_nums("probs")? {
        cmd.push_str(&format!(", probs = c({})", probs.join(", ")));
    }
    push_bool(&mut cmd, args, "na_rm", "na.rm")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_gr_breaks(args: &OpArgs) -> ArgResult<String> {
    let mut cmd = format!("gr.breaks({}", ranges_literal(args, "ranges")?);
    push_num(&mut cmd, args, "n", "n")?;
    if let Some(by) = args.get_str("by")? {
        cmd.push_str(&format!(", by = {}", r_string(by)));
    }
    cmd.push(')');
    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(v: serde_json::Value) -> OpArgs {
        OpArgs::new(v.as_object().cloned().unwrap())
    }

    fn one_range() -> serde_json::Value {
        json!([{"seqnames": "chr1", "start": 1, "end": 100}])
    }

    #[test]
    fn gr_val_keeps_fun_bare_and_quotes_val() {
        let cmd = render_gr_val(&args(json!({
            "query": one_range(),
            "target": one_range(),
            "val": "score",
            "FUN": "mean",
            "na_rm": true,
            "weighted": false
        })))
        .unwrap();
        assert!(cmd.contains(", val = \"score\""));
        assert!(cmd.contains(", FUN = mean"));
        assert!(cmd.contains(", na.rm = TRUE, weighted = FALSE)"));
    }

    #[test]
    fn gr_val_accepts_multiple_value_columns() {
        let cmd = render_gr_val(&args(json!({
            "query": one_range(),
            "target": one_range(),
            "val": ["score", "depth"]
        })))
        .unwrap();
        assert!(cmd.contains(", val = c(\"score\", \"depth\")"));
    }

    #[test]
    fn gr_sum_requires_val() {
        let err = render_gr_sum(&args(json!({"ranges": one_range()}))).unwrap_err();
        assert!(err.to_string().contains("'val'"));
    }

    #[test]
    fn gr_sum_by_single_or_many() {
        let single = render_gr_sum(&args(json!({
            "ranges": one_range(), "val": "cn", "by": "sample"
        })))
        .unwrap();
        assert!(single.contains(", by = \"sample\""));

        let many = render_gr_sum(&args(json!({
            "ranges": one_range(), "val": "cn", "by": ["sample", "batch"]
        })))
        .unwrap();
        assert!(many.contains(", by = c(\"sample\", \"batch\")"));
    }

    #[test]
    fn gr_quantile_renders_probs_vector() {
        let cmd = render_gr_quantile(&args(json!({
            "ranges": one_range(),
            "val": "score",
            "probs": [0, 0.5, 1],
            "na_rm": true
        })))
        .unwrap();
        assert!(cmd.contains("val = \"score\", probs = c(0, 0.5, 1), na.rm = TRUE)"));
    }

    #[test]
    fn gr_breaks_options_are_optional() {
        let cmd = render_gr_breaks(&args(json!({"ranges": one_range()}))).unwrap();
        assert!(cmd.starts_with("gr.breaks(GRanges("));
        assert!(!cmd.contains("n ="));
    }
}
