//! Utility operations: seqlevel fixes, distances, duplicates, binding.

use grbridge_types::GRanges;
use serde_json::json;

use crate::args::{ArgError, ArgResult, OpArgs};
use crate::format::{format_granges, format_json, r_bool, r_string};

use super::{
    push_bool, quoted_vec, ranges_literal, OpGroup, OpSpec, ParamKind, ParamSpec, ResultKind,
};

const GENOMES: &[&str] = &["hg19", "hg38", "mm10", "mm39"];
const HUMAN_GENOMES: &[&str] = &["hg19", "hg38"];

pub(super) fn specs() -> Vec<OpSpec> {
    vec![
        OpSpec {
            name: "gutils_hg_seqlengths",
            description: "Get standard human genome chromosome lengths",
            group: OpGroup::Util,
            result: ResultKind::Generic,
            params: vec![
                ParamSpec::optional("genome", ParamKind::Enum(HUMAN_GENOMES), "Genome version")
                    .with_default(json!("hg19")),
                ParamSpec::optional("chr", ParamKind::Bool, "Include chr prefix")
                    .with_default(json!(true)),
                ParamSpec::optional(
                    "include_junk",
                    ParamKind::Bool,
                    "Include non-standard chromosomes",
                )
                .with_default(json!(false)),
            ],
            render: render_hg_seqlengths,
        },
        OpSpec {
            name: "gutils_gr_fix",
            description: "Standardize seqlevels and seqlengths to genome",
            group: OpGroup::Util,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Ranges to fix"),
                ParamSpec::optional(
                    "genome",
                    ParamKind::Enum(GENOMES),
                    "Genome to standardize to",
                ),
            ],
            render: |args| render_genome_fix("gr.fix", args),
        },
        OpSpec {
            name: "gutils_gr_fixseq",
            description: "Fix sequence information for GRanges",
            group: OpGroup::Util,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Ranges to fix"),
                ParamSpec::optional("genome", ParamKind::Enum(GENOMES), "Genome version"),
            ],
            render: |args| render_genome_fix("gr.fixseq", args),
        },
        OpSpec {
            name: "gutils_gr_chr",
            description: "Add chr prefix to seqlevels",
            group: OpGroup::Util,
            result: ResultKind::Ranges,
            params: vec![ParamSpec::required("ranges", ParamKind::Ranges, "Ranges to modify")],
            render: |args| Ok(format!("gr.chr({})", ranges_literal(args, "ranges")?)),
        },
        OpSpec {
            name: "gutils_gr_nochr",
            description: "Remove chr prefix from seqlevels",
            group: OpGroup::Util,
            result: ResultKind::Ranges,
            params: vec![ParamSpec::required("ranges", ParamKind::Ranges, "Ranges to modify")],
            render: |args| Ok(format!("gr.nochr({})", ranges_literal(args, "ranges")?)),
        },
        OpSpec {
            name: "gutils_gr_sub",
            description: "Apply regex substitution to seqlevels",
            group: OpGroup::Util,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Ranges to modify"),
                ParamSpec::required("pattern", ParamKind::String, "Regex pattern to match"),
                ParamSpec::required("replacement", ParamKind::String, "Replacement string"),
            ],
            render: render_gr_sub,
        },
        OpSpec {
            name: "gutils_gr_dice",
            description: "Split ranges into width-1 pieces (WARNING: can create very large objects)",
            group: OpGroup::Util,
            result: ResultKind::Ranges,
            params: vec![ParamSpec::required("ranges", ParamKind::Ranges, "Ranges to dice")],
            render: |args| Ok(format!("gr.dice({})", ranges_literal(args, "ranges")?)),
        },
        OpSpec {
            name: "gutils_gr_dist",
            description: "Calculate pairwise distances between ranges",
            group: OpGroup::Util,
            result: ResultKind::Generic,
            params: vec![
                ParamSpec::required("x", ParamKind::Ranges, "First set of ranges"),
                ParamSpec::required("y", ParamKind::Ranges, "Second set of ranges"),
                ParamSpec::optional(
                    "ignore_strand",
                    ParamKind::Bool,
                    "Ignore strand when calculating distance",
                )
                .with_default(json!(true)),
            ],
            render: render_gr_dist,
        },
        OpSpec {
            name: "gutils_gr_duplicated",
            description: "Find duplicate ranges with flexible matching",
            group: OpGroup::Util,
            result: ResultKind::Generic,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Ranges to check for duplicates"),
                ParamSpec::optional(
                    "by",
                    ParamKind::StringArray,
                    "Metadata columns to include in duplicate check",
                ),
                ParamSpec::optional(
                    "ignore_strand",
                    ParamKind::Bool,
                    "Ignore strand when checking duplicates",
                )
                .with_default(json!(false)),
            ],
            render: render_gr_duplicated,
        },
        OpSpec {
            name: "gutils_gr_flatten",
            description: "Lay ranges end-to-end on virtual chromosome",
            group: OpGroup::Util,
            result: ResultKind::Ranges,
            params: vec![ParamSpec::required("ranges", ParamKind::Ranges, "Ranges to flatten")],
            render: |args| Ok(format!("gr.flatten({})", ranges_literal(args, "ranges")?)),
        },
        OpSpec {
            name: "gutils_grbind",
            description: "Concatenate GRanges objects robustly",
            group: OpGroup::Util,
            result: ResultKind::Ranges,
            params: vec![ParamSpec::required(
                "ranges_list",
                ParamKind::RangesArray,
                "List of GRanges to concatenate",
            )],
            render: render_grbind,
        },
        OpSpec {
            name: "gutils_rrbind",
            description: "Improved row binding for data.frames/data.tables",
            group: OpGroup::Util,
            result: ResultKind::Table,
            params: vec![
                ParamSpec::required("tables", ParamKind::ObjectArray, "List of tables to bind"),
                ParamSpec::optional("fill", ParamKind::Bool, "Fill missing columns with NA")
                    .with_default(json!(true)),
            ],
            render: render_rrbind,
        },
    ]
}

fn render_hg_seqlengths(args: &OpArgs) -> ArgResult<String> {
    let mut parts = Vec::new();
    if let Some(genome) = args.get_str("genome")? {
        parts.push(format!("genome = {}", r_string(genome)));
    }
    if let Some(chr) = args.get_bool("chr")? {
        parts.push(format!("chr = {}", r_bool(chr)));
    }
    if let Some(junk) = args.get_bool("include_junk")? {
        parts.push(format!("include.junk = {}", r_bool(junk)));
    }
    Ok(format!("hg_seqlengths({})", parts.join(", ")))
}

fn render_genome_fix(func: &str, args: &OpArgs) -> ArgResult<String> {
    let mut cmd = format!("{func}({}", ranges_literal(args, "ranges")?);
    if let Some(genome) = args.get_str("genome")? {
        cmd.push_str(&format!(", genome = {}", r_string(genome)));
    }
    cmd.push(')');
    Ok(cmd)
}

fn render_gr_sub(args: &OpArgs) -> ArgResult<String> {
    let ranges = ranges_literal(args, "ranges")?;
    let pattern = args.require_str("pattern")?;
    let replacement = args.require_str("replacement")?;
    Ok(format!(
        "gr.sub({ranges}, pattern = {}, replacement = {})",
        r_string(pattern),
        r_string(replacement)
    ))
}

fn render_gr_dist(args: &OpArgs) -> ArgResult<String> {
    let x = ranges_literal(args, "x")?;
    let y = ranges_literal(args, "y")?;
    let mut cmd = format!("gr.dist(x = {x}, y = {y}");
    push_bool(&mut cmd, args, "ignore_strand", "ignore.strand")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_gr_duplicated(args: &OpArgs) -> ArgResult<String> {
    let mut cmd = format!("gr.duplicated({}", ranges_literal(args, "ranges")?);
    if let Some(by) = args.get_strings("by")? {
        if !by.is_empty() {
            cmd.push_str(&format!(", by = {}", quoted_vec(&by)));
        }
    }
    push_bool(&mut cmd, args, "ignore_strand", "ignore.strand")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_grbind(args: &OpArgs) -> ArgResult<String> {
    let collections = args.require_array("ranges_list")?;
    let mut literals = Vec::with_capacity(collections.len());
    for (i, item) in collections.iter().enumerate() {
        let gr: GRanges = serde_json::from_value(item.clone()).map_err(|e| {
            ArgError::new(format!("'ranges_list' element {i} is not a range collection: {e}"))
        })?;
        literals.push(format_granges(&gr));
    }
    Ok(format!("grbind({})", literals.join(", ")))
}

fn render_rrbind(args: &OpArgs) -> ArgResult<String> {
    let tables = args.require_array("tables")?;
    let literals: Vec<String> = tables.iter().map(format_json).collect();
    let mut cmd = format!("rrbind(list({})", literals.join(", "));
    push_bool(&mut cmd, args, "fill", "fill")?;
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
        json!([{"seqnames": "1", "start": 1, "end": 100}])
    }

    #[test]
    fn hg_seqlengths_joins_arguments_cleanly() {
        let cmd = render_hg_seqlengths(&args(json!({
            "genome": "hg38", "chr": false, "include_junk": false
        })))
        .unwrap();
        assert_eq!(
            cmd,
            "hg_seqlengths(genome = \"hg38\", chr = FALSE, include.junk = FALSE)"
        );
    }

    #[test]
    fn hg_seqlengths_without_genome_has_no_dangling_comma() {
        let cmd = render_hg_seqlengths(&args(json!({"chr": true}))).unwrap();
        assert_eq!(cmd, "hg_seqlengths(chr = TRUE)");
    }

    #[test]
    fn genome_fix_variants() {
        let cmd = render_genome_fix("gr.fix", &args(json!({
            "ranges": one_range(), "genome": "hg19"
        })))
        .unwrap();
        assert!(cmd.starts_with("gr.fix(GRanges("));
        assert!(cmd.ends_with(", genome = \"hg19\")"));
    }

    #[test]
    fn gr_sub_quotes_pattern_and_replacement() {
        let cmd = render_gr_sub(&args(json!({
            "ranges": one_range(),
            "pattern": "^chr",
            "replacement": ""
        })))
        .unwrap();
        assert!(cmd.ends_with("pattern = \"^chr\", replacement = \"\")"));
    }

    #[test]
    fn gr_dist_names_both_sides() {
        let cmd = render_gr_dist(&args(json!({
            "x": one_range(), "y": one_range(), "ignore_strand": true
        })))
        .unwrap();
        assert!(cmd.starts_with("gr.dist(x = GRanges("));
        assert!(cmd.contains(", y = GRanges("));
        assert!(cmd.ends_with("ignore.strand = TRUE)"));
    }

    #[test]
    fn gr_duplicated_with_by_columns() {
        let cmd = render_gr_duplicated(&args(json!({
            "ranges": one_range(), "by": ["gene"], "ignore_strand": false
        })))
        .unwrap();
        assert!(cmd.contains(", by = c(\"gene\"), ignore.strand = FALSE)"));
    }

    #[test]
    fn grbind_concatenates_collections() {
        let cmd = render_grbind(&args(json!({
            "ranges_list": [one_range(), []]
        })))
        .unwrap();
        assert!(cmd.starts_with("grbind(GRanges(seqnames = c(\"1\")"));
        assert!(cmd.ends_with(", GRanges())"));
    }

    #[test]
    fn rrbind_wraps_tables_in_a_list() {
        let cmd = render_rrbind(&args(json!({
            "tables": [{"a": [1, 2]}, {"b": ["x"]}],
            "fill": true
        })))
        .unwrap();
        assert_eq!(
            cmd,
            "rrbind(list(list(a = c(1, 2)), list(b = c(\"x\"))), fill = TRUE)"
        );
    }
}
