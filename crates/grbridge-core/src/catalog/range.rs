//! Range position and manipulation operations.

use serde_json::json;

use crate::args::{ArgResult, OpArgs};

use super::{
    push_bool, push_num, ranges_literal, OpGroup, OpSpec, ParamKind, ParamSpec, ResultKind,
};

const GENOMES: &[&str] = &["hg19", "hg38", "mm10", "mm39"];

/// Shared parameter for the plain `ranges` input.
fn ranges_param() -> ParamSpec {
    ParamSpec::required("ranges", ParamKind::Ranges, "Input genomic ranges")
}

pub(super) fn specs() -> Vec<OpSpec> {
    vec![
        OpSpec {
            name: "gutils_gr_start",
            description: "Extract start positions as width-n GRanges",
            group: OpGroup::Range,
            result: ResultKind::Ranges,
            params: vec![
                ranges_param(),
                ParamSpec::optional("width", ParamKind::Number, "Width of output ranges")
                    .with_default(json!(1)),
                ParamSpec::optional(
                    "force",
                    ParamKind::Bool,
                    "Force operation even if it extends beyond seqlengths",
                )
                .with_default(json!(false)),
                ParamSpec::optional(
                    "ignore_strand",
                    ParamKind::Bool,
                    "Ignore strand when determining start",
                )
                .with_default(json!(true)),
                ParamSpec::optional("clip", ParamKind::Bool, "Clip to sequence bounds")
                    .with_default(json!(true)),
            ],
            render: render_gr_start,
        },
        OpSpec {
            name: "gutils_gr_end",
            description: "Extract end positions as width-n GRanges",
            group: OpGroup::Range,
            result: ResultKind::Ranges,
            params: vec![
                ranges_param(),
                ParamSpec::optional("width", ParamKind::Number, "Width of output ranges")
                    .with_default(json!(1)),
                ParamSpec::optional(
                    "force",
                    ParamKind::Bool,
                    "Force operation even if it extends beyond seqlengths",
                )
                .with_default(json!(false)),
                ParamSpec::optional(
                    "ignore_strand",
                    ParamKind::Bool,
                    "Ignore strand when determining end",
                )
                .with_default(json!(true)),
                ParamSpec::optional("clip", ParamKind::Bool, "Clip to sequence bounds")
                    .with_default(json!(true)),
            ],
            render: render_gr_end,
        },
        OpSpec {
            name: "gutils_gr_mid",
            description: "Get midpoints of ranges as width-1 GRanges",
            group: OpGroup::Range,
            result: ResultKind::Ranges,
            params: vec![ranges_param()],
            render: |args| Ok(format!("gr.mid({})", ranges_literal(args, "ranges")?)),
        },
        OpSpec {
            name: "gutils_gr_flipstrand",
            description: "Flip strand orientation (+ to -, - to +)",
            group: OpGroup::Range,
            result: ResultKind::Ranges,
            params: vec![ranges_param()],
            render: |args| Ok(format!("gr.flipstrand({})", ranges_literal(args, "ranges")?)),
        },
        OpSpec {
            name: "gutils_gr_stripstrand",
            description: "Remove strand information (set to *)",
            group: OpGroup::Range,
            result: ResultKind::Ranges,
            params: vec![ranges_param()],
            render: |args| Ok(format!("gr.stripstrand({})", ranges_literal(args, "ranges")?)),
        },
        OpSpec {
            name: "gutils_gr_trim",
            description: "Trim GRanges relative to local coordinates",
            group: OpGroup::Range,
            result: ResultKind::Ranges,
            params: vec![
                ranges_param(),
                ParamSpec::optional("start", ParamKind::Number, "Local start position for trimming"),
                ParamSpec::optional("end", ParamKind::Number, "Local end position for trimming"),
            ],
            render: render_gr_trim,
        },
        OpSpec {
            name: "gutils_gr_pairflip",
            description: "Create pairs of ranges with original and flipped strands",
            group: OpGroup::Range,
            result: ResultKind::Ranges,
            params: vec![ranges_param()],
            render: |args| Ok(format!("gr.pairflip({})", ranges_literal(args, "ranges")?)),
        },
        OpSpec {
            name: "gutils_gr_noval",
            description: "Remove all metadata columns from GRanges",
            group: OpGroup::Range,
            result: ResultKind::Ranges,
            params: vec![ranges_param()],
            render: |args| Ok(format!("gr.noval({})", ranges_literal(args, "ranges")?)),
        },
        OpSpec {
            name: "gutils_gr_tile",
            description: "Tile intervals into segments of specified width",
            group: OpGroup::Range,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Input genomic ranges to tile"),
                ParamSpec::optional("width", ParamKind::Number, "Maximum width of each tile")
                    .with_default(json!(1000)),
                ParamSpec::optional(
                    "stranded",
                    ParamKind::Bool,
                    "Preserve strand information in tiles",
                )
                .with_default(json!(false)),
            ],
            render: render_gr_tile,
        },
        OpSpec {
            name: "gutils_gr_rand",
            description: "Generate random non-overlapping GRanges",
            group: OpGroup::Range,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("n", ParamKind::Number, "Number of random ranges to generate"),
                ParamSpec::required("width", ParamKind::NumberOrArray, "Width(s) of ranges"),
                ParamSpec::required(
                    "genome",
                    ParamKind::Enum(GENOMES),
                    "Genome version (e.g., hg19, hg38)",
                ),
            ],
            render: render_gr_rand,
        },
        OpSpec {
            name: "gutils_gr_sample",
            description: "Randomly sample intervals within a territory",
            group: OpGroup::Range,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("territory", ParamKind::Ranges, "Territory to sample from"),
                ParamSpec::required("n", ParamKind::Number, "Number of samples to take"),
                ParamSpec::optional("replace", ParamKind::Bool, "Sample with replacement")
                    .with_default(json!(false)),
            ],
            render: render_gr_sample,
        },
    ]
}

/// `gr.start`/`gr.end` share one option set.
fn render_position(func: &str, args: &OpArgs) -> ArgResult<String> {
    let mut cmd = format!("{func}({}", ranges_literal(args, "ranges")?);
    push_num(&mut cmd, args, "width", "width")?;
    push_bool(&mut cmd, args, "force", "force")?;
    push_bool(&mut cmd, args, "ignore_strand", "ignore.strand")?;
    push_bool(&mut cmd, args, "clip", "clip")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_gr_start(args: &OpArgs) -> ArgResult<String> {
    render_position("gr.start", args)
}

fn render_gr_end(args: &OpArgs) -> ArgResult<String> {
    render_position("gr.end", args)
}

fn render_gr_trim(args: &OpArgs) -> ArgResult<String> {
    let mut cmd = format!("gr.trim({}", ranges_literal(args, "ranges")?);
    push_num(&mut cmd, args, "start", "start")?;
    push_num(&mut cmd, args, "end", "end")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_gr_tile(args: &OpArgs) -> ArgResult<String> {
    let mut cmd = format!("gr.tile({}", ranges_literal(args, "ranges")?);
    push_num(&mut cmd, args, "width", "width")?;
    push_bool(&mut cmd, args, "stranded", "stranded")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_gr_rand(args: &OpArgs) -> ArgResult<String> {
    let n = args.require_num("n")?;
    let width = args.require_num_or_vec("width")?;
    let genome = args.require_str("genome")?;
    Ok(format!(
        "gr.rand(N = {n}, width = {width}, \
         genome = BSgenome.Hsapiens.UCSC.{genome}::BSgenome.Hsapiens.UCSC.{genome})"
    ))
}

fn render_gr_sample(args: &OpArgs) -> ArgResult<String> {
    let territory = ranges_literal(args, "territory")?;
    let n = args.require_num("n")?;
    let mut cmd = format!("gr.sample({territory}, N = {n}");
    push_bool(&mut cmd, args, "replace", "replace")?;
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

    const GR: &str = "GRanges(seqnames = c(\"chr1\"), \
                      ranges = IRanges(start = c(100), end = c(200)), strand = c(\"+\"))";

    fn one_range() -> serde_json::Value {
        json!([{"seqnames": "chr1", "start": 100, "end": 200, "strand": "+"}])
    }

    #[test]
    fn gr_start_renders_all_options() {
        let cmd = render_gr_start(&args(json!({
            "ranges": one_range(),
            "width": 5,
            "force": true,
            "ignore_strand": false,
            "clip": true
        })))
        .unwrap();
        assert_eq!(
            cmd,
            format!("gr.start({GR}, width = 5, force = TRUE, ignore.strand = FALSE, clip = TRUE)")
        );
    }

    #[test]
    fn gr_end_omits_absent_options() {
        let cmd = render_gr_end(&args(json!({"ranges": one_range()}))).unwrap();
        assert_eq!(cmd, format!("gr.end({GR})"));
    }

    #[test]
    fn simple_unary_operations() {
        let a = args(json!({"ranges": one_range()}));
        let catalog: Vec<(&str, &str)> = vec![
            ("gutils_gr_mid", "gr.mid"),
            ("gutils_gr_flipstrand", "gr.flipstrand"),
            ("gutils_gr_stripstrand", "gr.stripstrand"),
            ("gutils_gr_pairflip", "gr.pairflip"),
            ("gutils_gr_noval", "gr.noval"),
        ];
        for (op, func) in catalog {
            let spec = specs().into_iter().find(|s| s.name == op).unwrap();
            let cmd = (spec.render)(&a).unwrap();
            assert_eq!(cmd, format!("{func}({GR})"), "for {op}");
        }
    }

    #[test]
    fn gr_trim_takes_local_coordinates() {
        let cmd = render_gr_trim(&args(json!({
            "ranges": one_range(),
            "start": 10,
            "end": 50
        })))
        .unwrap();
        assert_eq!(cmd, format!("gr.trim({GR}, start = 10, end = 50)"));
    }

    #[test]
    fn gr_tile_width_and_strandedness() {
        let cmd = render_gr_tile(&args(json!({
            "ranges": one_range(),
            "width": 1000,
            "stranded": false
        })))
        .unwrap();
        assert_eq!(cmd, format!("gr.tile({GR}, width = 1000, stranded = FALSE)"));
    }

    #[test]
    fn gr_rand_expands_the_genome_package() {
        let cmd = render_gr_rand(&args(json!({
            "n": 10,
            "width": [100, 200],
            "genome": "hg38"
        })))
        .unwrap();
        assert_eq!(
            cmd,
            "gr.rand(N = 10, width = c(100, 200), \
             genome = BSgenome.Hsapiens.UCSC.hg38::BSgenome.Hsapiens.UCSC.hg38)"
        );
    }

    #[test]
    fn gr_sample_uses_capital_n() {
        let cmd = render_gr_sample(&args(json!({
            "territory": one_range(),
            "n": 3,
            "replace": true
        })))
        .unwrap();
        assert_eq!(cmd, format!("gr.sample({GR}, N = 3, replace = TRUE)"));
    }

    #[test]
    fn gr_rand_requires_genome() {
        let err = render_gr_rand(&args(json!({"n": 1, "width": 10}))).unwrap_err();
        assert!(err.to_string().contains("'genome'"));
    }
}
