//! Data conversion operations: between range collections, tables, and
//! UCSC-style coordinate strings.

use serde_json::json;

use crate::args::{ArgResult, OpArgs};
use crate::format::{format_json, r_string};

use super::{
    push_str, quoted_vec, ranges_literal, OpGroup, OpSpec, ParamKind, ParamSpec, ResultKind,
};

const GENOMES: &[&str] = &["hg19", "hg38", "mm10", "mm39"];

pub(super) fn specs() -> Vec<OpSpec> {
    vec![
        OpSpec {
            name: "gutils_gr2dt",
            description: "Convert GRanges to data.table with genomic columns and metadata",
            group: OpGroup::Convert,
            result: ResultKind::Table,
            params: vec![ParamSpec::required(
                "ranges",
                ParamKind::Ranges,
                "Array of genomic ranges",
            )],
            render: render_gr2dt,
        },
        OpSpec {
            name: "gutils_dt2gr",
            description: "Convert data.table/data.frame to GRanges object",
            group: OpGroup::Convert,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required("data", ParamKind::Object, "Data table with genomic columns"),
                ParamSpec::optional(
                    "seqlengths",
                    ParamKind::Object,
                    "Optional chromosome lengths",
                ),
                ParamSpec::optional(
                    "genome",
                    ParamKind::String,
                    "Optional genome version (e.g., hg19, hg38)",
                ),
            ],
            render: render_dt2gr,
        },
        OpSpec {
            name: "gutils_parse_gr",
            description: "Parse UCSC/IGV-style genomic coordinates (chr:start-end) into GRanges",
            group: OpGroup::Convert,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required(
                    "coordinates",
                    ParamKind::StringArray,
                    "Array of coordinate strings (e.g., [\"chr1:1000-2000\", \"chr2:5000-6000:+\"])",
                ),
                ParamSpec::optional(
                    "genome",
                    ParamKind::String,
                    "Optional genome version for validation",
                ),
            ],
            render: render_parse_gr,
        },
        OpSpec {
            name: "gutils_parse_grl",
            description: "Parse semicolon-separated coordinate strings into GRangesList",
            group: OpGroup::Convert,
            result: ResultKind::RangesList,
            params: vec![
                ParamSpec::required(
                    "coordinates",
                    ParamKind::StringArray,
                    "Array of semicolon-separated coordinate strings",
                ),
                ParamSpec::optional("genome", ParamKind::String, "Optional genome version"),
            ],
            render: render_parse_grl,
        },
        OpSpec {
            name: "gutils_seg2gr",
            description: "Convert segment-style data.frame to GRanges",
            group: OpGroup::Convert,
            result: ResultKind::Ranges,
            params: vec![ParamSpec::required(
                "segments",
                ParamKind::Object,
                "Segment data with flexible column naming",
            )],
            render: render_seg2gr,
        },
        OpSpec {
            name: "gutils_si2gr",
            description: "Create GRanges covering entire chromosomes from Seqinfo",
            group: OpGroup::Convert,
            result: ResultKind::Ranges,
            params: vec![
                ParamSpec::required(
                    "genome",
                    ParamKind::Enum(GENOMES),
                    "Genome version (e.g., hg19, hg38)",
                ),
                ParamSpec::optional(
                    "chromosomes",
                    ParamKind::StringArray,
                    "Optional subset of chromosomes",
                ),
            ],
            render: render_si2gr,
        },
        OpSpec {
            name: "gutils_gr_string",
            description: "Convert GRanges to UCSC coordinate strings",
            group: OpGroup::Convert,
            result: ResultKind::Generic,
            params: vec![
                ParamSpec::required("ranges", ParamKind::Ranges, "Array of genomic ranges"),
                ParamSpec::optional(
                    "add_strand",
                    ParamKind::Bool,
                    "Include strand in output string",
                )
                .with_default(json!(false)),
            ],
            render: render_gr_string,
        },
    ]
}

fn render_gr2dt(args: &OpArgs) -> ArgResult<String> {
    Ok(format!("gr2dt({})", ranges_literal(args, "ranges")?))
}

fn render_dt2gr(args: &OpArgs) -> ArgResult<String> {
    let data = format_json(&serde_json::Value::Object(
        args.require_object("data")?.clone(),
    ));
    let mut cmd = format!("dt2gr({data}");
    if let Some(seqlengths) = args.get_object("seqlengths")? {
        let entries: Vec<String> = seqlengths
            .iter()
            .map(|(chr, len)| format!("{} = {}", r_string(chr), format_json(len)))
            .collect();
        cmd.push_str(&format!(", seqlengths = c({})", entries.join(", ")));
    }
    push_str(&mut cmd, args, "genome", "genome")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_parse_gr(args: &OpArgs) -> ArgResult<String> {
    let coords = args.get_strings("coordinates")?.unwrap_or_default();
    let mut cmd = format!("parse.gr({}", quoted_vec(&coords));
    push_str(&mut cmd, args, "genome", "genome")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_parse_grl(args: &OpArgs) -> ArgResult<String> {
    let coords = args.get_strings("coordinates")?.unwrap_or_default();
    let mut cmd = format!("parse.grl({}", quoted_vec(&coords));
    push_str(&mut cmd, args, "genome", "genome")?;
    cmd.push(')');
    Ok(cmd)
}

fn render_seg2gr(args: &OpArgs) -> ArgResult<String> {
    let segments = format_json(&serde_json::Value::Object(
        args.require_object("segments")?.clone(),
    ));
    Ok(format!("seg2gr({segments})"))
}

fn render_si2gr(args: &OpArgs) -> ArgResult<String> {
    let genome = args.require_str("genome")?;
    let pkg = format!("BSgenome.Hsapiens.UCSC.{genome}::BSgenome.Hsapiens.UCSC.{genome}");
    match args.get_strings("chromosomes")? {
        Some(chrs) if !chrs.is_empty() => Ok(format!(
            "si2gr(seqinfo({pkg})[{}])",
            quoted_vec(&chrs)
        )),
        _ => Ok(format!("si2gr({pkg})")),
    }
}

fn render_gr_string(args: &OpArgs) -> ArgResult<String> {
    let mut cmd = format!("gr.string({}", ranges_literal(args, "ranges")?);
    // Only emitted when requested; the R default is already FALSE.
    if args.get_bool("add_strand")? == Some(true) {
        cmd.push_str(", add.strand = TRUE");
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

    #[test]
    fn gr2dt_wraps_the_collection() {
        let cmd = render_gr2dt(&args(json!({
            "ranges": [{"seqnames": "chr1", "start": 1, "end": 10}]
        })))
        .unwrap();
        assert_eq!(
            cmd,
            "gr2dt(GRanges(seqnames = c(\"chr1\"), \
             ranges = IRanges(start = c(1), end = c(10)), strand = c(\"*\")))"
        );
    }

    #[test]
    fn dt2gr_renders_columns_and_seqlengths() {
        let cmd = render_dt2gr(&args(json!({
            "data": {"seqnames": ["chr1"], "start": [1], "end": [10]},
            "seqlengths": {"chr1": 249250621},
            "genome": "hg19"
        })))
        .unwrap();
        assert_eq!(
            cmd,
            "dt2gr(list(seqnames = c(\"chr1\"), start = c(1), end = c(10)), \
             seqlengths = c(\"chr1\" = 249250621), genome = \"hg19\")"
        );
    }

    #[test]
    fn parse_gr_quotes_coordinates() {
        let cmd = render_parse_gr(&args(json!({
            "coordinates": ["chr1:1000-2000", "chr2:5000-6000:+"]
        })))
        .unwrap();
        assert_eq!(cmd, "parse.gr(c(\"chr1:1000-2000\", \"chr2:5000-6000:+\"))");
    }

    #[test]
    fn parse_grl_takes_optional_genome() {
        let cmd = render_parse_grl(&args(json!({
            "coordinates": ["chr1:1-10;chr1:20-30"],
            "genome": "hg38"
        })))
        .unwrap();
        assert_eq!(
            cmd,
            "parse.grl(c(\"chr1:1-10;chr1:20-30\"), genome = \"hg38\")"
        );
    }

    #[test]
    fn si2gr_names_the_bsgenome_package() {
        let cmd = render_si2gr(&args(json!({"genome": "hg19"}))).unwrap();
        assert_eq!(
            cmd,
            "si2gr(BSgenome.Hsapiens.UCSC.hg19::BSgenome.Hsapiens.UCSC.hg19)"
        );
    }

    #[test]
    fn si2gr_subsets_seqinfo_when_chromosomes_given() {
        let cmd = render_si2gr(&args(json!({
            "genome": "hg38",
            "chromosomes": ["chr1", "chrX"]
        })))
        .unwrap();
        assert_eq!(
            cmd,
            "si2gr(seqinfo(BSgenome.Hsapiens.UCSC.hg38::BSgenome.Hsapiens.UCSC.hg38)\
             [c(\"chr1\", \"chrX\")])"
        );
    }

    #[test]
    fn gr_string_emits_add_strand_only_when_true() {
        let base = json!({"ranges": [{"seqnames": "chr1", "start": 1, "end": 2}]});
        let cmd = render_gr_string(&args(base.clone())).unwrap();
        assert!(!cmd.contains("add.strand"));

        let mut with_flag = base;
        with_flag["add_strand"] = json!(true);
        let cmd = render_gr_string(&args(with_flag)).unwrap();
        assert!(cmd.ends_with(", add.strand = TRUE)"));
    }
}
