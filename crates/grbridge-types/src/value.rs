//! RValue — the domain value union that flows through the bridge.
//!
//! Dispatch results are one of the typed genomic shapes, or raw JSON for
//! scalar/generic results (counts, booleans, distances, coordinate strings).
//! `to_json` renders the response shape handed back to MCP clients; it is
//! the one place the derived `width` field is materialized.

use serde_json::{Map, Value};

use crate::ranges::{GRanges, GRangesList, GenomicRange};
use crate::table::DataTable;

/// A domain value produced or consumed by the bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum RValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<RValue>),
    Ranges(GRanges),
    RangesList(GRangesList),
    Table(DataTable),
    /// Raw passthrough for generic interpreter results.
    Json(Value),
}

impl RValue {
    /// Render the client-facing JSON for this value.
    pub fn to_json(&self) -> Value {
        match self {
            RValue::Null => Value::Null,
            RValue::Bool(b) => Value::Bool(*b),
            RValue::Int(i) => Value::Number((*i).into()),
            RValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            RValue::String(s) => Value::String(s.clone()),
            RValue::Array(items) => Value::Array(items.iter().map(RValue::to_json).collect()),
            RValue::Ranges(gr) => ranges_to_json(gr),
            RValue::RangesList(grl) => Value::Array(
                grl.iter()
                    .map(|g| {
                        let mut obj = Map::new();
                        obj.insert("id".into(), Value::String(g.id.clone()));
                        obj.insert("ranges".into(), ranges_to_json(&g.ranges));
                        Value::Object(obj)
                    })
                    .collect(),
            ),
            RValue::Table(t) => {
                let mut obj = Map::new();
                obj.insert("columns".into(), Value::Object(t.columns.clone()));
                obj.insert("nrows".into(), Value::Number(t.nrows.into()));
                Value::Object(obj)
            }
            RValue::Json(v) => v.clone(),
        }
    }
}

fn ranges_to_json(gr: &GRanges) -> Value {
    Value::Array(gr.iter().map(range_to_json).collect())
}

fn range_to_json(r: &GenomicRange) -> Value {
    let mut obj = Map::new();
    obj.insert("seqnames".into(), Value::String(r.seqnames.clone()));
    obj.insert("start".into(), Value::Number(r.start.into()));
    obj.insert("end".into(), Value::Number(r.end.into()));
    obj.insert("strand".into(), Value::String(r.strand.as_str().into()));
    obj.insert("width".into(), Value::Number(r.width().into()));
    if !r.metadata.is_empty() {
        obj.insert("metadata".into(), Value::Object(r.metadata.clone()));
    }
    Value::Object(obj)
}

impl From<GRanges> for RValue {
    fn from(gr: GRanges) -> Self {
        RValue::Ranges(gr)
    }
}

impl From<GRangesList> for RValue {
    fn from(grl: GRangesList) -> Self {
        RValue::RangesList(grl)
    }
}

impl From<DataTable> for RValue {
    fn from(t: DataTable) -> Self {
        RValue::Table(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranges::{NamedRanges, Strand};
    use serde_json::json;

    #[test]
    fn ranges_json_includes_derived_width() {
        let gr: GRanges = vec![GenomicRange::new("chr1", 1000, 2000, Strand::Forward)].into();
        let out = RValue::Ranges(gr).to_json();
        assert_eq!(
            out,
            json!([{
                "seqnames": "chr1",
                "start": 1000,
                "end": 2000,
                "strand": "+",
                "width": 1001
            }])
        );
    }

    #[test]
    fn empty_ranges_json_is_empty_array() {
        assert_eq!(RValue::Ranges(GRanges::new()).to_json(), json!([]));
    }

    #[test]
    fn metadata_survives_rendering() {
        let mut r = GenomicRange::new("chr1", 1, 5, Strand::Unstranded);
        r.metadata.insert("gene".into(), json!("TP53"));
        let out = RValue::Ranges(vec![r].into()).to_json();
        assert_eq!(out[0]["metadata"]["gene"], json!("TP53"));
    }

    #[test]
    fn ranges_list_json_keeps_labels_in_order() {
        let grl: GRangesList = vec![
            NamedRanges {
                id: "b".into(),
                ranges: vec![GenomicRange::new("chr2", 1, 2, Strand::Reverse)].into(),
            },
            NamedRanges { id: "a".into(), ranges: GRanges::new() },
        ]
        .into();
        let out = RValue::RangesList(grl).to_json();
        assert_eq!(out[0]["id"], json!("b"));
        assert_eq!(out[1]["id"], json!("a"));
        assert_eq!(out[1]["ranges"], json!([]));
    }

    #[test]
    fn generic_json_passes_through() {
        let v = json!({"count": 3});
        assert_eq!(RValue::Json(v.clone()).to_json(), v);
    }

    #[test]
    fn non_finite_float_renders_null() {
        assert_eq!(RValue::Float(f64::NAN).to_json(), Value::Null);
    }
}
