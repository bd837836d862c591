//! Deserialization of tagged interpreter output into domain values.
//!
//! The wrapper declares the result kind; this module only reconstructs the
//! payload for that kind. A failed outcome becomes an execution error
//! carrying the interpreter's message verbatim.

use grbridge_types::{DataTable, GRanges, GRangesList, GenomicRange, NamedRanges, RValue, Strand};
use serde_json::{Map, Value};

use crate::error::{BridgeError, BridgeResult};
use crate::executor::{ExecOutcome, ResultTag};

/// jsonlite boxes scalars in one-element arrays; peel one layer off.
pub(crate) fn unbox(v: &Value) -> &Value {
    match v {
        Value::Array(items) if items.len() == 1 => &items[0],
        _ => v,
    }
}

/// Turn an execution outcome into a typed domain value.
pub fn deserialize(outcome: ExecOutcome) -> BridgeResult<RValue> {
    match outcome {
        ExecOutcome::Failure { message } => Err(BridgeError::execution(message)),
        ExecOutcome::Success { tag, data } => match tag {
            ResultTag::Ranges => Ok(RValue::Ranges(parse_granges(&data)?)),
            ResultTag::RangesList => Ok(RValue::RangesList(parse_granges_list(&data)?)),
            ResultTag::Table => Ok(RValue::Table(parse_table(&data)?)),
            ResultTag::Generic => Ok(RValue::Json(data)),
        },
    }
}

fn malformed(message: impl Into<String>) -> BridgeError {
    BridgeError::MalformedOutput {
        op: String::new(),
        message: message.into(),
    }
}

fn column<'a>(obj: &'a Map<String, Value>, name: &str) -> BridgeResult<&'a Vec<Value>> {
    obj.get(name)
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(format!("missing '{name}' array in ranges payload")))
}

/// Coordinates arrive as JSON numbers; jsonlite may render large values in
/// float notation, so fall back through f64.
fn as_coord(v: &Value) -> Option<i64> {
    v.as_i64().or_else(|| v.as_f64().map(|f| f as i64))
}

/// Rebuild a range collection from four parallel arrays plus an optional
/// metadata mapping of parallel arrays. A zero-row payload deserializes to
/// an empty collection.
pub fn parse_granges(data: &Value) -> BridgeResult<GRanges> {
    let obj = data
        .as_object()
        .ok_or_else(|| malformed("ranges payload is not an object"))?;

    let seqnames = column(obj, "seqnames")?;
    if seqnames.is_empty() {
        return Ok(GRanges::new());
    }
    let starts = column(obj, "start")?;
    let ends = column(obj, "end")?;
    let strands = column(obj, "strand")?;

    // Empty mcols serialize as an empty JSON array, not an object.
    let metadata = obj
        .get("metadata")
        .and_then(Value::as_object)
        .filter(|m| !m.is_empty());

    let mut ranges = Vec::with_capacity(seqnames.len());
    for i in 0..seqnames.len() {
        let seq = seqnames[i]
            .as_str()
            .ok_or_else(|| malformed(format!("seqnames[{i}] is not a string")))?;
        let start = starts
            .get(i)
            .and_then(as_coord)
            .ok_or_else(|| malformed(format!("start[{i}] is not a number")))?;
        let end = ends
            .get(i)
            .and_then(as_coord)
            .ok_or_else(|| malformed(format!("end[{i}] is not a number")))?;
        let strand = strands
            .get(i)
            .and_then(Value::as_str)
            .map(Strand::from_wire)
            .unwrap_or_default();

        let mut range = GenomicRange::new(seq, start, end, strand);
        if let Some(cols) = metadata {
            for (key, col) in cols {
                let cell = col
                    .as_array()
                    .and_then(|a| a.get(i))
                    .cloned()
                    .unwrap_or(Value::Null);
                range.metadata.insert(key.clone(), cell);
            }
        }
        ranges.push(range);
    }

    Ok(GRanges(ranges))
}

/// Rebuild a labeled collection from an array of `{id, ranges}` pairs.
pub fn parse_granges_list(data: &Value) -> BridgeResult<GRangesList> {
    let items = data
        .as_array()
        .ok_or_else(|| malformed("ranges-list payload is not an array"))?;

    let mut groups = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or_else(|| malformed(format!("ranges-list element {i} is not an object")))?;
        let id = obj
            .get("id")
            .map(unbox)
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(format!("ranges-list element {i} has no id")))?
            .to_string();
        let ranges = obj
            .get("ranges")
            .map(unbox)
            .map(parse_granges)
            .transpose()?
            .unwrap_or_default();
        groups.push(NamedRanges { id, ranges });
    }

    Ok(GRangesList(groups))
}

/// Pass the column mapping through unchanged; the row count comes from the
/// first column present. An empty R list arrives as an empty array.
pub fn parse_table(data: &Value) -> BridgeResult<DataTable> {
    match data {
        Value::Object(columns) => Ok(DataTable::from_interpreter(columns.clone())),
        Value::Array(items) if items.is_empty() => Ok(DataTable::default()),
        _ => Err(malformed("table payload is not a column mapping")),
    }
}
