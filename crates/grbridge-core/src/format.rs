//! Serialization of domain values into R literal syntax.
//!
//! Everything here is a pure function of its argument: no I/O, no failure
//! on well-typed input. Strings are quoted with embedded quotes escaped;
//! no other character class is escaped — callers must not route values that
//! need more than quote-escaping through string arguments (documented
//! limitation of the command syntax).

use grbridge_types::{GRanges, GRangesList, RValue};
use serde_json::Value;

/// Render any domain value as an R literal.
pub fn format_value(value: &RValue) -> String {
    match value {
        RValue::Null => "NULL".to_string(),
        RValue::Bool(b) => r_bool(*b).to_string(),
        RValue::Int(i) => i.to_string(),
        RValue::Float(f) => r_f64(*f),
        RValue::String(s) => r_string(s),
        RValue::Array(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("c({})", inner.join(", "))
        }
        RValue::Ranges(gr) => format_granges(gr),
        RValue::RangesList(grl) => format_granges_list(grl),
        RValue::Table(t) => {
            let entries: Vec<String> = t
                .columns
                .iter()
                .map(|(k, v)| format!("{} = {}", k, format_json(v)))
                .collect();
            format!("list({})", entries.join(", "))
        }
        RValue::Json(v) => format_json(v),
    }
}

/// Render a raw JSON value as an R literal: scalars as-is, arrays as
/// `c(...)`, objects as keyed `list(...)`.
pub fn format_json(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => r_bool(*b).to_string(),
        // serde_json prints numbers exactly as parsed; no locale, no loss.
        Value::Number(n) => n.to_string(),
        Value::String(s) => r_string(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(format_json).collect();
            format!("c({})", inner.join(", "))
        }
        Value::Object(obj) => {
            let entries: Vec<String> = obj
                .iter()
                .map(|(k, v)| format!("{} = {}", k, format_json(v)))
                .collect();
            format!("list({})", entries.join(", "))
        }
    }
}

/// Render a range collection as a `GRanges(...)` constructor call with four
/// aligned vectors, plus one vector per metadata column when every range
/// carries an identical metadata key set. Ranges with mismatched key sets
/// serialize without any metadata at all — best-effort, never an error.
pub fn format_granges(gr: &GRanges) -> String {
    if gr.is_empty() {
        return "GRanges()".to_string();
    }

    let seqnames: Vec<String> = gr.iter().map(|r| r_string(&r.seqnames)).collect();
    let starts: Vec<String> = gr.iter().map(|r| r.start.to_string()).collect();
    let ends: Vec<String> = gr.iter().map(|r| r.end.to_string()).collect();
    let strands: Vec<String> = gr.iter().map(|r| r_string(r.strand.as_str())).collect();

    let mut cmd = format!(
        "GRanges(seqnames = c({}), ranges = IRanges(start = c({}), end = c({})), strand = c({})",
        seqnames.join(", "),
        starts.join(", "),
        ends.join(", "),
        strands.join(", ")
    );

    for key in shared_metadata_keys(gr) {
        let values: Vec<String> = gr
            .iter()
            .map(|r| format_json(r.metadata.get(key).unwrap_or(&Value::Null)))
            .collect();
        cmd.push_str(&format!(", {} = c({})", key, values.join(", ")));
    }

    cmd.push(')');
    cmd
}

/// Render a labeled collection as a `GRangesList("id" = GRanges(...), ...)`
/// constructor call. Duplicate labels are passed through unchanged.
pub fn format_granges_list(grl: &GRangesList) -> String {
    let elements: Vec<String> = grl
        .iter()
        .map(|g| format!("{} = {}", r_string(&g.id), format_granges(&g.ranges)))
        .collect();
    format!("GRangesList({})", elements.join(", "))
}

/// Metadata keys shared by every range, in the first range's column order.
/// Returns empty when any range has a differing key set.
fn shared_metadata_keys(gr: &GRanges) -> Vec<&str> {
    let Some(first) = gr.iter().next() else {
        return Vec::new();
    };
    if first.metadata.is_empty() {
        return Vec::new();
    }
    let mut reference: Vec<&str> = first.metadata.keys().map(String::as_str).collect();
    reference.sort_unstable();
    for r in gr.iter().skip(1) {
        let mut keys: Vec<&str> = r.metadata.keys().map(String::as_str).collect();
        keys.sort_unstable();
        if keys != reference {
            return Vec::new();
        }
    }
    first.metadata.keys().map(String::as_str).collect()
}

/// Quote a string for R, escaping embedded double quotes only.
pub fn r_string(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\\""))
}

/// R boolean literal.
pub fn r_bool(b: bool) -> &'static str {
    if b { "TRUE" } else { "FALSE" }
}

/// R numeric literal for a float, mapping non-finite values to R's
/// `NaN`/`Inf` spellings.
pub fn r_f64(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Inf".to_string() } else { "-Inf".to_string() }
    } else {
        f.to_string()
    }
}
