//! Typed accessors over a tool call's argument object.
//!
//! MCP arguments arrive as one JSON object per call. `OpArgs` wraps that
//! object with accessors that either fetch a well-typed value or fail with a
//! message naming the offending key. JSON `null` counts as absent.

use grbridge_types::{GRanges, GRangesList};
use serde_json::{Map, Value};
use thiserror::Error;

/// An argument-contract violation for one call.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ArgError(String);

impl ArgError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type ArgResult<T> = Result<T, ArgError>;

/// The keyed arguments of one dispatch call.
#[derive(Debug, Clone, Default)]
pub struct OpArgs {
    values: Map<String, Value>,
}

impl OpArgs {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Raw access; `null` reads as absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    fn required(&self, name: &str) -> ArgResult<&Value> {
        self.get(name)
            .ok_or_else(|| ArgError::new(format!("missing required argument '{name}'")))
    }

    pub fn get_str(&self, name: &str) -> ArgResult<Option<&str>> {
        match self.get(name) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(Some)
                .ok_or_else(|| ArgError::new(format!("argument '{name}' must be a string"))),
        }
    }

    pub fn require_str(&self, name: &str) -> ArgResult<&str> {
        self.required(name)?
            .as_str()
            .ok_or_else(|| ArgError::new(format!("argument '{name}' must be a string")))
    }

    pub fn get_bool(&self, name: &str) -> ArgResult<Option<bool>> {
        match self.get(name) {
            None => Ok(None),
            Some(v) => v
                .as_bool()
                .map(Some)
                .ok_or_else(|| ArgError::new(format!("argument '{name}' must be a boolean"))),
        }
    }

    /// A number, rendered exactly as it appeared on the wire.
    pub fn get_num(&self, name: &str) -> ArgResult<Option<String>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(ArgError::new(format!("argument '{name}' must be a number"))),
        }
    }

    pub fn require_num(&self, name: &str) -> ArgResult<String> {
        match self.required(name)? {
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(ArgError::new(format!("argument '{name}' must be a number"))),
        }
    }

    /// A string or an array of strings, normalized to a vector.
    pub fn get_strings(&self, name: &str) -> ArgResult<Option<Vec<String>>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(vec![s.clone()])),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let s = item.as_str().ok_or_else(|| {
                        ArgError::new(format!("argument '{name}' must contain only strings"))
                    })?;
                    out.push(s.to_string());
                }
                Ok(Some(out))
            }
            Some(_) => Err(ArgError::new(format!(
                "argument '{name}' must be a string or an array of strings"
            ))),
        }
    }

    /// An array of numbers, each rendered as it appeared on the wire.
    pub fn get_nums(&self, name: &str) -> ArgResult<Option<Vec<String>>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Number(n) => out.push(n.to_string()),
                        _ => {
                            return Err(ArgError::new(format!(
                                "argument '{name}' must contain only numbers"
                            )));
                        }
                    }
                }
                Ok(Some(out))
            }
            Some(_) => Err(ArgError::new(format!(
                "argument '{name}' must be an array of numbers"
            ))),
        }
    }

    /// A number or an array of numbers, rendered as an R literal
    /// (`5` or `c(5, 10)`).
    pub fn require_num_or_vec(&self, name: &str) -> ArgResult<String> {
        match self.required(name)? {
            Value::Number(n) => Ok(n.to_string()),
            Value::Array(_) => {
                let nums = self.get_nums(name)?.unwrap_or_default();
                Ok(format!("c({})", nums.join(", ")))
            }
            _ => Err(ArgError::new(format!(
                "argument '{name}' must be a number or an array of numbers"
            ))),
        }
    }

    /// A range collection, parsed from an array of range objects.
    pub fn require_ranges(&self, name: &str) -> ArgResult<GRanges> {
        let v = self.required(name)?;
        serde_json::from_value(v.clone())
            .map_err(|e| ArgError::new(format!("argument '{name}' is not a range collection: {e}")))
    }

    /// A labeled collection, parsed from an array of `{id, ranges}` objects.
    pub fn require_ranges_list(&self, name: &str) -> ArgResult<GRangesList> {
        let v = self.required(name)?;
        serde_json::from_value(v.clone()).map_err(|e| {
            ArgError::new(format!("argument '{name}' is not a labeled range collection: {e}"))
        })
    }

    pub fn get_object(&self, name: &str) -> ArgResult<Option<&Map<String, Value>>> {
        match self.get(name) {
            None => Ok(None),
            Some(v) => v
                .as_object()
                .map(Some)
                .ok_or_else(|| ArgError::new(format!("argument '{name}' must be an object"))),
        }
    }

    pub fn require_object(&self, name: &str) -> ArgResult<&Map<String, Value>> {
        self.required(name)?
            .as_object()
            .ok_or_else(|| ArgError::new(format!("argument '{name}' must be an object")))
    }

    pub fn require_array(&self, name: &str) -> ArgResult<&Vec<Value>> {
        self.required(name)?
            .as_array()
            .ok_or_else(|| ArgError::new(format!("argument '{name}' must be an array")))
    }
}

impl From<Map<String, Value>> for OpArgs {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(v: Value) -> OpArgs {
        OpArgs::new(v.as_object().cloned().unwrap_or_default())
    }

    #[test]
    fn null_reads_as_absent() {
        let a = args(json!({"x": null}));
        assert!(a.get("x").is_none());
        assert!(a.get_bool("x").unwrap().is_none());
    }

    #[test]
    fn missing_required_names_the_key() {
        let a = args(json!({}));
        let err = a.require_str("pattern").unwrap_err();
        assert_eq!(err.to_string(), "missing required argument 'pattern'");
    }

    #[test]
    fn wrong_type_names_the_key() {
        let a = args(json!({"n": "five"}));
        let err = a.require_num("n").unwrap_err();
        assert!(err.to_string().contains("'n'"));
    }

    #[test]
    fn numbers_render_as_on_the_wire() {
        let a = args(json!({"pad": 0.5, "n": 10}));
        assert_eq!(a.get_num("pad").unwrap().as_deref(), Some("0.5"));
        assert_eq!(a.require_num("n").unwrap(), "10");
    }

    #[test]
    fn strings_accept_scalar_or_array() {
        let a = args(json!({"one": "x", "many": ["a", "b"]}));
        assert_eq!(a.get_strings("one").unwrap(), Some(vec!["x".to_string()]));
        assert_eq!(
            a.get_strings("many").unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn num_or_vec_renders_both_shapes() {
        let a = args(json!({"w": 100, "ws": [100, 200]}));
        assert_eq!(a.require_num_or_vec("w").unwrap(), "100");
        assert_eq!(a.require_num_or_vec("ws").unwrap(), "c(100, 200)");
    }

    #[test]
    fn ranges_parse_from_wire_objects() {
        let a = args(json!({"ranges": [
            {"seqnames": "chr1", "start": 1000, "end": 2000, "strand": "+"}
        ]}));
        let gr = a.require_ranges("ranges").unwrap();
        assert_eq!(gr.len(), 1);
        assert_eq!(gr.0[0].seqnames, "chr1");
    }

    #[test]
    fn ranges_list_parses_from_wire_objects() {
        let a = args(json!({"grl": [
            {"id": "j1", "ranges": [{"seqnames": "chr1", "start": 1, "end": 2}]},
            {"id": "j2", "ranges": []}
        ]}));
        let grl = a.require_ranges_list("grl").unwrap();
        assert_eq!(grl.len(), 2);
        assert_eq!(grl.0[0].id, "j1");
    }

    #[test]
    fn malformed_ranges_fail_with_key() {
        let a = args(json!({"ranges": [{"start": 1}]}));
        let err = a.require_ranges("ranges").unwrap_err();
        assert!(err.to_string().contains("'ranges'"));
    }
}
