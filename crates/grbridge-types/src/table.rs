//! Column-oriented table type.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Error constructing a [`DataTable`] from user-supplied columns.
#[derive(Debug, Clone, Error)]
pub enum TableError {
    #[error("column '{0}' is not an array")]
    NotAnArray(String),
    #[error("column '{name}' has {len} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        len: usize,
        expected: usize,
    },
}

/// A table as a mapping from column name to a same-length list of values.
///
/// `nrows` is derived from the columns, never supplied by the caller.
/// Column order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataTable {
    pub columns: Map<String, Value>,
    pub nrows: usize,
}

impl DataTable {
    /// Build a table, checking that every column is an array and that all
    /// columns have equal length.
    pub fn new(columns: Map<String, Value>) -> Result<Self, TableError> {
        let mut expected = None;
        for (name, col) in &columns {
            let Some(arr) = col.as_array() else {
                return Err(TableError::NotAnArray(name.clone()));
            };
            match expected {
                None => expected = Some(arr.len()),
                Some(n) if arr.len() != n => {
                    return Err(TableError::LengthMismatch {
                        name: name.clone(),
                        len: arr.len(),
                        expected: n,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(Self {
            nrows: expected.unwrap_or(0),
            columns,
        })
    }

    /// Build a table from interpreter output without re-checking lengths.
    ///
    /// The row count is taken from the first column present; if the
    /// interpreter hands back ragged columns we pass them through as-is.
    pub fn from_interpreter(columns: Map<String, Value>) -> Self {
        let nrows = columns
            .values()
            .next()
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        Self { columns, nrows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cols(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn new_counts_rows() {
        let t = DataTable::new(cols(&[
            ("seqnames", json!(["chr1", "chr2"])),
            ("start", json!([1, 100])),
        ]))
        .unwrap();
        assert_eq!(t.nrows, 2);
    }

    #[test]
    fn new_rejects_ragged_columns() {
        let err = DataTable::new(cols(&[
            ("a", json!([1, 2, 3])),
            ("b", json!([1])),
        ]))
        .unwrap_err();
        assert!(matches!(err, TableError::LengthMismatch { .. }));
    }

    #[test]
    fn new_rejects_scalar_column() {
        let err = DataTable::new(cols(&[("a", json!(1))])).unwrap_err();
        assert!(matches!(err, TableError::NotAnArray(_)));
    }

    #[test]
    fn empty_table_has_zero_rows() {
        let t = DataTable::new(Map::new()).unwrap();
        assert_eq!(t.nrows, 0);
    }

    #[test]
    fn from_interpreter_trusts_first_column() {
        let t = DataTable::from_interpreter(cols(&[
            ("a", json!([1, 2])),
            ("b", json!([1, 2, 3])),
        ]));
        assert_eq!(t.nrows, 2);
        assert_eq!(t.columns.len(), 2);
    }
}
