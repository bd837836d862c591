//! Genomic interval types.
//!
//! A `GenomicRange` is a closed coordinate interval on a named sequence
//! (`start <= end`, both inclusive), with an optional strand and an ordered
//! set of metadata columns. `GRanges` is an ordered collection of ranges;
//! `GRangesList` is a labeled collection of collections. Order is meaningful
//! in both and must survive a round trip through the interpreter.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Strand orientation of a range.
///
/// Wire form matches the R side: `"+"`, `"-"`, `"*"`. Anything else coming
/// off the wire parses as `Unstranded` rather than failing the whole value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
    #[default]
    #[serde(rename = "*")]
    Unstranded,
}

impl<'de> Deserialize<'de> for Strand {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Strand::from_wire(&s))
    }
}

impl Strand {
    /// The single-character wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
            Strand::Unstranded => "*",
        }
    }

    /// Parse a wire string leniently: unknown values map to `Unstranded`.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "+" => Strand::Forward,
            "-" => Strand::Reverse,
            _ => Strand::Unstranded,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single genomic interval.
///
/// `width` is derived (`end - start + 1`), never stored: the response
/// serializer computes it on the way out, so it can never disagree with the
/// coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomicRange {
    /// Sequence (chromosome) name.
    pub seqnames: String,
    /// 1-based inclusive start.
    pub start: i64,
    /// 1-based inclusive end.
    pub end: i64,
    /// Strand; absent on the wire means unstranded.
    #[serde(default)]
    pub strand: Strand,
    /// Ordered metadata columns (name -> scalar or array).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl GenomicRange {
    /// Create a range with no metadata.
    pub fn new(seqnames: impl Into<String>, start: i64, end: i64, strand: Strand) -> Self {
        Self {
            seqnames: seqnames.into(),
            start,
            end,
            strand,
            metadata: Map::new(),
        }
    }

    /// Inclusive width of the range.
    pub fn width(&self) -> i64 {
        self.end - self.start + 1
    }
}

/// An ordered collection of genomic ranges.
///
/// No uniqueness constraint; duplicates and ordering pass through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GRanges(pub Vec<GenomicRange>);

impl GRanges {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GenomicRange> {
        self.0.iter()
    }
}

impl From<Vec<GenomicRange>> for GRanges {
    fn from(ranges: Vec<GenomicRange>) -> Self {
        Self(ranges)
    }
}

impl FromIterator<GenomicRange> for GRanges {
    fn from_iter<I: IntoIterator<Item = GenomicRange>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a GRanges {
    type Item = &'a GenomicRange;
    type IntoIter = std::slice::Iter<'a, GenomicRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One labeled element of a `GRangesList`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRanges {
    /// User-supplied label. Uniqueness is NOT enforced here: duplicate
    /// labels pass through unchanged and the interpreter's semantics govern
    /// collisions.
    pub id: String,
    #[serde(default)]
    pub ranges: GRanges,
}

/// A labeled, ordered collection of range collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GRangesList(pub Vec<NamedRanges>);

impl GRangesList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NamedRanges> {
        self.0.iter()
    }
}

impl From<Vec<NamedRanges>> for GRangesList {
    fn from(groups: Vec<NamedRanges>) -> Self {
        Self(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_inclusive() {
        let r = GenomicRange::new("chr1", 1000, 2000, Strand::Forward);
        assert_eq!(r.width(), 1001);
    }

    #[test]
    fn single_base_range_has_width_one() {
        let r = GenomicRange::new("chr1", 5, 5, Strand::Unstranded);
        assert_eq!(r.width(), 1);
    }

    #[test]
    fn strand_wire_round_trip() {
        assert_eq!(Strand::from_wire("+"), Strand::Forward);
        assert_eq!(Strand::from_wire("-"), Strand::Reverse);
        assert_eq!(Strand::from_wire("*"), Strand::Unstranded);
        assert_eq!(Strand::Forward.as_str(), "+");
    }

    #[test]
    fn unknown_strand_is_unstranded() {
        assert_eq!(Strand::from_wire("."), Strand::Unstranded);
        assert_eq!(Strand::from_wire(""), Strand::Unstranded);
    }

    #[test]
    fn range_deserializes_without_strand() {
        let r: GenomicRange =
            serde_json::from_str(r#"{"seqnames": "chr2", "start": 10, "end": 20}"#).unwrap();
        assert_eq!(r.strand, Strand::Unstranded);
        assert!(r.metadata.is_empty());
    }

    #[test]
    fn range_deserializes_with_metadata() {
        let r: GenomicRange = serde_json::from_str(
            r#"{"seqnames": "chr1", "start": 1, "end": 2, "strand": "-", "metadata": {"score": 5}}"#,
        )
        .unwrap();
        assert_eq!(r.strand, Strand::Reverse);
        assert_eq!(r.metadata.get("score"), Some(&serde_json::json!(5)));
    }

    #[test]
    fn granges_preserves_order_and_duplicates() {
        let a = GenomicRange::new("chr1", 1, 10, Strand::Forward);
        let gr: GRanges = vec![a.clone(), a.clone()].into();
        assert_eq!(gr.len(), 2);
        assert_eq!(gr.0[0], gr.0[1]);
    }

    #[test]
    fn duplicate_list_labels_pass_through() {
        let grl: GRangesList = vec![
            NamedRanges { id: "x".into(), ranges: GRanges::new() },
            NamedRanges { id: "x".into(), ranges: GRanges::new() },
        ]
        .into();
        assert_eq!(grl.len(), 2);
        assert_eq!(grl.0[0].id, grl.0[1].id);
    }
}
