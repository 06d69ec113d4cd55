use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// A single target value attached to a molecule.
///
/// Targets are either numeric measurements or class labels. Values must be
/// `Ord` so distinct classes can be collected into a `BTreeSet`; floats are
/// ordered with [`f64::total_cmp`].
#[derive(Debug, Clone)]
pub enum TargetValue {
    Number(f64),
    Label(String),
}

impl TargetValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TargetValue::Number(v) => Some(*v),
            TargetValue::Label(_) => None,
        }
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TargetValue::Number(_))
    }
}

impl PartialEq for TargetValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TargetValue {}

impl PartialOrd for TargetValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TargetValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (TargetValue::Number(a), TargetValue::Number(b)) => a.total_cmp(b),
            (TargetValue::Label(a), TargetValue::Label(b)) => a.cmp(b),
            (TargetValue::Number(_), TargetValue::Label(_)) => Ordering::Less,
            (TargetValue::Label(_), TargetValue::Number(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for TargetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetValue::Number(v) => write!(f, "{v}"),
            TargetValue::Label(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for TargetValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TargetValue::Number(v) => serializer.serialize_f64(*v),
            TargetValue::Label(s) => serializer.serialize_str(s),
        }
    }
}

impl From<f64> for TargetValue {
    fn from(v: f64) -> Self {
        TargetValue::Number(v)
    }
}

impl From<i64> for TargetValue {
    fn from(v: i64) -> Self {
        TargetValue::Number(v as f64)
    }
}

impl From<i32> for TargetValue {
    fn from(v: i32) -> Self {
        TargetValue::Number(v as f64)
    }
}

impl From<&str> for TargetValue {
    fn from(s: &str) -> Self {
        TargetValue::Label(s.to_string())
    }
}

impl From<String> for TargetValue {
    fn from(s: String) -> Self {
        TargetValue::Label(s)
    }
}

/// Sorted set of the distinct values in `values`.
pub fn distinct(values: &[TargetValue]) -> BTreeSet<&TargetValue> {
    values.iter().collect()
}

/// Ratio of distinct values to total values; `0.0` for an empty slice.
pub fn unique_ratio(values: &[TargetValue]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    distinct(values).len() as f64 / values.len() as f64
}

/// Whether every value is numeric. Vacuously true for an empty slice.
pub fn all_numeric(values: &[TargetValue]) -> bool {
    values.iter().all(TargetValue::is_numeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_sort_before_labels() {
        let mut values = vec![
            TargetValue::from("b"),
            TargetValue::from(2.0),
            TargetValue::from("a"),
            TargetValue::from(-1.0),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                TargetValue::from(-1.0),
                TargetValue::from(2.0),
                TargetValue::from("a"),
                TargetValue::from("b"),
            ]
        );
    }

    #[test]
    fn nan_values_compare_equal_to_themselves() {
        let nan = TargetValue::from(f64::NAN);
        assert_eq!(nan, nan.clone());
    }

    #[test]
    fn unique_ratio_counts_distinct_values() {
        let values: Vec<TargetValue> = [1, 1, 2, 2].into_iter().map(TargetValue::from).collect();
        assert!((unique_ratio(&values) - 0.5).abs() < 1e-12);
        assert_eq!(unique_ratio(&[]), 0.0);
    }

    #[test]
    fn all_numeric_detects_labels() {
        assert!(all_numeric(&[TargetValue::from(1.0), TargetValue::from(3)]));
        assert!(!all_numeric(&[TargetValue::from(1.0), TargetValue::from("x")]));
        assert!(all_numeric(&[]));
    }

    #[test]
    fn integer_conversions_are_numeric() {
        assert_eq!(TargetValue::from(3i64).as_f64(), Some(3.0));
        assert_eq!(TargetValue::from("active").as_f64(), None);
        assert_eq!(TargetValue::from("active").to_string(), "active");
    }
}
