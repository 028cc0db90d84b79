use std::fmt;

use crate::error::PlotError;
use crate::record::Record;

pub const NB_NS_IN_MS: f64 = 1e6;
pub const NB_BYTES_IN_KB: f64 = 1024.0;

/// Where a scalar lives inside a record, e.g. `mean.estimate` or just `mean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath<'a> {
    pub outer: &'a str,
    pub inner: Option<&'a str>,
}

impl<'a> FieldPath<'a> {
    pub const fn new(outer: &'a str, inner: &'a str) -> Self {
        Self {
            outer,
            inner: Some(inner),
        }
    }

    pub const fn scalar(outer: &'a str) -> Self {
        Self { outer, inner: None }
    }

    /// The same outer key with another inner key.
    pub const fn with_inner(&self, inner: &'a str) -> Self {
        Self {
            outer: self.outer,
            inner: Some(inner),
        }
    }
}

impl fmt::Display for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.inner {
            Some(inner) => write!(f, "{}.{}", self.outer, inner),
            None => write!(f, "{}", self.outer),
        }
    }
}

/// Conversion applied uniformly to every extracted value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unit {
    Raw,
    NanosToMillis,
    BytesToKilobytes,
}

impl Unit {
    pub fn divisor(&self) -> f64 {
        match self {
            Unit::Raw => 1.0,
            Unit::NanosToMillis => NB_NS_IN_MS,
            Unit::BytesToKilobytes => NB_BYTES_IN_KB,
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Unit::Raw => value,
            _ => value / self.divisor(),
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            Unit::Raw => "value",
            Unit::NanosToMillis => "time in ms",
            Unit::BytesToKilobytes => "size in KiB",
        }
    }
}

/// One converted scalar per record, in record order.
pub fn extract(records: &[&Record], path: FieldPath, unit: Unit) -> Result<Vec<f64>, PlotError> {
    records
        .iter()
        .map(|record| {
            record
                .field(path.outer, path.inner)
                .map(|value| unit.apply(value))
                .ok_or_else(|| PlotError::MissingField {
                    id: record.id.clone(),
                    field: path.to_string(),
                })
        })
        .collect()
}

/// Like [`extract`], but yields `None` for records lacking the field.
pub fn extract_present(records: &[&Record], path: FieldPath, unit: Unit) -> Vec<Option<f64>> {
    records
        .iter()
        .map(|record| {
            record
                .field(path.outer, path.inner)
                .map(|value| unit.apply(value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;

    fn record(id: &str, mean: serde_json::Value) -> Record {
        let mut fields = IndexMap::new();
        fields.insert("mean".to_string(), mean);
        Record {
            id: id.to_string(),
            fields,
        }
    }

    #[test]
    fn nanos_to_millis() {
        let records = vec![
            record("a", serde_json::json!({"estimate": 2_500_000.0})),
            record("b", serde_json::json!({"estimate": 1_000_000})),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let values = extract(&refs, FieldPath::new("mean", "estimate"), Unit::NanosToMillis).unwrap();
        assert_eq!(values, vec![2.5, 1.0]);
    }

    #[test]
    fn divides_elementwise() {
        let raw = [3.0, 1536.0, 7.25, 0.0];
        let records: Vec<Record> = raw
            .iter()
            .map(|v| record("x", serde_json::json!(v)))
            .collect();
        let refs: Vec<&Record> = records.iter().collect();
        let values = extract(&refs, FieldPath::scalar("mean"), Unit::BytesToKilobytes).unwrap();
        assert_eq!(values.len(), raw.len());
        for (value, raw) in values.iter().zip(raw) {
            assert_eq!(*value, raw / 1024.0);
        }
    }

    #[test]
    fn missing_field() {
        let records = vec![record("a", serde_json::json!(1.0))];
        let refs: Vec<&Record> = records.iter().collect();
        let err = extract(&refs, FieldPath::new("mean", "estimate"), Unit::Raw).unwrap_err();
        assert_eq!(err.to_string(), "record `a` has no numeric field `mean.estimate`");

        let values = extract_present(&refs, FieldPath::new("mean", "estimate"), Unit::Raw);
        assert_eq!(values, vec![None]);
    }

    #[test]
    fn empty_input() {
        let values = extract(&[], FieldPath::new("mean", "estimate"), Unit::NanosToMillis).unwrap();
        assert!(values.is_empty());
    }
}
