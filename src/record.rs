//! Reading line-delimited benchmark results

use std::fs::File;
use std::io::{BufRead, BufReader};

use camino::Utf8Path;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::PlotError;

/// `reason` of a line that carries a finished measurement.
pub const COMPLETION_MARKER: &str = "benchmark-complete";

/// One finished benchmark measurement.
///
/// Apart from `id`, all fields of the source line are kept as-is, so
/// measurements like `mean` may either be a nested estimate object or a
/// plain number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct Line {
    reason: Option<Value>,
    #[serde(flatten)]
    rest: IndexMap<String, Value>,
}

impl Record {
    /// Looks up `outer` (and `inner` below it, if given) as a number.
    pub fn field(&self, outer: &str, inner: Option<&str>) -> Option<f64> {
        let value = self.fields.get(outer)?;
        let value = match inner {
            Some(inner) => value.get(inner)?,
            None => value,
        };
        value.as_f64()
    }
}

pub fn read_records(path: &Utf8Path) -> Result<Vec<Record>, PlotError> {
    if !path.exists() {
        return Err(PlotError::FileNotFound {
            path: path.to_owned(),
        });
    }

    let file = File::open(path).map_err(|source| PlotError::Io {
        path: path.to_owned(),
        source,
    })?;

    let records = parse_records(BufReader::new(file), path.as_str())?;
    log::info!("read {} complete records from {path}", records.len());
    Ok(records)
}

/// Parses every non-blank line as a JSON object, keeping only completed
/// measurements in source order.
pub fn parse_records<R: BufRead>(reader: R, what: &str) -> Result<Vec<Record>, PlotError> {
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (n, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| PlotError::Io {
            path: what.into(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let parsed: Line = serde_json::from_str(&line).map_err(|source| PlotError::ParseLine {
            what: what.to_string(),
            line: n + 1,
            source,
        })?;

        if parsed.reason.as_ref().and_then(Value::as_str) != Some(COMPLETION_MARKER) {
            dropped += 1;
            continue;
        }

        let mut fields = parsed.rest;
        let id = match fields.shift_remove("id") {
            Some(Value::String(id)) => id,
            _ => {
                return Err(PlotError::MissingField {
                    id: format!("{what}:{}", n + 1),
                    field: "id".to_string(),
                })
            }
        };
        fields.insert("reason".to_string(), Value::String(COMPLETION_MARKER.into()));

        records.push(Record { id, fields });
    }

    if dropped > 0 {
        log::debug!("{what}: dropped {dropped} incomplete records");
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const LINES: &str = concat!(
        r#"{"reason": "group-complete", "group_name": "linalg", "benchmarks": []}"#,
        "\n",
        r#"{"reason": "benchmark-complete", "id": "mul 4x4 on BN-254", "mean": {"estimate": 100.0, "lower_bound": 90.0, "upper_bound": 110.0}}"#,
        "\n",
        "\n",
        r#"{"reason": "benchmark-complete", "id": "transpose 2x2 on BN-254", "mean": 50}"#,
        "\n",
    );

    #[test]
    fn keeps_only_complete_records_in_order() {
        let records = parse_records(LINES.as_bytes(), "test").unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["mul 4x4 on BN-254", "transpose 2x2 on BN-254"]);
    }

    #[test]
    fn nested_and_scalar_fields() {
        let records = parse_records(LINES.as_bytes(), "test").unwrap();
        assert_eq!(records[0].field("mean", Some("estimate")), Some(100.0));
        assert_eq!(records[0].field("mean", Some("upper_bound")), Some(110.0));
        assert_eq!(records[0].field("median", Some("estimate")), None);
        assert_eq!(records[1].field("mean", None), Some(50.0));
        assert_eq!(records[1].field("mean", Some("estimate")), None);
    }

    #[test]
    fn malformed_line_is_fatal() {
        let input = "{\"reason\": \"benchmark-complete\", \"id\": \"a\"}\n{not json\n";
        match parse_records(input.as_bytes(), "broken") {
            Err(PlotError::ParseLine { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn non_string_reason_is_dropped() {
        let input = concat!(
            r#"{"reason": 3, "id": "x"}"#,
            "\n",
            r#"{"reason": null, "id": "y"}"#,
            "\n",
            r#"{"reason": "benchmark-complete", "id": "z", "mean": 1}"#,
            "\n",
        );
        let records = parse_records(input.as_bytes(), "mixed").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "z");
    }

    #[test]
    fn complete_record_without_id() {
        let input = "{\"reason\": \"benchmark-complete\", \"mean\": 1}\n";
        assert!(matches!(
            parse_records(input.as_bytes(), "noid"),
            Err(PlotError::MissingField { .. })
        ));
    }

    #[test]
    fn read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap().join("results.ndjson");
        let mut file = File::create(&path).unwrap();
        file.write_all(LINES.as_bytes()).unwrap();
        drop(file);

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn missing_file() {
        let result = read_records(Utf8Path::new("/nonexistent/results.ndjson"));
        assert!(matches!(result, Err(PlotError::FileNotFound { .. })));
    }
}
