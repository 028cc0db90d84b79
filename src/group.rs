use indexmap::IndexMap;

use crate::record::Record;

/// Records whose `id` starts with `prefix`, in source order.
pub fn filter_prefix<'a>(records: &'a [Record], prefix: &str) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|record| record.id.starts_with(prefix))
        .collect()
}

/// The x value encoded in a benchmark id: the first whitespace separated
/// token after `prefix` that is an integer, with an `NxM` size read as `N`.
///
/// `"mul 4x4 on BN-254"` with prefix `"mul"` yields 4.
pub fn x_from_id(id: &str, prefix: &str) -> Option<u64> {
    let rest = id.strip_prefix(prefix)?;
    rest.split_whitespace()
        .find_map(|token| token.split('x').next()?.parse().ok())
}

/// The curve (or field) a measurement ran on: whatever follows the last
/// `" on "` in the id.
pub fn curve_of(id: &str) -> Option<&str> {
    id.rsplit_once(" on ").map(|(_, curve)| curve.trim())
}

/// Splits a group by curve, keeping first-appearance order of the curves
/// and source order inside each curve.
pub fn split_by_curve<'a>(group: &[&'a Record]) -> IndexMap<String, Vec<&'a Record>> {
    let mut curves: IndexMap<String, Vec<&'a Record>> = IndexMap::new();
    for record in group {
        let curve = curve_of(&record.id).unwrap_or_default();
        curves.entry(curve.to_string()).or_default().push(record);
    }
    curves
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, mean: f64) -> Record {
        let mut fields = IndexMap::new();
        fields.insert("mean".to_string(), serde_json::json!({ "estimate": mean }));
        Record {
            id: id.to_string(),
            fields,
        }
    }

    #[test]
    fn prefix_filter() {
        let records = vec![record("mul 4x4", 100.0), record("transpose 2x2", 50.0)];
        let group = filter_prefix(&records, "mul");
        assert_eq!(group, vec![&records[0]]);
    }

    #[test]
    fn prefix_filter_keeps_order() {
        let records = vec![
            record("mul 2x2 on A", 1.0),
            record("inverse 2x2 on A", 2.0),
            record("mul 4x4 on A", 3.0),
            record("mul 8x8 on B", 4.0),
        ];
        let ids: Vec<&str> = filter_prefix(&records, "mul")
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["mul 2x2 on A", "mul 4x4 on A", "mul 8x8 on B"]);
    }

    #[test]
    fn no_match_is_empty() {
        let records = vec![record("mul 4x4", 100.0)];
        assert!(filter_prefix(&records, "inverse").is_empty());
        assert!(filter_prefix(&[], "mul").is_empty());
    }

    #[test]
    fn x_values() {
        assert_eq!(x_from_id("mul 4x4 on BN-254", "mul"), Some(4));
        assert_eq!(x_from_id("setup (komodo) 1024 on ark_bls12_381::Fr", "setup (komodo)"), Some(1024));
        assert_eq!(
            x_from_id(
                "serialized size with compression and validation 2048 on Fr",
                "serialized size with compression and validation"
            ),
            Some(2048)
        );
        assert_eq!(x_from_id("mul on BN-254", "mul"), None);
        assert_eq!(x_from_id("inverse 4x4", "mul"), None);
    }

    #[test]
    fn curves() {
        assert_eq!(curve_of("mul 4x4 on BN-254"), Some("BN-254"));
        assert_eq!(curve_of("mul 4x4"), None);

        let records = vec![
            record("mul 2x2 on A", 1.0),
            record("mul 2x2 on B", 2.0),
            record("mul 4x4 on A", 3.0),
        ];
        let group = filter_prefix(&records, "mul");
        let curves = split_by_curve(&group);
        assert_eq!(curves.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(curves["A"].len(), 2);
        assert_eq!(curves["A"][1].id, "mul 4x4 on A");
    }
}
