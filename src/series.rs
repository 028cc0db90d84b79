use crate::error::PlotError;
use crate::extract::{extract, extract_present, FieldPath, Unit};
use crate::group::x_from_id;
use crate::record::Record;

/// Visual variant of a plotted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Alternate,
}

/// One plotted line with its error band.
///
/// `xs`, `ys`, `lower` and `upper` always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub style: LineStyle,
    xs: Vec<f64>,
    ys: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

/// Per-index `central - error` and `central + error`, unclamped.
pub fn error_band(central: &[f64], errors: &[f64]) -> Result<(Vec<f64>, Vec<f64>), PlotError> {
    if central.len() != errors.len() {
        return Err(PlotError::LengthMismatch {
            what: "error band",
            left: central.len(),
            right: errors.len(),
        });
    }

    Ok(central
        .iter()
        .zip(errors)
        .map(|(c, e)| (c - e, c + e))
        .unzip())
}

impl Series {
    pub fn new(
        label: impl Into<String>,
        xs: Vec<f64>,
        ys: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    ) -> Result<Self, PlotError> {
        let lengths = [
            ("series x / y", ys.len()),
            ("series x / lower bound", lower.len()),
            ("series x / upper bound", upper.len()),
        ];
        if let Some((what, len)) = lengths.into_iter().find(|(_, len)| *len != xs.len()) {
            return Err(PlotError::LengthMismatch {
                what,
                left: xs.len(),
                right: len,
            });
        }

        Ok(Self {
            label: label.into(),
            style: LineStyle::Solid,
            xs,
            ys,
            lower,
            upper,
        })
    }

    /// A series without uncertainty; the band collapses onto the line.
    pub fn without_band(
        label: impl Into<String>,
        xs: Vec<f64>,
        ys: Vec<f64>,
    ) -> Result<Self, PlotError> {
        let band = ys.clone();
        Self::new(label, xs, ys, band.clone(), band)
    }

    /// A series whose band is `ys -/+ errors`.
    pub fn with_errors(
        label: impl Into<String>,
        xs: Vec<f64>,
        ys: Vec<f64>,
        errors: &[f64],
    ) -> Result<Self, PlotError> {
        let (lower, upper) = error_band(&ys, errors)?;
        Self::new(label, xs, ys, lower, upper)
    }

    /// Builds a series from the records of one group.
    ///
    /// x comes from the record id (see [`x_from_id`]), y from
    /// `measure.estimate` (or `measure` itself when `measure` has no inner
    /// key), the band from `lower_bound`/`upper_bound` when present.
    /// Records without an x value are skipped.
    pub fn from_records(
        label: impl Into<String>,
        group: &[&Record],
        prefix: &str,
        measure: FieldPath,
        unit: Unit,
    ) -> Result<Self, PlotError> {
        let label = label.into();
        let (xs, kept): (Vec<f64>, Vec<&Record>) = group
            .iter()
            .filter_map(|record| match x_from_id(&record.id, prefix) {
                Some(x) => Some((x as f64, *record)),
                None => {
                    log::debug!("{label}: no x value in `{}`, skipped", record.id);
                    None
                }
            })
            .unzip();

        let ys = extract(&kept, measure, unit)?;
        let (lower, upper) = match measure.inner {
            Some(_) => {
                let lower = extract_present(&kept, measure.with_inner("lower_bound"), unit);
                let upper = extract_present(&kept, measure.with_inner("upper_bound"), unit);
                (fill_missing(lower, &ys), fill_missing(upper, &ys))
            }
            None => (ys.clone(), ys.clone()),
        };

        Self::new(label, xs, ys, lower, upper)
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    pub fn has_band(&self) -> bool {
        self.lower != self.ys || self.upper != self.ys
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Upper bound left to right followed by lower bound right to left.
    pub fn band_outline(&self) -> Vec<(f64, f64)> {
        let upper = self.xs.iter().copied().zip(self.upper.iter().copied());
        let lower = self
            .xs
            .iter()
            .copied()
            .zip(self.lower.iter().copied())
            .rev();
        upper.chain(lower).collect()
    }
}

fn fill_missing(values: Vec<Option<f64>>, fallback: &[f64]) -> Vec<f64> {
    values
        .into_iter()
        .zip(fallback)
        .map(|(value, fallback)| value.unwrap_or(*fallback))
        .collect()
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;

    #[test]
    fn band_is_symmetric() {
        let central = [10.0, 0.5, -3.0, 1143.0];
        let errors = [1.0, 2.0, 0.25, 120.0];
        let (lower, upper) = error_band(&central, &errors).unwrap();
        for i in 0..central.len() {
            assert_eq!(upper[i] - lower[i], 2.0 * errors[i]);
            assert_eq!((lower[i] + upper[i]) / 2.0, central[i]);
        }
        // negative lower bounds pass through
        assert_eq!(lower[1], -1.5);
    }

    #[test]
    fn band_length_mismatch() {
        assert!(matches!(
            error_band(&[1.0, 2.0], &[1.0]),
            Err(PlotError::LengthMismatch { left: 2, right: 1, .. })
        ));
    }

    #[test]
    fn unequal_lengths_rejected() {
        let result = Series::new("s", vec![1.0, 2.0], vec![1.0], vec![1.0, 2.0], vec![1.0, 2.0]);
        assert!(result.is_err());
    }

    #[test]
    fn outline() {
        let series = Series::with_errors("s", vec![1.0, 2.0], vec![10.0, 20.0], &[1.0, 2.0]).unwrap();
        assert_eq!(
            series.band_outline(),
            vec![(1.0, 11.0), (2.0, 22.0), (2.0, 18.0), (1.0, 9.0)]
        );
        assert!(series.has_band());

        let flat = Series::without_band("f", vec![1.0], vec![3.0]).unwrap();
        assert!(!flat.has_band());
    }

    fn record(id: &str, mean: serde_json::Value) -> Record {
        let mut fields = IndexMap::new();
        fields.insert("mean".to_string(), mean);
        Record {
            id: id.to_string(),
            fields,
        }
    }

    #[test]
    fn from_records() {
        let records = vec![
            record(
                "mul 2x2 on A",
                serde_json::json!({"estimate": 2e6, "lower_bound": 1e6, "upper_bound": 3e6}),
            ),
            record("mul sizes on A", serde_json::json!({"estimate": 1.0})),
            record("mul 4x4 on A", serde_json::json!({"estimate": 4e6})),
        ];
        let group: Vec<&Record> = records.iter().collect();
        let series = Series::from_records(
            "mean",
            &group,
            "mul",
            FieldPath::new("mean", "estimate"),
            Unit::NanosToMillis,
        )
        .unwrap();

        assert_eq!(series.xs(), &[2.0, 4.0]);
        assert_eq!(series.ys(), &[2.0, 4.0]);
        assert_eq!(series.lower(), &[1.0, 4.0]);
        assert_eq!(series.upper(), &[3.0, 4.0]);
    }

    #[test]
    fn from_empty_group() {
        let series = Series::from_records(
            "mean",
            &[],
            "mul",
            FieldPath::new("mean", "estimate"),
            Unit::NanosToMillis,
        )
        .unwrap();
        assert!(series.is_empty());
        assert!(series.band_outline().is_empty());
    }
}
