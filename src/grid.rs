use std::str::FromStr;

use itertools::{Itertools, MinMaxResult};

use crate::error::PlotError;

/// What to do with a missing cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// store NaN, rendered as a "no data" cell
    #[default]
    Nan,
    /// fail with [`PlotError::MissingValue`]
    Error,
}

impl FromStr for MissingPolicy {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nan" => Ok(MissingPolicy::Nan),
            "error" => Ok(MissingPolicy::Error),
            _ => Err(PlotError::argument("--missing", s, "expected `nan` or `error`")),
        }
    }
}

/// A row-major `height` x `width` grid of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<f64>,
}

impl Grid {
    /// Lays `values` out row by row. `width * height` must match the number
    /// of values.
    pub fn reshape(
        values: &[Option<f64>],
        width: usize,
        height: usize,
        policy: MissingPolicy,
    ) -> Result<Self, PlotError> {
        // u128 cannot overflow for two usize factors
        let expected = width as u128 * height as u128;
        if expected != values.len() as u128 {
            return Err(PlotError::ShapeMismatch {
                expected,
                actual: values.len(),
                width,
                height,
            });
        }

        let mut missing = 0;
        let mut cells = Vec::with_capacity(values.len());
        for (position, value) in values.iter().enumerate() {
            match (value, policy) {
                (Some(value), _) => cells.push(*value),
                (None, MissingPolicy::Nan) => {
                    missing += 1;
                    cells.push(f64::NAN);
                }
                (None, MissingPolicy::Error) => {
                    return Err(PlotError::MissingValue {
                        row: position / width,
                        column: position % width,
                    })
                }
            }
        }

        if missing > 0 {
            log::info!("{missing} missing values shown as empty cells");
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if row < self.height && column < self.width {
            Some(self.cells[row * self.width + column])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks() panics on 0
        self.cells.chunks(self.width.max(1))
    }

    /// `(row, column, value)` for every cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows()
            .enumerate()
            .flat_map(|(row, values)| {
                values
                    .iter()
                    .enumerate()
                    .map(move |(column, v)| (row, column, *v))
            })
    }

    /// Smallest and largest non-NaN value.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let values = self.cells.iter().copied().filter(|v| !v.is_nan());
        match values.minmax_by(|a, b| a.total_cmp(b)) {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(v) => Some((v, v)),
            MinMaxResult::MinMax(min, max) => Some((min, max)),
        }
    }
}
