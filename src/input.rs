//! JSON documents and small values passed directly on the command line

use std::str::FromStr;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::PlotError;
use crate::extract::Unit;
use crate::series::{LineStyle, Series};

pub fn parse_json<T: DeserializeOwned>(what: &str, data: &str) -> Result<T, PlotError> {
    serde_json::from_str(data).map_err(|source| PlotError::Parse {
        what: what.to_string(),
        source,
    })
}

/// Groups whose name ends like this are drawn in the alternate line style.
pub const ALTERNATE_SUFFIX: &str = "-ark";

#[derive(Debug, Deserialize)]
pub struct SeriesGroup {
    pub group: String,
    pub items: Vec<SeriesItem>,
}

#[derive(Debug, Deserialize)]
pub struct SeriesItem {
    pub x: f64,
    pub measurement: f64,
    #[serde(default)]
    pub error: f64,
}

impl SeriesGroup {
    pub fn into_series(self) -> Result<Series, PlotError> {
        let style = match self.group.ends_with(ALTERNATE_SUFFIX) {
            true => LineStyle::Alternate,
            false => LineStyle::Solid,
        };
        let xs = self.items.iter().map(|item| item.x).collect();
        let ys = self.items.iter().map(|item| item.measurement).collect();
        let errors: Vec<f64> = self.items.iter().map(|item| item.error).collect();
        Ok(Series::with_errors(self.group, xs, ys, &errors)?.with_style(style))
    }
}

pub fn parse_series_groups(data: &str) -> Result<Vec<Series>, PlotError> {
    let groups: Vec<SeriesGroup> = parse_json("series data", data)?;
    groups.into_iter().map(SeriesGroup::into_series).collect()
}

#[derive(Debug, Deserialize)]
pub struct CommitGroup {
    pub group: String,
    pub items: Vec<CommitItem>,
}

/// One commit timing, `t` in nanoseconds.
#[derive(Debug, Deserialize)]
pub struct CommitItem {
    pub degree: f64,
    pub t: f64,
}

pub fn parse_commit_groups(data: &str) -> Result<Vec<Series>, PlotError> {
    let groups: Vec<CommitGroup> = parse_json("commit data", data)?;
    groups
        .into_iter()
        .map(|group| {
            let xs = group.items.iter().map(|item| item.degree).collect();
            let ys = group
                .items
                .iter()
                .map(|item| Unit::NanosToMillis.apply(item.t))
                .collect();
            Series::without_band(group.group, xs, ys)
        })
        .collect()
}

/// Values of a multi-bar chart: one cluster per group, one bar per
/// attribute inside each cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct BarTable {
    pub groups: Vec<String>,
    /// attribute -> one value per group, in group order
    pub measurements: IndexMap<String, Vec<f64>>,
}

impl BarTable {
    pub fn max_value(&self) -> f64 {
        self.measurements
            .values()
            .flatten()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min_value(&self) -> f64 {
        self.measurements
            .values()
            .flatten()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }
}

/// Turns `{group: {attribute: value}}` into a [`BarTable`]. The attributes
/// of the first group decide which bars are drawn.
pub fn extract_bars(table: IndexMap<String, IndexMap<String, f64>>) -> Result<BarTable, PlotError> {
    let Some((_, first)) = table.first() else {
        return Err(PlotError::argument("data", "{}", "no groups to plot"));
    };

    let groups: Vec<String> = table.keys().cloned().collect();
    let mut measurements = IndexMap::new();
    for attribute in first.keys() {
        let values = table
            .iter()
            .map(|(group, values)| {
                values
                    .get(attribute)
                    .copied()
                    .ok_or_else(|| PlotError::MissingField {
                        id: group.clone(),
                        field: attribute.clone(),
                    })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        measurements.insert(attribute.clone(), values);
    }

    Ok(BarTable {
        groups,
        measurements,
    })
}

pub fn parse_bar_table(data: &str) -> Result<BarTable, PlotError> {
    extract_bars(parse_json("bar data", data)?)
}

/// A `position:label` pair for custom axis or colour bar ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

impl FromStr for Tick {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split(':').collect();
        let [position, label] = tokens[..] else {
            return Err(PlotError::argument("ticks", s, "expected `float:str` pair"));
        };
        let position = position
            .trim()
            .parse()
            .map_err(|_| PlotError::argument("ticks", s, "tick position is not a number"))?;
        Ok(Tick {
            position,
            label: label.to_string(),
        })
    }
}

/// A heat map cell: a number, or `null`/`none`/`nan` for a missing value.
pub fn parse_cell(s: &str) -> Result<Option<f64>, PlotError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "null" | "none" | "nan" => Ok(None),
        other => other
            .parse::<f64>()
            .map(Some)
            .map_err(|_| PlotError::argument("values", s, "expected a number or `null`")),
    }
}

/// A decoded RGB(A) image, row-major, 8 bits per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<[u8; 4]>,
}

impl RgbaImage {
    pub fn pixel(&self, row: usize, column: usize) -> [u8; 4] {
        self.pixels[row * self.width + column]
    }
}

impl FromStr for RgbaImage {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<Vec<Vec<Value>>> = parse_json("image", s)?;
        decode_image(rows)
    }
}

/// Integer channels are 0..=255, float channels 0..=1; both are clipped.
fn decode_image(rows: Vec<Vec<Vec<Value>>>) -> Result<RgbaImage, PlotError> {
    let height = rows.len();
    let width = rows.first().map(Vec::len).unwrap_or(0);

    let mut pixels = Vec::with_capacity(width.saturating_mul(height));
    for (y, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(PlotError::ImageShape {
                row: y,
                detail: format!("{} pixels, the first row has {width}", row.len()),
            });
        }
        for (x, pixel) in row.iter().enumerate() {
            if pixel.len() != 3 && pixel.len() != 4 {
                return Err(PlotError::ImageShape {
                    row: y,
                    detail: format!("pixel {x} has {} channels, expected 3 or 4", pixel.len()),
                });
            }
            pixels.push(decode_pixel(pixel)?);
        }
    }

    Ok(RgbaImage {
        width,
        height,
        pixels,
    })
}

fn decode_pixel(channels: &[Value]) -> Result<[u8; 4], PlotError> {
    let mut rgba = [255u8; 4];
    for (slot, channel) in rgba.iter_mut().zip(channels) {
        *slot = match channel {
            Value::Number(n) if n.is_i64() || n.is_u64() => {
                n.as_i64().unwrap_or(i64::MAX).clamp(0, 255) as u8
            }
            Value::Number(n) => {
                let v = n.as_f64().unwrap_or(0.0).clamp(0.0, 1.0);
                (v * 255.0).round() as u8
            }
            other => {
                return Err(PlotError::argument(
                    "values",
                    other.to_string(),
                    "pixel channels must be numbers",
                ))
            }
        };
    }
    Ok(rgba)
}
