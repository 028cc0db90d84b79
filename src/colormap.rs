//! Colour maps and value normalisation for heat maps

use std::str::FromStr;

use plotters::style::RGBColor;

use crate::error::PlotError;

const VIRIDIS: &[u32] = &[
    0x440154, 0x482878, 0x3e4989, 0x31688e, 0x26828e, 0x1f9e89, 0x35b779, 0x6ece58, 0xb5de2b,
    0xfde725,
];
const PLASMA: &[u32] = &[
    0x0d0887, 0x46039f, 0x7201a8, 0x9c179e, 0xbd3786, 0xd8576b, 0xed7953, 0xfb9f3a, 0xfdca26,
    0xf0f921,
];
const INFERNO: &[u32] = &[
    0x000004, 0x1b0c41, 0x4a0c6b, 0x781c6d, 0xa52c60, 0xcf4446, 0xed6925, 0xfb9b06, 0xf7d13d,
    0xfcffa4,
];
const MAGMA: &[u32] = &[
    0x000004, 0x180f3d, 0x440f76, 0x721f81, 0x9e2f7f, 0xcd4071, 0xf1605d, 0xfd9668, 0xfeca8d,
    0xfcfdbf,
];
const GRAY: &[u32] = &[0x000000, 0xffffff];
const COOLWARM: &[u32] = &[0x3b4cc0, 0x8db0fe, 0xdddddd, 0xf49a7b, 0xb40426];

pub const NAMES: &[&str] = &["plasma", "viridis", "inferno", "magma", "gray", "coolwarm"];

fn hex(rgb: u32) -> RGBColor {
    RGBColor((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Colour of cells without data.
pub const BAD_COLOR: RGBColor = RGBColor(255, 255, 255);

/// Maps `[0, 1]` to colours.
///
/// Continuous maps interpolate linearly between their stops, listed maps
/// pick the stop whose bin contains the value.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    stops: Vec<RGBColor>,
    listed: bool,
}

impl ColorMap {
    pub fn by_name(name: &str) -> Option<Self> {
        let stops = match name {
            "plasma" => PLASMA,
            "viridis" => VIRIDIS,
            "inferno" => INFERNO,
            "magma" => MAGMA,
            "gray" | "grey" | "greys_r" => GRAY,
            "coolwarm" => COOLWARM,
            _ => return None,
        };
        Some(Self {
            stops: stops.iter().copied().map(hex).collect(),
            listed: false,
        })
    }

    pub fn listed(stops: Vec<RGBColor>) -> Self {
        Self {
            stops,
            listed: true,
        }
    }

    /// `n` evenly spaced samples of this map as a listed map.
    pub fn resampled(&self, n: usize) -> Self {
        let n = n.max(1);
        let stops = (0..n)
            .map(|i| match n {
                1 => self.color_at(0.0),
                _ => self.color_at(i as f64 / (n - 1) as f64),
            })
            .collect();
        Self::listed(stops)
    }

    pub fn color_at(&self, t: f64) -> RGBColor {
        if t.is_nan() || self.stops.is_empty() {
            return BAD_COLOR;
        }
        let t = t.clamp(0.0, 1.0);
        let n = self.stops.len();

        if self.listed || n == 1 {
            let index = ((t * n as f64) as usize).min(n - 1);
            return self.stops[index];
        }

        let scaled = t * (n - 1) as f64;
        let index = (scaled as usize).min(n - 2);
        let frac = scaled - index as f64;
        let (a, b) = (self.stops[index], self.stops[index + 1]);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
        RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

impl FromStr for ColorMap {
    type Err = PlotError;

    /// A map name, or a JSON list of 0-255 RGB(A) colours.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim_start().starts_with('[') {
            let colors: Vec<Vec<f64>> = crate::input::parse_json("--cmap", s)?;
            if colors.is_empty() {
                return Err(PlotError::argument("--cmap", s, "empty colour list"));
            }
            let stops = colors
                .iter()
                .map(|c| match c[..] {
                    [r, g, b] | [r, g, b, _] => Ok(RGBColor(channel(r), channel(g), channel(b))),
                    _ => Err(PlotError::argument("--cmap", s, "colours need 3 or 4 channels")),
                })
                .collect::<Result<_, _>>()?;
            return Ok(Self::listed(stops));
        }

        Self::by_name(s).ok_or_else(|| {
            PlotError::argument("--cmap", s, format!("known maps: {}", NAMES.join(", ")))
        })
    }
}

fn channel(v: f64) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

/// Relative luminance in `[0, 1]`.
pub fn luminance(color: &RGBColor) -> f64 {
    (0.299 * color.0 as f64 + 0.587 * color.1 as f64 + 0.114 * color.2 as f64) / 255.0
}

/// Linear mapping of `[vmin, vmax]` onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Norm {
    pub vmin: f64,
    pub vmax: f64,
}

impl Norm {
    /// Explicit bounds win, the rest is taken from the data range. Without
    /// data, missing bounds default to 0 and 1.
    pub fn from_values(range: Option<(f64, f64)>, vmin: Option<f64>, vmax: Option<f64>) -> Self {
        let (data_min, data_max) = range.unwrap_or((0.0, 1.0));
        Self {
            vmin: vmin.unwrap_or(data_min),
            vmax: vmax.unwrap_or(data_max),
        }
    }

    pub fn normalize(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::NAN;
        }
        if self.vmax == self.vmin {
            return 0.0;
        }
        ((value - self.vmin) / (self.vmax - self.vmin)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_map_endpoints() {
        let map = ColorMap::by_name("plasma").unwrap();
        assert_eq!(map.color_at(0.0), RGBColor(0x0d, 0x08, 0x87));
        assert_eq!(map.color_at(1.0), RGBColor(0xf0, 0xf9, 0x21));
        assert_eq!(map.color_at(2.0), map.color_at(1.0));
        assert_eq!(map.color_at(f64::NAN), BAD_COLOR);
        assert!(ColorMap::by_name("jet").is_none());
    }

    #[test]
    fn interpolation() {
        let map = ColorMap::by_name("gray").unwrap();
        assert_eq!(map.color_at(0.5), RGBColor(128, 128, 128));
    }

    #[test]
    fn listed_from_json() {
        let map: ColorMap = "[[255, 0, 0], [0, 0, 255, 255]]".parse().unwrap();
        assert_eq!(map.color_at(0.0), RGBColor(255, 0, 0));
        assert_eq!(map.color_at(0.49), RGBColor(255, 0, 0));
        assert_eq!(map.color_at(0.5), RGBColor(0, 0, 255));
        assert_eq!(map.color_at(1.0), RGBColor(0, 0, 255));

        assert!("[]".parse::<ColorMap>().is_err());
        assert!("[[1, 2]]".parse::<ColorMap>().is_err());
        assert!("nope".parse::<ColorMap>().is_err());
    }

    #[test]
    fn resampled_is_discrete() {
        let map = ColorMap::by_name("gray").unwrap().resampled(2);
        assert_eq!(map.color_at(0.25), RGBColor(0, 0, 0));
        assert_eq!(map.color_at(0.75), RGBColor(255, 255, 255));
    }

    #[test]
    fn norm() {
        let norm = Norm::from_values(Some((2.0, 6.0)), None, None);
        assert_eq!(norm.normalize(4.0), 0.5);
        assert_eq!(norm.normalize(10.0), 1.0);
        assert_eq!(norm.normalize(-1.0), 0.0);
        assert!(norm.normalize(f64::NAN).is_nan());

        let clipped = Norm::from_values(Some((2.0, 6.0)), Some(0.0), None);
        assert_eq!(clipped.normalize(3.0), 0.5);

        let flat = Norm::from_values(Some((3.0, 3.0)), None, None);
        assert_eq!(flat.normalize(3.0), 0.0);

        let empty = Norm::from_values(None, None, None);
        assert_eq!((empty.vmin, empty.vmax), (0.0, 1.0));
    }

    #[test]
    fn luminance_threshold() {
        assert!(luminance(&RGBColor(255, 255, 255)) > 0.5);
        assert!(luminance(&RGBColor(0x0d, 0x08, 0x87)) < 0.5);
    }
}
