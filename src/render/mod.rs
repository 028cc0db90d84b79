//! Drawing figures with plotters

use std::ops::Range;
use std::str::FromStr;

use anyhow::{Context as _, Result};
use camino::Utf8PathBuf;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::PlotError;

mod bars;
mod heat_map;
mod image;
mod lines;

pub use bars::BarChart;
pub use heat_map::{ColorBar, HeatMap, HeatMapOptionsBuilder, Orientation};
pub use image::ImagePreview;
pub use lines::LineChart;

pub const FONT: &str = "sans-serif";

/// the "tab10" colour cycle
pub const PALETTE: &[RGBColor] = &[
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

pub fn palette(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Something that can draw itself onto any plotters backend.
pub trait Figure {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

impl FromStr for Scale {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Scale::Linear),
            "log" => Ok(Scale::Log),
            _ => Err(PlotError::argument("scale", s, "expected `linear` or `log`")),
        }
    }
}

/// Axis range covering all finite `values` (only positive ones on a log
/// axis), with some padding.
pub fn axis_range(values: impl IntoIterator<Item = f64>, scale: Scale) -> Range<f64> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        if !value.is_finite() || (scale == Scale::Log && value <= 0.0) {
            continue;
        }
        min = min.min(value);
        max = max.max(value);
    }

    match scale {
        Scale::Linear => {
            if min > max {
                return 0.0..1.0;
            }
            if min == max {
                return (min - 1.0)..(max + 1.0);
            }
            let pad = (max - min) * 0.05;
            (min - pad)..(max + pad)
        }
        Scale::Log => {
            if min > max {
                return 1.0..10.0;
            }
            if min == max {
                return (min / 2.0)..(max * 2.0);
            }
            (min / 1.2)..(max * 1.2)
        }
    }
}

/// Options shared by the chart kinds.
#[derive(Debug, Clone, Default, Builder)]
#[builder(default)]
pub struct ChartOptions {
    #[builder(setter(into, strip_option))]
    pub title: Option<String>,
    #[builder(setter(into, strip_option))]
    pub x_label: Option<String>,
    #[builder(setter(into, strip_option))]
    pub y_label: Option<String>,
    pub x_scale: Scale,
    pub y_scale: Scale,
    /// use the tight layout (small margins)
    pub compact: bool,
}

impl ChartOptions {
    pub fn margin(&self) -> i32 {
        match self.compact {
            true => 5,
            false => 20,
        }
    }
}

/// Where and how large a figure gets written.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct Output {
    pub path: Utf8PathBuf,
    /// inches
    #[builder(default = "(16.0, 9.0)")]
    pub figsize: (f64, f64),
    #[builder(default = "100")]
    pub dpi: u32,
}

impl Output {
    pub fn size(&self) -> (u32, u32) {
        let (width, height) = self.figsize;
        let dpi = self.dpi as f64;
        (
            ((width * dpi).round() as u32).max(1),
            ((height * dpi).round() as u32).max(1),
        )
    }

    fn is_svg(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
    }
}

/// Renders `figure` into `output.path`: SVG for `.svg` files, a bitmap
/// otherwise.
pub fn save<F: Figure>(figure: &F, output: &Output) -> Result<()> {
    let size = output.size();
    log::debug!("rendering {}x{} pixels to {}", size.0, size.1, output.path);

    if let Some(parent) = output.path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {parent}"))?;
    }

    let result = if output.is_svg() {
        let root = SVGBackend::new(&output.path, size).into_drawing_area();
        draw_on(figure, &root)
    } else {
        let root = BitMapBackend::new(&output.path, size).into_drawing_area();
        draw_on(figure, &root)
    };
    result.with_context(|| format!("rendering \"{}\"", output.path))?;

    println!("benchplot: plot saved as `{}`", output.path);
    Ok(())
}

fn draw_on<F, DB>(figure: &F, root: &DrawingArea<DB, Shift>) -> Result<()>
where
    F: Figure,
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    figure.draw(root)?;
    root.present()?;
    Ok(())
}

/// Splits `area` into a grid of `n` cells: one column for up to three
/// cells, two columns beyond.
pub fn panel_areas<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    n: usize,
) -> Vec<DrawingArea<DB, Shift>> {
    let columns = if n > 3 { 2 } else { 1 };
    let rows = n.div_ceil(columns).max(1);
    let mut areas = area.split_evenly((rows, columns));
    areas.truncate(n);
    areas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_from_str() {
        assert_eq!("log".parse::<Scale>().unwrap(), Scale::Log);
        assert_eq!("linear".parse::<Scale>().unwrap(), Scale::Linear);
        assert!("symlog".parse::<Scale>().is_err());
    }

    #[test]
    fn linear_range() {
        assert_eq!(axis_range([0.0, 10.0], Scale::Linear), -0.5..10.5);
        assert_eq!(axis_range([3.0], Scale::Linear), 2.0..4.0);
        assert_eq!(axis_range([], Scale::Linear), 0.0..1.0);
        assert_eq!(axis_range([f64::NAN, 1.0, 1.0], Scale::Linear), 0.0..2.0);
    }

    #[test]
    fn log_range_ignores_non_positive() {
        let range = axis_range([-5.0, 0.0, 2.0, 8.0], Scale::Log);
        assert!(range.start > 0.0);
        assert_eq!(range, (2.0 / 1.2)..(8.0 * 1.2));
        assert_eq!(axis_range([-1.0], Scale::Log), 1.0..10.0);
    }

    #[test]
    fn output_size() {
        let output = OutputBuilder::default()
            .path("plot.png")
            .figsize((6.4, 4.8))
            .dpi(100u32)
            .build()
            .unwrap();
        assert_eq!(output.size(), (640, 480));
        assert!(!output.is_svg());

        let svg = OutputBuilder::default().path("plot.SVG").build().unwrap();
        assert!(svg.is_svg());
        assert_eq!(svg.size(), (1600, 900));
    }

    #[test]
    fn chart_options_builder() {
        let options = ChartOptionsBuilder::default()
            .title("t")
            .y_scale(Scale::Log)
            .build()
            .unwrap();
        assert_eq!(options.title.as_deref(), Some("t"));
        assert_eq!(options.x_label, None);
        assert_eq!(options.y_scale, Scale::Log);
        assert_eq!(options.margin(), 20);
    }
}
