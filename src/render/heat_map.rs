use std::ops::Range;
use std::str::FromStr;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{Figure, FONT};
use crate::colormap::{luminance, ColorMap, Norm};
use crate::error::PlotError;
use crate::grid::Grid;
use crate::input::Tick;

/// Number of slabs a colour bar gradient is drawn with.
const COLOR_BAR_STEPS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl FromStr for Orientation {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertical" => Ok(Orientation::Vertical),
            "horizontal" => Ok(Orientation::Horizontal),
            _ => Err(PlotError::argument(
                "--cbardir",
                s,
                "expected `vertical` or `horizontal`",
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ColorBar {
    pub label: Option<String>,
    /// replaces the automatic ticks when not empty
    pub ticks: Vec<Tick>,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, Default, Builder)]
#[builder(default)]
pub struct HeatMapOptions {
    #[builder(setter(into, strip_option))]
    pub title: Option<String>,
    #[builder(setter(into, strip_option))]
    pub x_label: Option<String>,
    #[builder(setter(into, strip_option))]
    pub y_label: Option<String>,
    /// in cell units, 0 is the center of the first column
    pub x_ticks: Vec<Tick>,
    /// in cell units, 0 is the center of the top row
    pub y_ticks: Vec<Tick>,
    #[builder(setter(strip_option))]
    pub color_bar: Option<ColorBar>,
    /// print every value inside its cell
    pub overlay: bool,
}

/// A grid drawn as coloured cells, row 0 at the top.
pub struct HeatMap {
    pub grid: Grid,
    pub cmap: ColorMap,
    pub norm: Norm,
    pub options: HeatMapOptions,
}

impl HeatMap {
    /// `vmin`/`vmax` override the grid's value range.
    pub fn new(
        grid: Grid,
        cmap: ColorMap,
        vmin: Option<f64>,
        vmax: Option<f64>,
        options: HeatMapOptions,
    ) -> Self {
        let norm = Norm::from_values(grid.value_range(), vmin, vmax);
        log::debug!("colour range {} .. {}", norm.vmin, norm.vmax);
        Self {
            grid,
            cmap,
            norm,
            options,
        }
    }

    pub fn cell_color(&self, value: f64) -> RGBColor {
        self.cmap.color_at(self.norm.normalize(value))
    }

    /// Black on light cells, white on dark ones.
    pub fn overlay_color(&self, value: f64) -> RGBColor {
        match luminance(&self.cell_color(value)) > 0.5 {
            true => BLACK,
            false => WHITE,
        }
    }

    fn draw_cells<DB>(&self, area: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (width, height) = (self.grid.width() as f64, self.grid.height() as f64);

        let mut builder = ChartBuilder::on(area);
        builder
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60);
        if let Some(title) = &self.options.title {
            builder.caption(title, (FONT, 24));
        }
        let mut chart = builder.build_cartesian_2d(0f64..width, 0f64..height)?;

        // ticks are drawn below, at cell centers
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(0)
            .y_labels(0)
            .x_desc(self.options.x_label.clone().unwrap_or_default())
            .y_desc(self.options.y_label.clone().unwrap_or_default())
            .axis_desc_style((FONT, 16))
            .draw()?;

        chart.draw_series(self.grid.cells().map(|(row, column, value)| {
            let (x, y) = (column as f64, height - row as f64 - 1.0);
            Rectangle::new([(x, y), (x + 1.0, y + 1.0)], self.cell_color(value).filled())
        }))?;

        if self.options.overlay {
            let cells = self.grid.cells().filter(|(_, _, value)| !value.is_nan());
            chart.draw_series(cells.map(|(row, column, value)| {
                let style = (FONT, 12)
                    .into_font()
                    .color(&self.overlay_color(value))
                    .pos(Pos::new(HPos::Center, VPos::Center));
                let center = (column as f64 + 0.5, height - row as f64 - 0.5);
                EmptyElement::at(center) + Text::new(format!("{value}"), (0, 0), style)
            }))?;
        }

        let x_ticks = ticks_or_indices(&self.options.x_ticks, self.grid.width());
        let x_style = (FONT, 12)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        chart.draw_series(x_ticks.into_iter().map(|tick| {
            EmptyElement::at((tick.position + 0.5, 0.0))
                + PathElement::new(vec![(0, 0), (0, 4)], BLACK)
                + Text::new(tick.label, (0, 6), x_style.clone())
        }))?;

        let y_ticks = ticks_or_indices(&self.options.y_ticks, self.grid.height());
        let y_style = (FONT, 12)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));
        chart.draw_series(y_ticks.into_iter().map(|tick| {
            EmptyElement::at((0.0, height - tick.position - 0.5))
                + PathElement::new(vec![(0, 0), (-4, 0)], BLACK)
                + Text::new(tick.label, (-6, 0), y_style.clone())
        }))?;

        Ok(())
    }
}

/// Custom ticks, or one tick per index for small grids.
fn ticks_or_indices(ticks: &[Tick], n: usize) -> Vec<Tick> {
    if !ticks.is_empty() {
        return ticks.to_vec();
    }
    let step = n.div_ceil(10).max(1);
    (0..n)
        .step_by(step)
        .map(|i| Tick {
            position: i as f64,
            label: i.to_string(),
        })
        .collect()
}

fn value_range(norm: &Norm) -> Range<f64> {
    let (low, high) = match norm.vmin.partial_cmp(&norm.vmax) {
        Some(std::cmp::Ordering::Less) => (norm.vmin, norm.vmax),
        Some(std::cmp::Ordering::Greater) => (norm.vmax, norm.vmin),
        _ => (norm.vmin, norm.vmin + 1.0),
    };
    low..high
}

impl ColorBar {
    fn draw<DB>(&self, area: &DrawingArea<DB, Shift>, cmap: &ColorMap, norm: &Norm) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let range = value_range(norm);
        let slab = |i: usize| {
            let (t0, t1) = (
                i as f64 / COLOR_BAR_STEPS as f64,
                (i + 1) as f64 / COLOR_BAR_STEPS as f64,
            );
            let (v0, v1) = (
                range.start + t0 * (range.end - range.start),
                range.start + t1 * (range.end - range.start),
            );
            (v0, v1, cmap.color_at(norm.normalize((v0 + v1) / 2.0)))
        };
        let label = self.label.clone().unwrap_or_default();
        let style = (FONT, 12).into_font().color(&BLACK);

        match self.orientation {
            Orientation::Vertical => {
                let mut chart = ChartBuilder::on(area)
                    .margin(10)
                    .margin_right(40)
                    .y_label_area_size(0)
                    .right_y_label_area_size(50)
                    .build_cartesian_2d(0f64..1f64, range.clone())?
                    .set_secondary_coord(0f64..1f64, range.clone());

                let mut mesh = chart.configure_secondary_axes();
                mesh.y_desc(label).axis_desc_style((FONT, 14));
                if !self.ticks.is_empty() {
                    mesh.y_labels(0);
                }
                mesh.draw()?;

                chart.draw_series((0..COLOR_BAR_STEPS).map(slab).map(|(v0, v1, color)| {
                    Rectangle::new([(0.0, v0), (1.0, v1)], color.filled())
                }))?;

                let style = style.pos(Pos::new(HPos::Left, VPos::Center));
                chart.draw_series(self.ticks.iter().map(|tick| {
                    EmptyElement::at((1.0, tick.position))
                        + PathElement::new(vec![(0, 0), (4, 0)], BLACK)
                        + Text::new(tick.label.clone(), (6, 0), style.clone())
                }))?;
            }
            Orientation::Horizontal => {
                let mut chart = ChartBuilder::on(area)
                    .margin(10)
                    .x_label_area_size(40)
                    .y_label_area_size(0)
                    .build_cartesian_2d(range.clone(), 0f64..1f64)?;

                let mut mesh = chart.configure_mesh();
                mesh.disable_mesh()
                    .y_labels(0)
                    .x_desc(label)
                    .axis_desc_style((FONT, 14));
                if !self.ticks.is_empty() {
                    mesh.x_labels(0);
                }
                mesh.draw()?;

                chart.draw_series((0..COLOR_BAR_STEPS).map(slab).map(|(v0, v1, color)| {
                    Rectangle::new([(v0, 0.0), (v1, 1.0)], color.filled())
                }))?;

                let style = style.pos(Pos::new(HPos::Center, VPos::Top));
                chart.draw_series(self.ticks.iter().map(|tick| {
                    EmptyElement::at((tick.position, 0.0))
                        + PathElement::new(vec![(0, 0), (0, 4)], BLACK)
                        + Text::new(tick.label.clone(), (0, 6), style.clone())
                }))?;
            }
        }

        Ok(())
    }
}

impl Figure for HeatMap {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let Some(color_bar) = &self.options.color_bar else {
            if !self.grid.is_empty() {
                self.draw_cells(root)?;
            }
            return Ok(());
        };

        if self.grid.is_empty() {
            return color_bar.draw(root, &self.cmap, &self.norm);
        }

        let (width, height) = root.dim_in_pixel();
        let (cells, bar) = match color_bar.orientation {
            Orientation::Vertical => root.split_horizontally(width * 85 / 100),
            Orientation::Horizontal => root.split_vertically(height * 80 / 100),
        };
        self.draw_cells(&cells)?;
        color_bar.draw(&bar, &self.cmap, &self.norm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MissingPolicy;
    use crate::render::{save, OutputBuilder};

    fn grid() -> Grid {
        Grid::reshape(
            &[Some(1.0), Some(2.0), None, Some(4.0), Some(5.0), Some(6.0)],
            3,
            2,
            MissingPolicy::Nan,
        )
        .unwrap()
    }

    fn render(heat_map: &HeatMap, name: &str) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = camino::Utf8Path::from_path(dir.path()).unwrap().join(name);
        let output = OutputBuilder::default()
            .path(path.clone())
            .figsize((4.0, 3.0))
            .dpi(50u32)
            .build()
            .unwrap();
        save(heat_map, &output).unwrap();
        std::fs::read_to_string(&path).unwrap()
    }

    #[test]
    fn orientation_from_str() {
        assert_eq!(
            "horizontal".parse::<Orientation>().unwrap(),
            Orientation::Horizontal
        );
        assert!("diagonal".parse::<Orientation>().is_err());
    }

    #[test]
    fn colors() {
        let cmap = ColorMap::by_name("gray").unwrap();
        let heat_map = HeatMap::new(grid(), cmap, None, None, HeatMapOptions::default());
        assert_eq!((heat_map.norm.vmin, heat_map.norm.vmax), (1.0, 6.0));
        assert_eq!(heat_map.cell_color(1.0), RGBColor(0, 0, 0));
        assert_eq!(heat_map.cell_color(6.0), RGBColor(255, 255, 255));
        assert_eq!(heat_map.cell_color(f64::NAN), RGBColor(255, 255, 255));
        assert_eq!(heat_map.overlay_color(1.0), WHITE);
        assert_eq!(heat_map.overlay_color(6.0), BLACK);
    }

    #[test]
    fn explicit_bounds() {
        let cmap = ColorMap::by_name("gray").unwrap();
        let heat_map = HeatMap::new(grid(), cmap, Some(0.0), None, HeatMapOptions::default());
        assert_eq!((heat_map.norm.vmin, heat_map.norm.vmax), (0.0, 6.0));
        assert_eq!(heat_map.cell_color(3.0), RGBColor(128, 128, 128));
    }

    #[test]
    fn default_ticks() {
        let ticks = ticks_or_indices(&[], 3);
        assert_eq!(ticks.len(), 3);
        assert_eq!(ticks[2].label, "2");
        assert_eq!(ticks_or_indices(&[], 25).len(), 9);

        let custom = vec![Tick {
            position: 0.5,
            label: "mid".to_string(),
        }];
        assert_eq!(ticks_or_indices(&custom, 3), custom);
    }

    #[test]
    fn degenerate_range() {
        let norm = Norm {
            vmin: 2.0,
            vmax: 2.0,
        };
        assert_eq!(value_range(&norm), 2.0..3.0);
        let reversed = Norm {
            vmin: 5.0,
            vmax: 1.0,
        };
        assert_eq!(value_range(&reversed), 1.0..5.0);
    }

    #[test]
    fn renders_with_overlay_and_color_bar() {
        let options = HeatMapOptionsBuilder::default()
            .title("grid")
            .x_label("column")
            .y_ticks(vec!["0:top".parse().unwrap(), "1:bottom".parse().unwrap()])
            .color_bar(ColorBar {
                label: Some("value".to_string()),
                ticks: vec!["1:low".parse().unwrap(), "6:high".parse().unwrap()],
                orientation: Orientation::Vertical,
            })
            .overlay(true)
            .build()
            .unwrap();
        let cmap = ColorMap::by_name("plasma").unwrap().resampled(4);
        let svg = render(&HeatMap::new(grid(), cmap, None, None, options), "heat.svg");
        assert!(svg.contains("bottom"));
        assert!(svg.contains("high"));
        // overlay values, one text element each
        assert!(svg.contains("\n5\n</text>"));
        assert!(svg.contains("\n6\n</text>"));
    }

    #[test]
    fn renders_color_bar_only() {
        let grid = Grid::reshape(&[], 0, 0, MissingPolicy::Nan).unwrap();
        let options = HeatMapOptionsBuilder::default()
            .color_bar(ColorBar {
                orientation: Orientation::Horizontal,
                ..Default::default()
            })
            .build()
            .unwrap();
        let cmap = ColorMap::by_name("viridis").unwrap();
        let heat_map = HeatMap::new(grid, cmap, None, None, options);
        assert!(!render(&heat_map, "cbar.svg").is_empty());
    }
}
