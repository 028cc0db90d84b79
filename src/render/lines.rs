use anyhow::Result;
use plotters::coord::ranged1d::{AsRangedCoord, ValueFormatter};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::{axis_range, palette, panel_areas, ChartOptions, Figure, Scale, FONT};
use crate::bench::Panel;
use crate::extract::Unit;
use crate::series::{LineStyle, Series};

/// Line plots with error bands, one sub-plot per panel.
pub struct LineChart {
    pub panels: Vec<Panel>,
    pub options: ChartOptions,
}

impl LineChart {
    /// A single plot of `series`.
    pub fn single(series: Vec<Series>, options: ChartOptions) -> Self {
        Self {
            panels: vec![Panel {
                title: String::new(),
                unit: Unit::Raw,
                series,
            }],
            options,
        }
    }
}

impl Figure for LineChart {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let area = match &self.options.title {
            Some(title) if self.panels.len() > 1 => root.titled(title, (FONT, 28))?,
            _ => root.clone(),
        };

        for (panel, area) in self.panels.iter().zip(panel_areas(&area, self.panels.len())) {
            let caption = match (&self.options.title, self.panels.len()) {
                (Some(title), 1) if panel.title.is_empty() => title.clone(),
                _ => panel.title.clone(),
            };
            if panel.is_empty() {
                log::info!("nothing to plot in `{}`", panel.title);
            }
            self.draw_panel(&area, panel, &caption)?;
        }

        Ok(())
    }
}

impl LineChart {
    fn draw_panel<DB>(
        &self,
        area: &DrawingArea<DB, Shift>,
        panel: &Panel,
        caption: &str,
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (x_scale, y_scale) = (self.options.x_scale, self.options.y_scale);
        let x_range = axis_range(
            panel.series.iter().flat_map(|s| s.xs().iter().copied()),
            x_scale,
        );
        let y_range = axis_range(
            panel
                .series
                .iter()
                .flat_map(|s| s.lower().iter().chain(s.upper()).chain(s.ys()).copied()),
            y_scale,
        );

        match (x_scale, y_scale) {
            (Scale::Linear, Scale::Linear) => self.draw_on(area, panel, caption, x_range, y_range),
            (Scale::Linear, Scale::Log) => {
                self.draw_on(area, panel, caption, x_range, y_range.log_scale())
            }
            (Scale::Log, Scale::Linear) => {
                self.draw_on(area, panel, caption, x_range.log_scale(), y_range)
            }
            (Scale::Log, Scale::Log) => self.draw_on(
                area,
                panel,
                caption,
                x_range.log_scale(),
                y_range.log_scale(),
            ),
        }
    }

    fn draw_on<DB, X, Y>(
        &self,
        area: &DrawingArea<DB, Shift>,
        panel: &Panel,
        caption: &str,
        x_spec: X,
        y_spec: Y,
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
        X: AsRangedCoord<Value = f64>,
        Y: AsRangedCoord<Value = f64>,
        X::CoordDescType: ValueFormatter<f64>,
        Y::CoordDescType: ValueFormatter<f64>,
    {
        let mut builder = ChartBuilder::on(area);
        builder
            .margin(self.options.margin())
            .x_label_area_size(40)
            .y_label_area_size(70);
        if !caption.is_empty() {
            builder.caption(caption, (FONT, 20));
        }
        let mut chart = builder.build_cartesian_2d(x_spec, y_spec)?;

        let y_label = match (&self.options.y_label, panel.unit) {
            (Some(label), _) => label.clone(),
            (None, Unit::Raw) => String::new(),
            (None, unit) => unit.axis_label().to_string(),
        };
        chart
            .configure_mesh()
            .x_desc(self.options.x_label.clone().unwrap_or_default())
            .y_desc(y_label)
            .axis_desc_style((FONT, 16))
            .draw()?;

        // values a log axis cannot show are pinned to its lower end
        let floor = |y: f64, scale: Scale, min: f64| match scale {
            Scale::Log if y <= 0.0 => min,
            _ => y,
        };
        let y_min = axis_range(
            panel.series.iter().flat_map(|s| s.lower().iter().copied()),
            self.options.y_scale,
        )
        .start;
        let visible = |(x, y): &(f64, f64)| match (self.options.x_scale, self.options.y_scale) {
            (Scale::Log, _) if *x <= 0.0 => false,
            (_, Scale::Log) if *y <= 0.0 => false,
            _ => true,
        };

        let mut labeled = false;
        for (i, series) in panel.series.iter().enumerate() {
            if series.is_empty() {
                log::debug!("{}: empty series `{}`", panel.title, series.label);
                continue;
            }
            let color = palette(i);

            if series.has_band() {
                let outline: Vec<(f64, f64)> = series
                    .band_outline()
                    .into_iter()
                    .map(|(x, y)| (x, floor(y, self.options.y_scale, y_min)))
                    .filter(visible)
                    .collect();
                chart.draw_series(std::iter::once(Polygon::new(
                    outline,
                    color.mix(0.3).filled(),
                )))?;
            }

            let points: Vec<(f64, f64)> = series.points().filter(visible).collect();
            let stroke = match series.style {
                LineStyle::Solid => 2,
                LineStyle::Alternate => 1,
            };
            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(stroke)))?
                .label(series.label.clone())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(stroke))
                });
            labeled = true;

            match series.style {
                LineStyle::Solid => {
                    chart.draw_series(points.iter().map(|p| Circle::new(*p, 3, color.filled())))?;
                }
                LineStyle::Alternate => {
                    chart.draw_series(
                        points
                            .iter()
                            .map(|p| TriangleMarker::new(*p, 4, color.filled())),
                    )?;
                }
            }
        }

        if labeled {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font((FONT, 14))
                .draw()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{save, ChartOptionsBuilder, OutputBuilder};

    fn series() -> Vec<Series> {
        vec![
            Series::with_errors(
                "Alice",
                vec![1.0, 2.0, 4.0],
                vec![1143.0, 1310.0, 1609.0],
                &[120.0, 248.0, 258.0],
            )
            .unwrap(),
            Series::without_band("empty", vec![], vec![]).unwrap(),
            Series::with_errors("Bob-ark", vec![1.0, 2.0], vec![2.0, 0.5], &[1.0, 1.0])
                .unwrap()
                .with_style(LineStyle::Alternate),
        ]
    }

    #[test]
    fn renders_linear_and_log() {
        let dir = tempfile::tempdir().unwrap();
        for (name, x_scale, y_scale) in [
            ("linear.svg", Scale::Linear, Scale::Linear),
            ("loglog.svg", Scale::Log, Scale::Log),
        ] {
            let options = ChartOptionsBuilder::default()
                .title("timings")
                .x_label("x")
                .y_label("time")
                .x_scale(x_scale)
                .y_scale(y_scale)
                .build()
                .unwrap();
            let path = camino::Utf8Path::from_path(dir.path()).unwrap().join(name);
            let output = OutputBuilder::default()
                .path(path.clone())
                .figsize((4.0, 3.0))
                .dpi(50u32)
                .build()
                .unwrap();
            save(&LineChart::single(series(), options), &output).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }

    #[test]
    fn renders_empty_panels() {
        let dir = tempfile::tempdir().unwrap();
        let path = camino::Utf8Path::from_path(dir.path()).unwrap().join("empty.svg");
        let chart = LineChart {
            panels: vec![
                Panel {
                    title: "mul".to_string(),
                    unit: Unit::NanosToMillis,
                    series: vec![],
                },
                Panel {
                    title: "inverse".to_string(),
                    unit: Unit::NanosToMillis,
                    series: series(),
                },
            ],
            options: ChartOptionsBuilder::default()
                .y_scale(Scale::Log)
                .build()
                .unwrap(),
        };
        let output = OutputBuilder::default()
            .path(path.clone())
            .figsize((4.0, 6.0))
            .dpi(50u32)
            .build()
            .unwrap();
        save(&chart, &output).unwrap();
        assert!(path.exists());
    }
}
