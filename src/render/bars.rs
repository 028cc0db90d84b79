use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{palette, ChartOptions, Figure, FONT};
use crate::input::BarTable;

pub const BAR_WIDTH: f64 = 0.25;

/// Clustered bars: one cluster per group, one bar per attribute.
pub struct BarChart {
    pub table: BarTable,
    pub options: ChartOptions,
}

impl BarChart {
    fn attributes(&self) -> usize {
        self.table.measurements.len()
    }

    /// x of the left edge of bar `attribute` in cluster `group`
    fn bar_left(&self, group: usize, attribute: usize) -> f64 {
        group as f64 + BAR_WIDTH * attribute as f64
    }

    fn cluster_center(&self, group: usize) -> f64 {
        group as f64 + BAR_WIDTH * self.attributes() as f64 / 2.0
    }

    fn y_range(&self) -> (f64, f64) {
        let (min, max) = (self.table.min_value(), self.table.max_value());
        let (low, high) = (min.min(0.0), max.max(0.0));
        // headroom for the value labels
        let pad = match high - low {
            span if span > 0.0 => span * 0.15,
            _ => 1.0,
        };
        (if low < 0.0 { low - pad } else { 0.0 }, high + pad)
    }
}

impl Figure for BarChart {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let groups = self.table.groups.len();
        let x_end = self.bar_left(groups.saturating_sub(1), self.attributes()) + BAR_WIDTH;
        let x_range = -BAR_WIDTH..x_end;
        let (y_min, y_max) = self.y_range();

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(self.options.margin())
            .x_label_area_size(40)
            .y_label_area_size(60);
        if let Some(title) = &self.options.title {
            builder.caption(title, (FONT, 28));
        }
        let mut chart = builder.build_cartesian_2d(x_range, y_min..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .y_desc(self.options.y_label.clone().unwrap_or_default())
            .axis_desc_style((FONT, 16))
            .draw()?;

        for (attribute, (name, values)) in self.table.measurements.iter().enumerate() {
            let color = palette(attribute);
            let bars = values.iter().enumerate().map(|(group, value)| {
                let left = self.bar_left(group, attribute);
                Rectangle::new([(left, 0.0), (left + BAR_WIDTH, *value)], color.filled())
            });
            chart
                .draw_series(bars)?
                .label(name.clone())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });

            let label_style = (FONT, 12)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            chart.draw_series(values.iter().enumerate().map(|(group, value)| {
                let center = self.bar_left(group, attribute) + BAR_WIDTH / 2.0;
                Text::new(format!("{value}"), (center, value.max(0.0)), label_style.clone())
            }))?;
        }

        // group names under their cluster
        let group_style = (FONT, 16)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        for (group, name) in self.table.groups.iter().enumerate() {
            let (x, y) = chart
                .plotting_area()
                .map_coordinate(&(self.cluster_center(group), y_min));
            root.draw(&Text::new(name.clone(), (x, y + 8), group_style.clone()))?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, 14))
            .draw()?;

        Ok(())
    }
}
