use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::Figure;
use crate::input::RgbaImage;

/// An RGB(A) image scaled into the figure, square pixels, no axes.
pub struct ImagePreview {
    pub image: RgbaImage,
}

impl ImagePreview {
    /// Pixel edge length and top-left offset that center the image in an
    /// area of `dim` pixels.
    fn layout(&self, dim: (u32, u32)) -> (f64, (f64, f64)) {
        let (width, height) = (self.image.width as f64, self.image.height as f64);
        let scale = (dim.0 as f64 / width).min(dim.1 as f64 / height);
        let offset = (
            (dim.0 as f64 - width * scale) / 2.0,
            (dim.1 as f64 - height * scale) / 2.0,
        );
        (scale, offset)
    }
}

impl Figure for ImagePreview {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        if self.image.width == 0 || self.image.height == 0 {
            log::info!("empty image, nothing to draw");
            return Ok(());
        }

        let (scale, (left, top)) = self.layout(root.dim_in_pixel());
        let corner = |row: usize, column: usize| {
            (
                (left + column as f64 * scale).round() as i32,
                (top + row as f64 * scale).round() as i32,
            )
        };

        for row in 0..self.image.height {
            for column in 0..self.image.width {
                let [r, g, b, a] = self.image.pixel(row, column);
                let color = RGBAColor(r, g, b, a as f64 / 255.0);
                root.draw(&Rectangle::new(
                    [corner(row, column), corner(row + 1, column + 1)],
                    color.filled(),
                ))?;
            }
        }

        Ok(())
    }
}
