//! In-memory raster canvas and PNG encoding.

use std::error::Error;
use std::path::Path;

use image::{imageops, Rgb, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use qoe_core::error::{QoeError, Result};

/// Pixels per inch of every written image.
pub const DPI: u32 = 300;

/// Drawing area backed by the in-memory RGB buffer.
pub type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Outcome of a drawing routine; any backend error is boxed.
pub type ChartResult = std::result::Result<(), Box<dyn Error>>;

/// Figure size in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Figure {
    pub width_in: f64,
    pub height_in: f64,
}

impl Figure {
    pub const fn new(width_in: f64, height_in: f64) -> Self {
        Self {
            width_in,
            height_in,
        }
    }

    /// Raster size at [`DPI`].
    pub fn pixels(&self) -> (u32, u32) {
        let px = |inches: f64| (inches * f64::from(DPI)).round() as u32;
        (px(self.width_in), px(self.height_in))
    }
}

/// Padding kept around the drawn content when trimming, 0.1 in at [`DPI`].
pub const TIGHT_PAD: u32 = DPI / 10;

/// Draw into a fresh `figure`-sized canvas filled with `background`, trim it
/// to the drawn content and write it to `path` as PNG, replacing any
/// existing file.
pub fn render_png<F>(path: &Path, figure: Figure, background: &RGBColor, draw: F) -> Result<()>
where
    F: FnOnce(&Area<'_>) -> ChartResult,
{
    let chart_err = |message: String| QoeError::Chart {
        path: path.to_path_buf(),
        message,
    };

    let image = rasterize(figure, background, draw).map_err(|e| chart_err(e.to_string()))?;
    crop_to_content(image, background)
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| chart_err(e.to_string()))
}

/// Run `draw` on a `figure`-sized in-memory canvas and return the raster.
pub fn rasterize<F>(
    figure: Figure,
    background: &RGBColor,
    draw: F,
) -> std::result::Result<RgbImage, Box<dyn Error>>
where
    F: FnOnce(&Area<'_>) -> ChartResult,
{
    let (width, height) = figure.pixels();
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(background)?;
        draw(&root)?;
        root.present()?;
    }
    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| "raster buffer does not match figure size".into())
}

/// Trim `image` to the box around every pixel that differs from
/// `background`, keeping [`TIGHT_PAD`] pixels of margin where the canvas
/// allows. A blank image is returned unchanged.
pub fn crop_to_content(image: RgbImage, background: &RGBColor) -> RgbImage {
    let bg = Rgb([background.0, background.1, background.2]);
    let (width, height) = image.dimensions();

    let bbox = image
        .enumerate_pixels()
        .filter(|(_, _, pixel)| **pixel != bg)
        .fold(None, |bbox, (x, y, _)| match bbox {
            None => Some((x, y, x, y)),
            Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
        });
    let Some((x0, y0, x1, y1)) = bbox else {
        return image;
    };

    let left = x0.saturating_sub(TIGHT_PAD);
    let top = y0.saturating_sub(TIGHT_PAD);
    let right = (x1 + 1 + TIGHT_PAD).min(width);
    let bottom = (y1 + 1 + TIGHT_PAD).min(height);
    imageops::crop_imm(&image, left, top, right - left, bottom - top).to_image()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_figure_pixels() {
        assert_eq!(Figure::new(10.0, 6.0).pixels(), (3000, 1800));
        assert_eq!(Figure::new(12.0, 10.0).pixels(), (3600, 3000));
    }

    #[test]
    fn test_render_png_writes_decodable_image() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.png");
        render_png(&path, Figure::new(1.0, 0.5), &WHITE, |area| {
            area.draw(&Rectangle::new([(10, 10), (60, 60)], RED.filled()))?;
            Ok(())
        })
        .unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert!(img.width() < 300 && img.height() < 150);
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(30, 30).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(img.width() - 1, img.height() - 1).0, [255, 255, 255]);
    }

    // ── crop_to_content ───────────────────────────────────────────────────────

    fn canvas_with_block(w: u32, h: u32, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            if xs.contains(&x) && ys.contains(&y) {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        })
    }

    #[test]
    fn test_crop_keeps_padding_around_content() {
        let img = canvas_with_block(200, 200, 100..110, 80..90);
        let cropped = crop_to_content(img, &WHITE);

        assert_eq!(cropped.dimensions(), (10 + 2 * TIGHT_PAD, 10 + 2 * TIGHT_PAD));
        assert_eq!(cropped.get_pixel(TIGHT_PAD, TIGHT_PAD).0, [0, 0, 0]);
        assert_eq!(cropped.get_pixel(TIGHT_PAD - 1, TIGHT_PAD).0, [255, 255, 255]);
    }

    #[test]
    fn test_crop_clamps_padding_at_canvas_edges() {
        let img = canvas_with_block(100, 100, 0..5, 95..100);
        let cropped = crop_to_content(img, &WHITE);
        assert_eq!(cropped.dimensions(), (5 + TIGHT_PAD, 5 + TIGHT_PAD));
    }

    #[test]
    fn test_crop_leaves_blank_canvas_alone() {
        let img = canvas_with_block(120, 80, 0..0, 0..0);
        assert_eq!(crop_to_content(img, &WHITE).dimensions(), (120, 80));
    }

    #[test]
    fn test_render_png_propagates_draw_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fail.png");
        let err = render_png(&path, Figure::new(0.5, 0.5), &WHITE, |_| {
            Err("backend exploded".into())
        })
        .unwrap_err();

        assert!(matches!(err, QoeError::Chart { .. }));
        assert!(err.to_string().contains("backend exploded"));
        assert!(!path.exists());
    }
}
