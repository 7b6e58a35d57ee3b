//! Countdown glyph rendering
//!
//! The glyph is a fixed composition drawn into an RGBA buffer:
//! a translucent background disc, a wedge growing clockwise from 12 o'clock
//! that covers the elapsed part of the slot, a crisp outline ring and an
//! optional badge in the middle. The result is handed out as PNG bytes;
//! writing them anywhere is the asset store's job.

use crate::constants::{
    GLYPH_BACKGROUND_RGBA, GLYPH_BADGE_SCALE, GLYPH_OUTLINE_RGBA, GLYPH_OUTLINE_WIDTH_PX,
    GLYPH_WEDGE_RGBA,
};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use log::debug;
use std::f32::consts::TAU;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlyphError {
    #[error("glyph size must be at least 8 pixels (got {0})")]
    InvalidSize(u32),
    #[error("failed to encode glyph as PNG: {0}")]
    Encode(#[from] image::ImageError),
}

pub struct GlyphRenderer {
    size: u32,
    badge: Option<RgbaImage>,
}

impl GlyphRenderer {
    pub fn new(size: u32) -> Self {
        Self { size, badge: None }
    }

    /// Overlay the image at `path` in the middle of every glyph.
    /// A missing or unreadable badge is skipped.
    pub fn with_badge(mut self, path: &Path) -> Self {
        match image::open(path) {
            Ok(img) => {
                let edge = ((self.size as f32 * GLYPH_BADGE_SCALE) as u32).max(1);
                self.badge = Some(imageops::resize(&img.to_rgba8(), edge, edge, FilterType::Triangle));
            }
            Err(e) => debug!("Badge {} not used: {}", path.display(), e),
        }
        self
    }

    pub fn has_badge(&self) -> bool {
        self.badge.is_some()
    }

    /// Draw the glyph for `progress` (elapsed fraction of the slot)
    pub fn draw(&self, progress: f32, show_progress: bool) -> Result<RgbaImage, GlyphError> {
        if self.size < 8 {
            return Err(GlyphError::InvalidSize(self.size));
        }

        let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        let sweep = progress * TAU;

        let center = (self.size as f32 - 1.0) / 2.0;
        let radius = self.size as f32 / 2.0 - 1.0;
        let half_outline = GLYPH_OUTLINE_WIDTH_PX / 2.0;
        let outline_radius = radius - half_outline;

        let mut img = RgbaImage::new(self.size, self.size);

        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > radius + 0.5 {
                continue;
            }

            // Soft edge on the outer rim only
            let coverage = (radius + 0.5 - dist).clamp(0.0, 1.0);

            let mut color = GLYPH_BACKGROUND_RGBA;

            if show_progress && sweep > 0.0 {
                // 0 at 12 o'clock, growing clockwise (y points down)
                let mut angle = dx.atan2(-dy);
                if angle < 0.0 {
                    angle += TAU;
                }
                if angle <= sweep {
                    color = GLYPH_WEDGE_RGBA;
                }
            }

            if (dist - outline_radius).abs() <= half_outline {
                color = GLYPH_OUTLINE_RGBA;
            }

            let alpha = (color[3] as f32 * coverage).round() as u8;
            *pixel = Rgba([color[0], color[1], color[2], alpha]);
        }

        if let Some(badge) = &self.badge {
            let x = (self.size as i64 - badge.width() as i64) / 2;
            let y = (self.size as i64 - badge.height() as i64) / 2;
            imageops::overlay(&mut img, badge, x, y);
        }

        Ok(img)
    }

    /// Draw the glyph and encode it as PNG
    pub fn render(&self, progress: f32, show_progress: bool) -> Result<Vec<u8>, GlyphError> {
        let img = self.draw(progress, show_progress)?;
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SIZE: u32 = 64;

    // Points halfway between the center and the rim
    fn right_of_center(img: &RgbaImage) -> [u8; 4] {
        img.get_pixel(SIZE / 2 + SIZE / 4, SIZE / 2).0
    }

    fn left_of_center(img: &RgbaImage) -> [u8; 4] {
        img.get_pixel(SIZE / 2 - SIZE / 4, SIZE / 2).0
    }

    fn above_center(img: &RgbaImage) -> [u8; 4] {
        img.get_pixel(SIZE / 2 + 1, SIZE / 4).0
    }

    #[test]
    fn test_zero_progress_has_no_wedge() {
        let img = GlyphRenderer::new(SIZE).draw(0.0, true).unwrap();
        assert_eq!(right_of_center(&img), GLYPH_BACKGROUND_RGBA);
        assert_eq!(left_of_center(&img), GLYPH_BACKGROUND_RGBA);
        assert_eq!(above_center(&img), GLYPH_BACKGROUND_RGBA);
    }

    #[test]
    fn test_half_progress_fills_right_half() {
        let img = GlyphRenderer::new(SIZE).draw(0.5, true).unwrap();
        assert_eq!(right_of_center(&img), GLYPH_WEDGE_RGBA);
        assert_eq!(left_of_center(&img), GLYPH_BACKGROUND_RGBA);
    }

    #[test]
    fn test_full_progress_fills_everything() {
        let img = GlyphRenderer::new(SIZE).draw(1.0, true).unwrap();
        assert_eq!(right_of_center(&img), GLYPH_WEDGE_RGBA);
        assert_eq!(left_of_center(&img), GLYPH_WEDGE_RGBA);
        assert_eq!(above_center(&img), GLYPH_WEDGE_RGBA);
    }

    #[test]
    fn test_hidden_progress_draws_no_wedge() {
        let img = GlyphRenderer::new(SIZE).draw(0.9, false).unwrap();
        assert_eq!(right_of_center(&img), GLYPH_BACKGROUND_RGBA);
        assert_eq!(left_of_center(&img), GLYPH_BACKGROUND_RGBA);
    }

    #[test]
    fn test_outline_and_transparent_corners() {
        let img = GlyphRenderer::new(SIZE).draw(0.25, true).unwrap();
        assert_eq!(img.get_pixel(0, 0).0[3], 0, "Corners must stay transparent");

        // Topmost column of the ring lies on the outline
        let outline_row = (1.0 + GLYPH_OUTLINE_WIDTH_PX / 2.0).round() as u32;
        let px = img.get_pixel(SIZE / 2, outline_row).0;
        assert_eq!(&px[..3], &GLYPH_OUTLINE_RGBA[..3]);
    }

    #[test]
    fn test_progress_is_clamped() {
        let renderer = GlyphRenderer::new(SIZE);
        assert_eq!(
            renderer.draw(-3.0, true).unwrap(),
            renderer.draw(0.0, true).unwrap()
        );
        assert_eq!(
            renderer.draw(7.0, true).unwrap(),
            renderer.draw(1.0, true).unwrap()
        );
        assert_eq!(
            renderer.draw(f32::NAN, true).unwrap(),
            renderer.draw(0.0, true).unwrap()
        );
    }

    #[test]
    fn test_render_produces_png() {
        let png = GlyphRenderer::new(SIZE).render(0.3, true).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (SIZE, SIZE));
    }

    #[test]
    fn test_tiny_size_is_a_render_error() {
        let result = GlyphRenderer::new(4).render(0.5, true);
        assert!(matches!(result, Err(GlyphError::InvalidSize(4))));
    }

    #[test]
    fn test_missing_badge_is_skipped() {
        let renderer = GlyphRenderer::new(SIZE).with_badge(Path::new("/nonexistent/badge.png"));
        assert!(!renderer.has_badge());
        assert!(renderer.render(0.5, true).is_ok());
    }

    #[test]
    fn test_unreadable_badge_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("badge.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let renderer = GlyphRenderer::new(SIZE).with_badge(&path);
        assert!(!renderer.has_badge());
    }

    #[test]
    fn test_badge_is_centered() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("badge.png");
        RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let renderer = GlyphRenderer::new(SIZE).with_badge(&path);
        assert!(renderer.has_badge());

        let img = renderer.draw(0.0, true).unwrap();
        assert_eq!(img.get_pixel(SIZE / 2, SIZE / 2).0, [255, 0, 0, 255]);
        // Badge covers the middle half only
        assert_eq!(right_of_center(&img), GLYPH_BACKGROUND_RGBA);
    }
}
