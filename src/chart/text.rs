// src/chart/text.rs
//
// Label text for the PNG charts. A system font goes through ab_glyph and
// imageproc; without one the bitmap glyphs draw what they cover.

use std::sync::OnceLock;

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};

use super::glyphs;
use crate::core::fonts;

static FONT: OnceLock<Option<FontVec>> = OnceLock::new();

fn load() -> Option<FontVec> {
    let Some(file) = fonts::find_any() else {
        logw!("Chart: no system font found, labels use the built-in glyphs");
        return None;
    };
    match FontVec::try_from_vec_and_index(file.bytes, 0) {
        Ok(font) => {
            if file.cjk {
                logf!("Chart: label font {}", file.path.display());
            } else {
                logw!("Chart: label font {} has no CJK glyphs", file.path.display());
            }
            Some(font)
        }
        Err(e) => {
            logw!("Chart: unusable font {}: {e}", file.path.display());
            None
        }
    }
}

/// Looked up once per process.
pub fn system_font() -> Option<&'static FontVec> {
    FONT.get_or_init(load).as_ref()
}

/// Draws label text at a nominal pixel height.
#[derive(Clone, Copy)]
pub enum Pen<'f> {
    Font(&'f FontVec),
    Bitmap,
}

impl Pen<'static> {
    pub fn system() -> Self {
        system_font().map_or(Pen::Bitmap, Pen::Font)
    }
}

impl Pen<'_> {
    /// (width, height) in pixels.
    pub fn size(self, text: &str, px: f32) -> (u32, u32) {
        match self {
            Pen::Font(font) => text_size(PxScale::from(px), font, text),
            Pen::Bitmap => {
                let scale = bitmap_scale(px);
                (glyphs::text_width(text, scale), glyphs::text_height(scale))
            }
        }
    }

    /// Top-left corner at (x, y).
    pub fn draw(self, img: &mut RgbImage, x: i64, y: i64, text: &str, color: Rgb<u8>, px: f32) {
        match self {
            Pen::Font(font) => draw_text_mut(img, color, x as i32, y as i32, PxScale::from(px), font, text),
            Pen::Bitmap => glyphs::draw_text(img, x, y, text, color, bitmap_scale(px)),
        }
    }

    /// Largest size up to `px` at which `text` is at most `max_width` wide.
    pub fn fit(self, text: &str, px: f32, max_width: u32) -> f32 {
        let mut px = px;
        while px > 8.0 && self.size(text, px).0 > max_width {
            px -= 1.0;
        }
        px
    }
}

fn bitmap_scale(px: f32) -> u32 {
    ((px / 7.0).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_fit_shrinks_long_text() {
        let long = "X".repeat(200);
        let px = Pen::Bitmap.fit(&long, 24.0, 400);
        assert!(px < 24.0);
        assert_eq!(Pen::Bitmap.fit("2020", 24.0, 400), 24.0);
    }

    #[test]
    fn bitmap_draws_latin_labels() {
        let mut img = RgbImage::from_pixel(80, 20, Rgb([255, 255, 255]));
        Pen::Bitmap.draw(&mut img, 2, 2, "Year", Rgb([0, 0, 0]), 14.0);
        assert!(img.pixels().any(|p| p.0 == [0, 0, 0]));
    }
}
