use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use log::{debug, warn};

use super::layout::{
    DisplayList, Primitive, Rect, Rgb, GLYPH_CELL, PLACEHOLDER, SHADOW, SHADOW_WIDTH, WHITE,
};
use crate::error::ExportError;
use crate::model::ImageSource;

/// Turns a laid-out document into a single tall bitmap
pub trait Rasterizer: Send + Sync {
    /// Draw `list` at `scale` device pixels per logical pixel
    fn rasterize(&self, list: &DisplayList, scale: u32) -> Result<RgbaImage, ExportError>;
}

/// Software rasterizer drawing fills, bitmap-font text and the hero image.
///
/// Remote images are not fetched; they are drawn as a grey placeholder.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitmapRasterizer;

impl Rasterizer for BitmapRasterizer {
    fn rasterize(&self, list: &DisplayList, scale: u32) -> Result<RgbaImage, ExportError> {
        let scale = scale.max(1);
        let width = list
            .width
            .checked_mul(scale)
            .ok_or_else(|| ExportError::Raster("raster width overflows".to_string()))?;
        let height = list
            .height
            .checked_mul(scale)
            .ok_or_else(|| ExportError::Raster("raster height overflows".to_string()))?;
        if width == 0 || height == 0 {
            return Err(ExportError::EmptyRender);
        }

        let mut canvas = RgbaImage::from_pixel(width, height, rgba(WHITE));
        for item in &list.items {
            match item {
                Primitive::Fill { rect, color } => fill(&mut canvas, scaled(rect, scale), *color),
                Primitive::Text {
                    x,
                    y,
                    scale: glyph_scale,
                    color,
                    text,
                } => draw_text(&mut canvas, *x * scale, *y * scale, glyph_scale * scale, *color, text),
                Primitive::Image {
                    rect,
                    source,
                    bytes,
                } => draw_image(&mut canvas, scaled(rect, scale), source, bytes.as_deref()),
                Primitive::Shadow { rect } => draw_shadow(&mut canvas, scaled(rect, scale), scale),
            }
        }

        debug!("Rasterized {} primitives → {}x{} px", list.items.len(), width, height);
        Ok(canvas)
    }
}

fn rgba(color: Rgb) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}

fn scaled(rect: &Rect, scale: u32) -> Rect {
    Rect {
        x: rect.x * scale,
        y: rect.y * scale,
        width: rect.width * scale,
        height: rect.height * scale,
    }
}

fn fill(canvas: &mut RgbaImage, rect: Rect, color: Rgb) {
    let pixel = rgba(color);
    let x_end = (rect.x + rect.width).min(canvas.width());
    let y_end = (rect.y + rect.height).min(canvas.height());
    for y in rect.y..y_end {
        for x in rect.x..x_end {
            canvas.put_pixel(x, y, pixel);
        }
    }
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_text(canvas: &mut RgbaImage, x: u32, y: u32, px: u32, color: Rgb, text: &str) {
    let cell = GLYPH_CELL * px;
    for (i, c) in text.chars().enumerate() {
        let origin_x = x + i as u32 * cell;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..8u32 {
                // bit 0 is the leftmost pixel
                if bits & (1 << col) != 0 {
                    let dot = Rect {
                        x: origin_x + col * px,
                        y: y + row as u32 * px,
                        width: px,
                        height: px,
                    };
                    fill(canvas, dot, color);
                }
            }
        }
    }
}

fn draw_image(canvas: &mut RgbaImage, rect: Rect, source: &ImageSource, bytes: Option<&[u8]>) {
    let Some(bytes) = bytes else {
        if let ImageSource::Transient(handle) = source {
            warn!("Image {} was released before export; drawing placeholder", handle.url());
        }
        fill(canvas, rect, PLACEHOLDER);
        return;
    };

    let photo = match image::load_from_memory(bytes) {
        Ok(photo) => photo,
        Err(e) => {
            warn!("Could not decode {}: {}; drawing placeholder", source, e);
            fill(canvas, rect, PLACEHOLDER);
            return;
        }
    };

    // Cover the hero area, cropping whatever overflows
    let photo = photo
        .resize_to_fill(rect.width, rect.height, FilterType::Triangle)
        .to_rgba8();
    imageops::overlay(canvas, &photo, rect.x as i64, rect.y as i64);
}

fn draw_shadow(canvas: &mut RgbaImage, rect: Rect, scale: u32) {
    let t = SHADOW_WIDTH * scale;
    let edges = [
        Rect { height: t, ..rect },
        Rect {
            y: (rect.y + rect.height).saturating_sub(t),
            height: t,
            ..rect
        },
        Rect { width: t, ..rect },
        Rect {
            x: (rect.x + rect.width).saturating_sub(t),
            width: t,
            ..rect
        },
    ];
    for edge in edges {
        fill(canvas, edge, SHADOW);
    }
}
