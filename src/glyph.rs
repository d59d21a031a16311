//! Cutting selected boxes out of the ink mask and normalizing them into the
//! canonical square the classifier was trained on.

use crate::config::GlyphConfig;
use crate::geometry::BoundingBox;
use image::{imageops, GrayImage, Luma};
use serde::Serialize;

/// Where the resized crop sits inside the canonical square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlyphLayout {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Canonical `size × size` glyph, row-major, 1.0 = ink, 0.0 = background
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphImage {
    size: u32,
    pixels: Vec<f32>,
    layout: GlyphLayout,
}

impl GlyphImage {
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    pub fn layout(&self) -> GlyphLayout {
        self.layout
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.pixels[(y * self.size + x) as usize]
    }

    /// Number of ink pixels
    pub fn ink(&self) -> usize {
        self.pixels.iter().filter(|&&v| v > 0.5).count()
    }

    /// 8-bit rendering (ink = 255) for inspection or saving to disk
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.size, self.size, |x, y| {
            Luma([if self.get(x, y) > 0.5 { 255 } else { 0 }])
        })
    }
}

/// Dimensions after scaling `width × height` so that the longer side is `size`
pub fn fitted_dimensions(width: u32, height: u32, size: u32) -> (u32, u32) {
    let (w, h, s) = (width.max(1) as u64, height.max(1) as u64, size as u64);
    if w < h {
        let new_width = (w * s / h).clamp(1, s) as u32;
        (new_width, size)
    } else {
        let new_height = (h * s / w).clamp(1, s) as u32;
        (size, new_height)
    }
}

/// Bilinear resize sampling the four nearest source pixels
///
/// Unlike `imageops::resize`, the filter support does not widen when
/// downscaling, so strokes thinner than the scale factor keep full intensity.
pub fn resize_bilinear(src: &GrayImage, width: u32, height: u32) -> GrayImage {
    let (src_width, src_height) = src.dimensions();
    if src_width == 0 || src_height == 0 {
        return GrayImage::new(width, height);
    }
    let scale_x = src_width as f32 / width as f32;
    let scale_y = src_height as f32 / height as f32;

    GrayImage::from_fn(width, height, |x, y| {
        let (x0, x1, fx) = source_axis(x, scale_x, src_width);
        let (y0, y1, fy) = source_axis(y, scale_y, src_height);
        let at = |sx: u32, sy: u32| src.get_pixel(sx, sy).0[0] as f32;

        let top = at(x0, y0) * (1.0 - fx) + at(x1, y0) * fx;
        let bottom = at(x0, y1) * (1.0 - fx) + at(x1, y1) * fx;
        let value = top * (1.0 - fy) + bottom * fy;
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

/// Source neighbours and weight for destination index `dst` (pixel-center aligned)
fn source_axis(dst: u32, scale: f32, len: u32) -> (u32, u32, f32) {
    let pos = ((dst as f32 + 0.5) * scale - 0.5).max(0.0);
    let last = len - 1;
    let i0 = (pos.floor() as u32).min(last);
    if i0 == last {
        return (last, last, 0.0);
    }
    (i0, i0 + 1, pos - i0 as f32)
}

/// Resize preserving aspect ratio and pad with background to a square
///
/// Odd padding puts the extra pixel on the right/bottom side.
pub fn fit_to_square(crop: &GrayImage, size: u32) -> (GrayImage, GlyphLayout) {
    let (width, height) = fitted_dimensions(crop.width(), crop.height(), size);
    let resized = resize_bilinear(crop, width, height);

    let left = (size - width) / 2;
    let top = (size - height) / 2;

    let mut square = GrayImage::new(size, size);
    imageops::replace(&mut square, &resized, left as i64, top as i64);

    (
        square,
        GlyphLayout {
            left,
            top,
            width,
            height,
        },
    )
}

/// Pad, crop, resize and binarize one selected box
pub fn extract_glyph(mask: &GrayImage, bbox: &BoundingBox, config: &GlyphConfig) -> GlyphImage {
    let region = bbox.padded(config.padding, mask.width(), mask.height());
    let crop = imageops::crop_imm(mask, region.x, region.y, region.width, region.height).to_image();
    let (square, layout) = fit_to_square(&crop, config.size);

    let pixels = square
        .pixels()
        .map(|p| if p.0[0] >= config.ink_level { 1.0 } else { 0.0 })
        .collect();

    GlyphImage {
        size: config.size,
        pixels,
        layout,
    }
}

/// Extract every box in order
pub fn extract_glyphs(mask: &GrayImage, boxes: &[BoundingBox], config: &GlyphConfig) -> Vec<GlyphImage> {
    boxes
        .iter()
        .map(|bbox| extract_glyph(mask, bbox, config))
        .collect()
}
