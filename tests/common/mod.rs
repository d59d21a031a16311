#![allow(dead_code)]

use image::{Rgb, RgbImage};

pub const PAPER: Rgb<u8> = Rgb([245, 245, 245]);
pub const INK: Rgb<u8> = Rgb([20, 20, 20]);

/// Top edges of the three stacked glyphs used by the column scenarios
pub const COLUMN_YS: [u32; 3] = [8, 104, 200];

pub fn blank(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, PAPER)
}

pub fn fill(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            img.put_pixel(x, y, color);
        }
    }
}

/// Hand-drawn "0": a 40x70 outline with 10px strokes
pub fn draw_zero(img: &mut RgbImage, x: u32, y: u32) {
    let background = *img.get_pixel(x + 20, y + 35);
    fill(img, x, y, 40, 70, INK);
    fill(img, x + 10, y + 10, 20, 50, background);
}

/// 280x280 paper with three "0" glyphs stacked at x = 40
pub fn glyph_column() -> RgbImage {
    let mut img = blank(280, 280);
    for y in COLUMN_YS {
        draw_zero(&mut img, 40, y);
    }
    img
}

/// 280x280 paper with three solid 40x70 ink blocks stacked at x = 40
pub fn block_column() -> RgbImage {
    let mut img = blank(280, 280);
    for y in COLUMN_YS {
        fill(&mut img, 40, y, 40, 70, INK);
    }
    img
}
