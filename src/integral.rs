//! Summed-area table over a grayscale image.

use crate::geometry::BoundingBox;
use image::GrayImage;

/// Summed-area table with a zero row and column in front, so that the sum of
/// any rectangle is four lookups.
#[derive(Debug, Clone)]
pub struct IntegralImage {
    width: u32,
    height: u32,
    stride: usize,
    sums: Vec<u64>,
}

impl IntegralImage {
    /// Integral of raw pixel values
    pub fn of_values(img: &GrayImage) -> Self {
        Self::build(img, |v| v as u64)
    }

    /// Integral of a 0/1 indicator: 1 wherever the pixel is non-zero
    pub fn of_foreground(img: &GrayImage) -> Self {
        Self::build(img, |v| u64::from(v != 0))
    }

    fn build<F>(img: &GrayImage, value: F) -> Self
    where
        F: Fn(u8) -> u64,
    {
        let (width, height) = img.dimensions();
        let stride = width as usize + 1;
        let mut sums = vec![0u64; stride * (height as usize + 1)];

        for y in 0..height as usize {
            let mut row_sum = 0u64;
            for x in 0..width as usize {
                row_sum += value(img.get_pixel(x as u32, y as u32).0[0]);
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row_sum;
            }
        }

        Self {
            width,
            height,
            stride,
            sums,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sum over the half-open rectangle `[x0, x1) × [y0, y1)`; bounds are clipped
    pub fn sum(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> u64 {
        let x1 = x1.min(self.width) as usize;
        let y1 = y1.min(self.height) as usize;
        let x0 = (x0 as usize).min(x1);
        let y0 = (y0 as usize).min(y1);
        let s = &self.sums;
        let st = self.stride;
        s[y1 * st + x1] + s[y0 * st + x0] - s[y0 * st + x1] - s[y1 * st + x0]
    }

    pub fn sum_box(&self, b: &BoundingBox) -> u64 {
        self.sum(b.x, b.y, b.right(), b.bottom())
    }
}
