use crate::config::BinarizeConfig;
use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};

/// Radius of a square structuring element with odd side `kernel`
fn radius(kernel: u32) -> u8 {
    ((kernel.max(1) - 1) / 2).min(u8::MAX as u32) as u8
}

/// Closing: bridge small gaps inside a stroke
/// Dilates `iterations` times, then erodes the same number of times
pub fn close(image: GrayImage, kernel: u32, iterations: u32) -> GrayImage {
    let k = radius(kernel);
    if k == 0 || iterations == 0 {
        return image;
    }
    let mut out = image;
    for _ in 0..iterations {
        out = dilate(&out, Norm::LInf, k);
    }
    for _ in 0..iterations {
        out = erode(&out, Norm::LInf, k);
    }
    out
}

/// Opening: strip specks smaller than the structuring element
pub fn open(image: GrayImage, kernel: u32, iterations: u32) -> GrayImage {
    let k = radius(kernel);
    if k == 0 || iterations == 0 {
        return image;
    }
    let mut out = image;
    for _ in 0..iterations {
        out = erode(&out, Norm::LInf, k);
    }
    for _ in 0..iterations {
        out = dilate(&out, Norm::LInf, k);
    }
    out
}

pub fn apply_close(image: GrayImage, config: &BinarizeConfig) -> GrayImage {
    close(image, config.close_kernel, config.close_iterations)
}

pub fn apply_open(image: GrayImage, config: &BinarizeConfig) -> GrayImage {
    open(image, config.open_kernel, config.open_iterations)
}
