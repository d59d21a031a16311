use crate::config::BinarizeConfig;
use image::GrayImage;
use imageproc::filter::gaussian_blur_f32;

/// Gaussian smoothing to suppress paper texture before thresholding
/// A kernel of 1 leaves the image untouched
pub fn apply(image: GrayImage, config: &BinarizeConfig) -> GrayImage {
    match config.blur_sigma() {
        Some(sigma) if sigma > 0.0 => gaussian_blur_f32(&image, sigma),
        _ => image,
    }
}
