use image::{imageops, GrayImage, RgbImage};

/// Convert the color frame to a single luma channel
/// This is the foundation for every later binarization step
pub fn apply(image: &RgbImage) -> GrayImage {
    imageops::grayscale(image)
}
