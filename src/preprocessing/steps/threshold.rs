use crate::config::BinarizeConfig;
use crate::integral::IntegralImage;
use image::{GrayImage, Luma};

/// Apply inverted local-mean adaptive thresholding
/// Robust to lighting gradients where a single global threshold fails
pub fn apply(image: &GrayImage, config: &BinarizeConfig) -> GrayImage {
    mean_threshold_inv(image, config.block_size, config.bias)
}

/// Local mean adaptive thresholding with inverted polarity
///
/// A pixel becomes ink (255) when it is darker than the mean of its
/// `block_size × block_size` neighborhood by more than `bias`; everything else
/// becomes background (0). The window is clipped at the image border.
fn mean_threshold_inv(img: &GrayImage, block_size: u32, bias: f32) -> GrayImage {
    let (width, height) = img.dimensions();
    let half_window = block_size / 2;

    // Precompute integral image for efficient window sums
    let integral = IntegralImage::of_values(img);

    GrayImage::from_fn(width, height, |x, y| {
        let x1 = x.saturating_sub(half_window);
        let y1 = y.saturating_sub(half_window);
        let x2 = (x + half_window + 1).min(width);
        let y2 = (y + half_window + 1).min(height);

        let area = ((x2 - x1) * (y2 - y1)) as f64;
        let mean = integral.sum(x1, y1, x2, y2) as f64 / area;

        let pixel = img.get_pixel(x, y).0[0] as f64;
        if pixel < mean - bias as f64 {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_binarizes_image() {
        // Create a simple gradient image
        let img = GrayImage::from_fn(50, 50, |x, _| Luma([(x as u8 * 5).min(255)]));

        let result = apply(&img, &BinarizeConfig::default());

        // Result should only contain 0 or 255
        for pixel in result.pixels() {
            assert!(
                pixel.0[0] == 0 || pixel.0[0] == 255,
                "Expected binary pixel, got {}",
                pixel.0[0]
            );
        }
    }

    #[test]
    fn test_threshold_inverts_dark_text() {
        // Dark text on light background
        let mut img = GrayImage::from_pixel(50, 20, Luma([240]));
        for x in 10..40 {
            img.put_pixel(x, 10, Luma([20]));
        }

        let result = apply(&img, &BinarizeConfig::default());

        // Ink becomes foreground, paper becomes background
        assert_eq!(result.get_pixel(25, 10).0[0], 255);
        assert_eq!(result.get_pixel(25, 5).0[0], 0);
    }

    #[test]
    fn test_threshold_ignores_lighting_gradient() {
        // Smooth left-to-right illumination falloff with one dark stroke in
        // the dim half; no global threshold separates stroke from paper here
        let mut img = GrayImage::from_fn(120, 40, |x, _| Luma([(230 - x) as u8]));
        for y in 10..30 {
            for x in 90..94 {
                let base = img.get_pixel(x, y).0[0];
                img.put_pixel(x, y, Luma([base - 60]));
            }
        }

        let result = apply(&img, &BinarizeConfig::default());

        assert_eq!(result.get_pixel(92, 20).0[0], 255);
        // Bright and dim paper both stay background
        assert_eq!(result.get_pixel(10, 20).0[0], 0);
        assert_eq!(result.get_pixel(60, 20).0[0], 0);
    }

    #[test]
    fn test_uniform_image_has_no_foreground() {
        for value in [0u8, 128, 255] {
            let img = GrayImage::from_pixel(30, 30, Luma([value]));
            let result = apply(&img, &BinarizeConfig::default());
            assert!(result.pixels().all(|p| p.0[0] == 0));
        }
    }
}
