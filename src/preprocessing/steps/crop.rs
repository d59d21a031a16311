use crate::config::CropConfig;
use crate::error::LocatorError;
use image::{imageops, RgbImage};

/// Result of trimming the side margins
#[derive(Debug, Clone)]
pub struct Cropped {
    pub image: RgbImage,
    /// Pixels removed from the left edge
    pub offset: u32,
}

/// Margin in pixels removed from each side of a `width`-pixel image
pub fn margin_for(width: u32, config: &CropConfig) -> u32 {
    let margin = (width as f32 * config.margin_fraction).floor() as u32;
    match config.max_margin {
        Some(cap) => margin.min(cap),
        None => margin,
    }
}

/// Remove the left and right margins, keeping the full height
pub fn apply(image: &RgbImage, config: &CropConfig) -> Result<Cropped, LocatorError> {
    let (width, height) = image.dimensions();
    if height == 0 {
        return Err(LocatorError::InvalidGeometry(format!(
            "image is {}x{}, height must be positive",
            width, height
        )));
    }

    let margin = margin_for(width, config);
    let remaining = width.saturating_sub(margin.saturating_mul(2));
    if remaining == 0 {
        return Err(LocatorError::InvalidGeometry(format!(
            "image width {} does not survive removing a {}px margin on each side",
            width, margin
        )));
    }

    if margin == 0 {
        return Ok(Cropped {
            image: image.clone(),
            offset: 0,
        });
    }

    let cropped = imageops::crop_imm(image, margin, 0, remaining, height).to_image();
    Ok(Cropped {
        image: cropped,
        offset: margin,
    })
}
