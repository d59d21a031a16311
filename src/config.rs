//! Immutable tuning parameters for every stage of the locator.
//!
//! A [`LocatorConfig`] is validated once, when a [`crate::Locator`] is built,
//! and is read-only afterwards. Each stage receives only its own section.

use crate::error::LocatorError;
use serde::{Deserialize, Serialize};

/// Side-margin trimming applied before binarization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Fraction of the image width removed from each side
    pub margin_fraction: f32,
    /// Upper bound on the removed margin in pixels
    pub max_margin: Option<u32>,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            margin_fraction: 0.25,
            max_margin: None,
        }
    }
}

/// Grayscale → smoothing → adaptive threshold → closing → opening
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarizeConfig {
    /// Gaussian kernel side length (odd); 1 disables smoothing
    pub blur_kernel: u32,
    /// Side length of the local mean window (odd, >= 3)
    pub block_size: u32,
    /// How much darker than the local mean a pixel must be to count as ink
    pub bias: f32,
    pub close_kernel: u32,
    pub close_iterations: u32,
    pub open_kernel: u32,
    pub open_iterations: u32,
}

impl Default for BinarizeConfig {
    fn default() -> Self {
        Self {
            blur_kernel: 25,
            block_size: 41,
            bias: 5.0,
            close_kernel: 3,
            close_iterations: 2,
            open_kernel: 3,
            open_iterations: 1,
        }
    }
}

impl BinarizeConfig {
    /// Gaussian sigma for the configured kernel, using the same relation as
    /// OpenCV when sigma is left unspecified. `None` when smoothing is off.
    pub fn blur_sigma(&self) -> Option<f32> {
        if self.blur_kernel <= 1 {
            return None;
        }
        let k = self.blur_kernel as f32;
        Some(0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8)
    }
}

/// Per-candidate plausibility bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Minimum box area is `(H / d) * (W / d)`
    pub min_area_divisor: f32,
    /// Maximum box area is `(H / d) * (W / d)`
    pub max_area_divisor: f32,
    pub min_aspect: f32,
    pub max_aspect: f32,
    pub min_ink_density: f32,
    pub max_ink_density: f32,
    /// Padding around a box when measuring its surroundings
    pub margin: u32,
    pub max_margin_ink: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_area_divisor: 14.0,
            max_area_divisor: 3.0,
            min_aspect: 0.9,
            max_aspect: 8.0,
            min_ink_density: 0.3,
            max_ink_density: 0.95,
            margin: 20,
            max_margin_ink: 0.08,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Minimum ratio of summed member area to enclosing area
    pub cohesion_threshold: f32,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            cohesion_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphConfig {
    /// Padding around each selected box before cropping the mask
    pub padding: u32,
    /// Side length of the canonical square handed to the classifier
    pub size: u32,
    /// Resized mask values at or above this level become 1.0
    pub ink_level: u8,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            padding: 5,
            size: 28,
            ink_level: 255,
        }
    }
}

/// Complete locator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    pub crop: CropConfig,
    pub binarize: BinarizeConfig,
    pub filter: FilterConfig,
    pub grouping: GroupingConfig,
    pub glyph: GlyphConfig,
}

impl LocatorConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, LocatorError> {
        serde_json::from_str(json)
            .map_err(|e| LocatorError::InvalidConfig(format!("Failed to parse config: {}", e)))
    }

    /// Reject out-of-range values before any image is processed
    pub fn validate(&self) -> Result<(), LocatorError> {
        let crop = &self.crop;
        if !(0.0..0.5).contains(&crop.margin_fraction) {
            return Err(invalid(format!(
                "crop.margin_fraction must be in [0, 0.5), got {}",
                crop.margin_fraction
            )));
        }

        let bin = &self.binarize;
        if bin.blur_kernel == 0 || bin.blur_kernel % 2 == 0 {
            return Err(invalid(format!(
                "binarize.blur_kernel must be odd, got {}",
                bin.blur_kernel
            )));
        }
        if bin.block_size < 3 || bin.block_size % 2 == 0 {
            return Err(invalid(format!(
                "binarize.block_size must be odd and >= 3, got {}",
                bin.block_size
            )));
        }
        if !bin.bias.is_finite() {
            return Err(invalid("binarize.bias must be finite".to_string()));
        }
        for (name, kernel) in [
            ("close_kernel", bin.close_kernel),
            ("open_kernel", bin.open_kernel),
        ] {
            // Structuring element radius has to fit in a u8 for imageproc
            if kernel == 0 || kernel % 2 == 0 || kernel > 511 {
                return Err(invalid(format!(
                    "binarize.{} must be odd and <= 511, got {}",
                    name, kernel
                )));
            }
        }

        let f = &self.filter;
        if !(f.min_area_divisor > 0.0 && f.max_area_divisor > 0.0) {
            return Err(invalid("filter area divisors must be positive".to_string()));
        }
        if f.max_area_divisor >= f.min_area_divisor {
            return Err(invalid(format!(
                "filter.max_area_divisor ({}) must be smaller than min_area_divisor ({})",
                f.max_area_divisor, f.min_area_divisor
            )));
        }
        check_range("filter.min_aspect/max_aspect", f.min_aspect, f.max_aspect, 0.0, f32::MAX)?;
        check_range(
            "filter.min_ink_density/max_ink_density",
            f.min_ink_density,
            f.max_ink_density,
            0.0,
            1.0,
        )?;
        if !(0.0..=1.0).contains(&f.max_margin_ink) {
            return Err(invalid(format!(
                "filter.max_margin_ink must be in [0, 1], got {}",
                f.max_margin_ink
            )));
        }

        let t = self.grouping.cohesion_threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(invalid(format!(
                "grouping.cohesion_threshold must be in (0, 1], got {}",
                t
            )));
        }

        if self.glyph.size == 0 {
            return Err(invalid("glyph.size must be positive".to_string()));
        }
        if self.glyph.ink_level == 0 {
            return Err(invalid("glyph.ink_level must be positive".to_string()));
        }

        Ok(())
    }
}

fn invalid(message: String) -> LocatorError {
    LocatorError::InvalidConfig(message)
}

fn check_range(name: &str, min: f32, max: f32, lo: f32, hi: f32) -> Result<(), LocatorError> {
    if !(min.is_finite() && max.is_finite()) {
        return Err(invalid(format!("{} must be finite", name)));
    }
    if min < lo || max > hi {
        return Err(invalid(format!(
            "{} must lie within [{}, {}], got ({}, {})",
            name, lo, hi, min, max
        )));
    }
    if min >= max {
        return Err(invalid(format!(
            "{} lower bound {} is not below upper bound {}",
            name, min, max
        )));
    }
    Ok(())
}
