use crate::config::{BinarizeConfig, CropConfig};
use crate::error::LocatorError;
use image::{GrayImage, RgbImage};
use serde::Serialize;
use std::time::Instant;

use super::steps;

/// Timing information for a single stage
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Binary ink mask plus the bookkeeping needed to map it back
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessingResult {
    /// 255 = ink, 0 = background (not serialized)
    #[serde(skip)]
    pub mask: GrayImage,
    /// Pixels removed from the left edge of the input
    pub crop_offset: u32,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Crops the side margins and turns a color frame into a clean ink mask
pub struct Binarizer<'a> {
    crop: &'a CropConfig,
    config: &'a BinarizeConfig,
}

impl<'a> Binarizer<'a> {
    pub fn new(crop: &'a CropConfig, config: &'a BinarizeConfig) -> Self {
        Self { crop, config }
    }

    /// Process an image: crop, grayscale, blur, threshold, close, open
    pub fn process(&self, image: &RgbImage) -> Result<PreprocessingResult, LocatorError> {
        let start = Instant::now();
        let mut steps_timing = Vec::new();

        let step_start = Instant::now();
        let cropped = steps::crop::apply(image, self.crop)?;
        record(&mut steps_timing, "crop", step_start);

        let config = self.config;
        let mut img = self.run_step("grayscale", &mut steps_timing, || {
            steps::grayscale::apply(&cropped.image)
        });
        img = self.run_step("blur", &mut steps_timing, || steps::blur::apply(img, config));
        img = self.run_step("threshold", &mut steps_timing, || {
            steps::threshold::apply(&img, config)
        });
        img = self.run_step("close", &mut steps_timing, || {
            steps::morphology::apply_close(img, config)
        });
        img = self.run_step("open", &mut steps_timing, || {
            steps::morphology::apply_open(img, config)
        });

        tracing::debug!(
            width = img.width(),
            height = img.height(),
            crop_offset = cropped.offset,
            "binarized frame"
        );

        Ok(PreprocessingResult {
            mask: img,
            crop_offset: cropped.offset,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: steps_timing,
        })
    }

    fn run_step<F>(&self, name: &str, timings: &mut Vec<StepTiming>, step_fn: F) -> GrayImage
    where
        F: FnOnce() -> GrayImage,
    {
        let step_start = Instant::now();
        let result = step_fn();
        record(timings, name, step_start);
        result
    }
}

pub(crate) fn record(timings: &mut Vec<StepTiming>, name: &str, since: Instant) {
    timings.push(StepTiming {
        name: name.to_string(),
        time_ms: since.elapsed().as_millis() as u64,
    });
}
