//! End-to-end digit localization: crop → binarize → contours → filter →
//! region selection → glyph normalization.

use crate::config::LocatorConfig;
use crate::detection::{extract_boxes, filter_candidates, select_region};
use crate::error::LocatorError;
use crate::geometry::{BoundingBox, CoordinateSpace, FractionalBox};
use crate::glyph::{extract_glyphs, GlyphImage};
use crate::preprocessing::pipeline::record;
use crate::preprocessing::{Binarizer, StepTiming};
use image::RgbImage;
use serde::Serialize;
use std::time::Instant;

/// Decoded 8-bit RGB frame with explicit dimensions
#[derive(Debug, Clone)]
pub struct ColorFrame {
    image: RgbImage,
}

impl ColorFrame {
    /// Wrap a tightly packed `height × width × 3` buffer
    pub fn from_raw(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, LocatorError> {
        let expected = width as usize * height as usize * 3;
        if bytes.len() != expected {
            return Err(LocatorError::InvalidGeometry(format!(
                "buffer holds {} bytes, {}x{} RGB needs {}",
                bytes.len(),
                width,
                height,
                expected
            )));
        }
        RgbImage::from_raw(width, height, bytes)
            .map(|image| Self { image })
            .ok_or_else(|| {
                LocatorError::InvalidGeometry(format!("cannot build {}x{} frame", width, height))
            })
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

impl From<RgbImage> for ColorFrame {
    fn from(image: RgbImage) -> Self {
        Self { image }
    }
}

/// One located digit: its box in cropped-image pixels and its canonical glyph
#[derive(Debug, Clone)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub glyph: GlyphImage,
}

/// Everything one invocation produced
#[derive(Debug, Clone)]
pub struct Localization {
    pub detections: Vec<Detection>,
    /// Pixels removed from the left edge before binarization
    pub crop_offset: u32,
    pub original_width: u32,
    pub original_height: u32,
    pub cropped_width: u32,
    pub cropped_height: u32,
    pub steps: Vec<StepTiming>,
    pub total_time_ms: u64,
}

/// A box list tagged with the frame it refers to
#[derive(Debug, Clone, Serialize)]
pub struct BoxReport {
    pub space: CoordinateSpace,
    pub boxes: Vec<ReportedBox>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReportedBox {
    Pixels(BoundingBox),
    Fraction(FractionalBox),
}

impl Localization {
    /// No digit-like shapes were found; a valid outcome, not a failure
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    /// Boxes relative to the cropped image the pipeline ran on
    pub fn cropped_boxes(&self) -> Vec<BoundingBox> {
        self.detections.iter().map(|d| d.bbox).collect()
    }

    /// Boxes relative to the frame the caller supplied
    pub fn original_boxes(&self) -> Vec<BoundingBox> {
        self.detections
            .iter()
            .map(|d| d.bbox.translate(self.crop_offset, 0))
            .collect()
    }

    /// Boxes as fractions of the original frame, shifted right by `x_offset`
    /// cropped-space pixels. Pass [`Localization::crop_offset`] to undo this
    /// invocation's own crop, or another value when overlaying on a frame
    /// that was cropped differently.
    pub fn normalized_boxes(&self, x_offset: u32) -> Vec<FractionalBox> {
        self.detections
            .iter()
            .map(|d| {
                d.bbox
                    .to_fractional(self.original_width, self.original_height, x_offset)
            })
            .collect()
    }

    pub fn boxes_in(&self, space: CoordinateSpace) -> BoxReport {
        let boxes = match space {
            CoordinateSpace::Cropped => self
                .cropped_boxes()
                .into_iter()
                .map(ReportedBox::Pixels)
                .collect(),
            CoordinateSpace::Original => self
                .original_boxes()
                .into_iter()
                .map(ReportedBox::Pixels)
                .collect(),
            CoordinateSpace::Normalized => self
                .normalized_boxes(self.crop_offset)
                .into_iter()
                .map(ReportedBox::Fraction)
                .collect(),
        };
        BoxReport { space, boxes }
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &GlyphImage> {
        self.detections.iter().map(|d| &d.glyph)
    }
}

/// Immutable, validated pipeline; safe to share between threads
#[derive(Debug, Clone)]
pub struct Locator {
    config: LocatorConfig,
}

impl Locator {
    /// Validate the configuration up front so no call fails on it later
    pub fn new(config: LocatorConfig) -> Result<Self, LocatorError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Locate digits in `frame`
    pub fn locate(&self, frame: &ColorFrame) -> Result<Localization, LocatorError> {
        self.locate_image(frame.image())
    }

    pub fn locate_image(&self, image: &RgbImage) -> Result<Localization, LocatorError> {
        let start = Instant::now();
        let config = &self.config;
        let (original_width, original_height) = image.dimensions();

        let pre = Binarizer::new(&config.crop, &config.binarize).process(image)?;
        let mut steps = pre.steps;
        let mask = pre.mask;

        let step_start = Instant::now();
        let contours = extract_boxes(&mask);
        record(&mut steps, "contours", step_start);

        let step_start = Instant::now();
        let candidates = filter_candidates(&contours, &mask, &config.filter);
        record(&mut steps, "filter", step_start);

        let step_start = Instant::now();
        let selected = select_region(&candidates, &config.grouping);
        record(&mut steps, "select", step_start);

        let step_start = Instant::now();
        let glyphs = extract_glyphs(&mask, &selected, &config.glyph);
        record(&mut steps, "glyphs", step_start);

        tracing::debug!(
            contours = contours.len(),
            candidates = candidates.len(),
            selected = selected.len(),
            "located digits"
        );

        let detections = selected
            .into_iter()
            .zip(glyphs)
            .map(|(bbox, glyph)| Detection { bbox, glyph })
            .collect();

        Ok(Localization {
            detections,
            crop_offset: pre.crop_offset,
            original_width,
            original_height,
            cropped_width: mask.width(),
            cropped_height: mask.height(),
            steps,
            total_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}
