//! Seam for the external digit classifier and the checks applied to its output.

use crate::error::LocatorError;
use crate::geometry::BoundingBox;
use crate::glyph::GlyphImage;
use crate::locator::{ColorFrame, Locator};
use serde::Serialize;

/// One classified glyph
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub digit: u8,
    pub confidence: f32,
}

impl Prediction {
    /// Most likely class of a 10-way probability vector, and its probability
    pub fn from_probabilities(probabilities: &[f32]) -> Result<Self, LocatorError> {
        if probabilities.len() != 10 {
            return Err(LocatorError::ClassifierContractViolation(format!(
                "expected 10 class probabilities, got {}",
                probabilities.len()
            )));
        }
        if let Some(bad) = probabilities.iter().find(|p| !p.is_finite()) {
            return Err(LocatorError::ClassifierContractViolation(format!(
                "non-finite class probability {}",
                bad
            )));
        }

        let mut best = 0usize;
        for (i, &p) in probabilities.iter().enumerate().skip(1) {
            if p > probabilities[best] {
                best = i;
            }
        }
        let prediction = Self {
            digit: best as u8,
            confidence: probabilities[best],
        };
        prediction.validate()?;
        Ok(prediction)
    }

    /// Digit must be 0–9 and confidence a finite value in [0, 1]; never clamped
    pub fn validate(&self) -> Result<(), LocatorError> {
        if self.digit > 9 {
            return Err(LocatorError::ClassifierContractViolation(format!(
                "digit label {} is outside 0-9",
                self.digit
            )));
        }
        if !self.confidence.is_finite() {
            return Err(LocatorError::ClassifierContractViolation(format!(
                "non-finite confidence {}",
                self.confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(LocatorError::ClassifierContractViolation(format!(
                "confidence {} is outside [0, 1]",
                self.confidence
            )));
        }
        Ok(())
    }
}

/// Trait that every digit classifier backend must implement
pub trait DigitClassifier: Send + Sync {
    /// Returns the classifier identifier
    fn name(&self) -> &'static str;

    /// Classify a batch of canonical glyphs, one prediction per glyph, same order
    fn classify(&self, glyphs: &[GlyphImage]) -> Result<Vec<Prediction>, LocatorError>;
}

/// Check a classifier's answer for a batch of `expected` glyphs
pub fn validate_predictions(expected: usize, predictions: &[Prediction]) -> Result<(), LocatorError> {
    if predictions.len() != expected {
        return Err(LocatorError::ClassifierContractViolation(format!(
            "{} glyphs produced {} predictions",
            expected,
            predictions.len()
        )));
    }
    predictions.iter().try_for_each(Prediction::validate)
}

/// Recognized digit string for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Recognition {
    pub digits: String,
    pub predictions: Vec<Prediction>,
    /// Boxes in original-frame pixels, same order as `digits`
    pub boxes: Vec<BoundingBox>,
    /// Mean confidence, 0 when nothing was found
    pub confidence: f32,
}

/// Locate digits in `frame` and classify them top to bottom
pub fn recognize(
    locator: &Locator,
    classifier: &dyn DigitClassifier,
    frame: &ColorFrame,
) -> Result<Recognition, LocatorError> {
    let localization = locator.locate(frame)?;
    let glyphs: Vec<GlyphImage> = localization.glyphs().cloned().collect();

    let predictions = if glyphs.is_empty() {
        Vec::new()
    } else {
        classifier.classify(&glyphs)?
    };
    validate_predictions(glyphs.len(), &predictions)?;

    let digits: String = predictions
        .iter()
        .map(|p| char::from(b'0' + p.digit))
        .collect();
    let confidence = if predictions.is_empty() {
        0.0
    } else {
        predictions.iter().map(|p| p.confidence).sum::<f32>() / predictions.len() as f32
    };

    tracing::info!(
        classifier = classifier.name(),
        digits = %digits,
        confidence,
        "recognized frame"
    );

    Ok(Recognition {
        digits,
        predictions,
        boxes: localization.original_boxes(),
        confidence,
    })
}
