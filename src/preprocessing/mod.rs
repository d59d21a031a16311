//! Image preprocessing: margin cropping and binarization into an ink mask.

pub mod pipeline;
pub mod steps;

pub use pipeline::{Binarizer, PreprocessingResult, StepTiming};
