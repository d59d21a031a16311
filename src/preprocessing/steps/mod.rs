//! Individual preprocessing steps

pub mod blur;
pub mod crop;
pub mod grayscale;
pub mod morphology;
pub mod threshold;
