//! Handwritten digit localization.
//!
//! Takes one photographed color frame and returns an ordered set of tight
//! boxes, each wrapping a single digit, together with a canonical square
//! glyph per box ready for a digit classifier.
//!
//! ```no_run
//! use digit_locator::{ColorFrame, Locator, LocatorConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let locator = Locator::new(LocatorConfig::default())?;
//! let frame = ColorFrame::from(image::open("digits.jpg")?.to_rgb8());
//! let result = locator.locate(&frame)?;
//! for bbox in result.original_boxes() {
//!     println!("{:?}", bbox);
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod glyph;
pub mod integral;
pub mod locator;
pub mod preprocessing;

pub use classifier::{recognize, DigitClassifier, Prediction, Recognition};
pub use config::LocatorConfig;
pub use error::LocatorError;
pub use geometry::{BoundingBox, CoordinateSpace, FractionalBox};
pub use glyph::GlyphImage;
pub use locator::{ColorFrame, Detection, Localization, Locator};
