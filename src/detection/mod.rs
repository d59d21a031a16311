//! Candidate discovery on the binary ink mask.
//!
//! Contours are reduced to boxes, implausible boxes are dropped, and the
//! survivors are grouped so that only one coherent handwriting region remains.

pub mod contours;
pub mod filter;
pub mod region;

pub use contours::extract_boxes;
pub use filter::{filter_candidates, ContourCandidate, Rejection};
pub use region::{is_cohesive, select_region};
