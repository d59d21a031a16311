use crate::config::FilterConfig;
use crate::geometry::BoundingBox;
use crate::integral::IntegralImage;
use image::GrayImage;
use std::fmt;

/// Why a candidate box was dropped
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    Area { area: u64, min: f64, max: f64 },
    Aspect(f32),
    InkDensity(f32),
    MarginInk(f32),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Area { area, min, max } => {
                write!(f, "area {} outside ({:.0}, {:.0})", area, min, max)
            }
            Rejection::Aspect(ratio) => write!(f, "aspect ratio {:.2}", ratio),
            Rejection::InkDensity(density) => write!(f, "ink density {:.3}", density),
            Rejection::MarginInk(ratio) => write!(f, "margin ink {:.3}", ratio),
        }
    }
}

/// A candidate box together with the foreground counts of the mask it was
/// found on. Only lives while the filter runs.
#[derive(Debug, Clone, Copy)]
pub struct ContourCandidate<'a> {
    pub bbox: BoundingBox,
    ink: &'a IntegralImage,
}

impl<'a> ContourCandidate<'a> {
    pub fn new(bbox: BoundingBox, ink: &'a IntegralImage) -> Self {
        Self { bbox, ink }
    }

    /// Fraction of ink pixels inside the box
    pub fn ink_density(&self) -> f32 {
        let area = self.bbox.area();
        if area == 0 {
            return 0.0;
        }
        self.ink.sum_box(&self.bbox) as f32 / area as f32
    }

    /// Ink fraction of the ring added by padding the box with `margin` pixels.
    /// 0 when padding adds no pixels (the box already spans the image).
    pub fn margin_ink(&self, margin: u32) -> f32 {
        let padded = self
            .bbox
            .padded(margin, self.ink.width(), self.ink.height());
        let ring_pixels = padded.area().saturating_sub(self.bbox.area());
        if ring_pixels == 0 {
            return 0.0;
        }
        let ring_ink = self
            .ink
            .sum_box(&padded)
            .saturating_sub(self.ink.sum_box(&self.bbox));
        ring_ink as f32 / ring_pixels as f32
    }

    /// First failed predicate, or `None` when the box plausibly holds one digit
    pub fn rejection(&self, config: &FilterConfig) -> Option<Rejection> {
        let h = self.ink.height() as f64;
        let w = self.ink.width() as f64;
        let min = (h / config.min_area_divisor as f64) * (w / config.min_area_divisor as f64);
        let max = (h / config.max_area_divisor as f64) * (w / config.max_area_divisor as f64);
        let area = self.bbox.area();
        if !(min < area as f64 && (area as f64) < max) {
            return Some(Rejection::Area { area, min, max });
        }

        let aspect = self.bbox.aspect_ratio();
        if !(config.min_aspect < aspect && aspect < config.max_aspect) {
            return Some(Rejection::Aspect(aspect));
        }

        let density = self.ink_density();
        if !(config.min_ink_density < density && density < config.max_ink_density) {
            return Some(Rejection::InkDensity(density));
        }

        let margin_ink = self.margin_ink(config.margin);
        if margin_ink >= config.max_margin_ink {
            return Some(Rejection::MarginInk(margin_ink));
        }

        None
    }
}

/// Keep the boxes that look like a single isolated digit on `mask`
pub fn filter_candidates(
    boxes: &[BoundingBox],
    mask: &GrayImage,
    config: &FilterConfig,
) -> Vec<BoundingBox> {
    let ink = IntegralImage::of_foreground(mask);
    boxes
        .iter()
        .filter(|bbox| {
            let candidate = ContourCandidate::new(**bbox, &ink);
            match candidate.rejection(config) {
                Some(reason) => {
                    tracing::trace!(?bbox, %reason, "rejected candidate");
                    false
                }
                None => true,
            }
        })
        .copied()
        .collect()
}
