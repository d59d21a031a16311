//! Axis-aligned boxes and the coordinate spaces they can be reported in.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in pixel coordinates of the image it was measured on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Height over width; 0 for a zero-width box
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 {
            return 0.0;
        }
        self.height as f32 / self.width as f32
    }

    /// Grow by `margin` on every side, clipped to a `bounds_width × bounds_height` image
    pub fn padded(&self, margin: u32, bounds_width: u32, bounds_height: u32) -> Self {
        let x0 = self.x.saturating_sub(margin);
        let y0 = self.y.saturating_sub(margin);
        let x1 = self.right().saturating_add(margin).min(bounds_width);
        let y1 = self.bottom().saturating_add(margin).min(bounds_height);
        Self::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    pub fn translate(&self, dx: u32, dy: u32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Whether the box lies entirely inside a `width × height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }

    /// Smallest box enclosing every box in `boxes`; `None` when empty
    pub fn enclosing(boxes: &[BoundingBox]) -> Option<BoundingBox> {
        let first = boxes.first()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.right(), first.bottom());
        for b in &boxes[1..] {
            x0 = x0.min(b.x);
            y0 = y0.min(b.y);
            x1 = x1.max(b.right());
            y1 = y1.max(b.bottom());
        }
        Some(BoundingBox::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Express the box as fractions of a `frame_width × frame_height` frame,
    /// after shifting it right by `x_offset` pixels (e.g. the crop margin).
    pub fn to_fractional(&self, frame_width: u32, frame_height: u32, x_offset: u32) -> FractionalBox {
        let fw = frame_width.max(1) as f32;
        let fh = frame_height.max(1) as f32;
        FractionalBox {
            x: (self.x + x_offset) as f32 / fw,
            y: self.y as f32 / fh,
            width: self.width as f32 / fw,
            height: self.height as f32 / fh,
        }
    }
}

/// Box expressed as fractions of a reference frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionalBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Which frame a list of boxes refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSpace {
    /// Pixels of the image after side margins were removed
    Cropped,
    /// Pixels of the image as supplied by the caller
    Original,
    /// Fractions of the original image's width and height
    Normalized,
}

impl CoordinateSpace {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cropped" => Some(Self::Cropped),
            "original" => Some(Self::Original),
            "normalized" => Some(Self::Normalized),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cropped => "cropped",
            Self::Original => "original",
            Self::Normalized => "normalized",
        }
    }
}
