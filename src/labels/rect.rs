//! Pixel-space rectangle resolution for detections.
//!
//! Detections arrive in either normalized `[0, 1]` units or absolute pixel
//! units, and a single label file may mix both. The convention is inferred
//! per detection: a center coordinate greater than 1 cannot be a normalized
//! fraction, so such a detection is treated as absolute pixels.

use super::record::Detection;

/// Coordinate convention of one detection, inferred from its values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Units {
    /// Fractions of the image dimensions, in `[0, 1]`.
    Normalized,
    /// Absolute pixel values.
    Pixel,
}

impl Units {
    /// Infers the convention for a detection.
    ///
    /// A box centered at `x <= 1, y <= 1` with a large width still counts as
    /// normalized; only the center discriminates, since a normalized center
    /// can never exceed 1 on either axis.
    #[inline]
    pub fn infer(detection: &Detection) -> Self {
        if detection.x_center > 1.0 || detection.y_center > 1.0 {
            Units::Pixel
        } else {
            Units::Normalized
        }
    }
}

/// A clamped, integer, pixel-space rectangle.
///
/// Invariant: `0 <= x1 <= x2 <= image_width` and
/// `0 <= y1 <= y2 <= image_height` for the image it was resolved against.
/// The redactor paints the half-open region `[x1, x2) × [y1, y2)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl PixelRect {
    /// Width of the rectangle in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    /// Height of the rectangle in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    /// Returns true if the rectangle covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x1 == self.x2 || self.y1 == self.y2
    }

    /// Returns true if the pixel at `(x, y)` lies inside the painted region.
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x1 && x < self.x2 && y >= self.y1 && y < self.y2
    }
}

/// Resolves a detection into a clamped pixel rectangle for an image of the
/// given dimensions.
///
/// The centered box `cx ± w/2`, `cy ± h/2` is computed in the detection's
/// inferred units, truncated to integers, and clamped into
/// `[0, image_width] × [0, image_height]`. Oversized or partially
/// out-of-frame boxes clamp rather than fail; a malformed negative extent
/// resolves to an ordered (possibly empty) rectangle.
pub fn resolve_rect(detection: &Detection, image_width: u32, image_height: u32) -> PixelRect {
    let (cx, cy, w, h) = match Units::infer(detection) {
        Units::Normalized => (
            detection.x_center * image_width as f64,
            detection.y_center * image_height as f64,
            detection.width * image_width as f64,
            detection.height * image_height as f64,
        ),
        Units::Pixel => (
            detection.x_center,
            detection.y_center,
            detection.width,
            detection.height,
        ),
    };

    let left = clamp_axis(cx - w / 2.0, image_width);
    let right = clamp_axis(cx + w / 2.0, image_width);
    let top = clamp_axis(cy - h / 2.0, image_height);
    let bottom = clamp_axis(cy + h / 2.0, image_height);

    PixelRect {
        x1: left.min(right),
        y1: top.min(bottom),
        x2: left.max(right),
        y2: top.max(bottom),
    }
}

/// Truncates a coordinate to an integer and clamps it into `[0, max]`.
#[inline]
fn clamp_axis(value: f64, max: u32) -> u32 {
    if value.is_nan() {
        return 0;
    }
    let truncated = value.trunc();
    if truncated <= 0.0 {
        0
    } else if truncated >= max as f64 {
        max
    } else {
        truncated as u32
    }
}
