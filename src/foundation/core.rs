pub use kurbo::{Affine, Point, Vec2};

/// Size of an image as currently rendered (or decoded), in pixels.
///
/// A zero width or height means the image is not loaded yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

impl ImageSize {
    pub const UNKNOWN: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn from_dimensions(width: u32, height: u32) -> Self {
        Self {
            width: f64::from(width),
            height: f64::from(height),
        }
    }

    /// `true` once both dimensions are strictly positive and finite.
    pub fn is_known(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A rectangle in pixel space of some rendered image, plus its rotation in degrees
/// about its own center.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Integer values as shown in numeric entry fields.
    pub fn rounded(&self) -> [i64; 5] {
        [
            self.x.round() as i64,
            self.y.round() as i64,
            self.width.round() as i64,
            self.height.round() as i64,
            self.rotation.round() as i64,
        ]
    }

    /// Maps points from image space into the rectangle's unrotated local frame, with
    /// the origin at the rectangle's top-left corner.
    pub fn to_local(&self) -> Affine {
        let c = self.center().to_vec2();
        let half = Vec2::new(self.width / 2.0, self.height / 2.0);
        Affine::translate(half) * Affine::rotate(-self.rotation.to_radians()) * Affine::translate(-c)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
