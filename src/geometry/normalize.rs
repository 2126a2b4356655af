use crate::foundation::{
    core::{ImageSize, PixelRect},
    error::{MockpressError, MockpressResult},
};

/// Resolution-independent design area: fractions of the image dimensions plus a
/// rotation in degrees about the rectangle's own center.
///
/// Values are validated on construction: `x`, `y`, `width` and `height` are finite and
/// within `[0, 1]`, `rotation` is normalized into `[0, 360)`. `x + width <= 1` is not
/// enforced here; the editor clamps against the image bounds while the user interacts.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct NormalizedRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    rotation: f64,
}

impl NormalizedRect {
    /// Area assigned to freshly uploaded mockups: a centered 20% square.
    pub const DEFAULT: Self = Self {
        x: 0.4,
        y: 0.4,
        width: 0.2,
        height: 0.2,
        rotation: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> MockpressResult<Self> {
        for (name, v) in [("x", x), ("y", y), ("width", width), ("height", height)] {
            if !v.is_finite() {
                return Err(MockpressError::validation(format!(
                    "design area {name} must be a finite number"
                )));
            }
            if !(0.0..=1.0).contains(&v) {
                return Err(MockpressError::validation(format!(
                    "design area {name} must be within [0, 1], got {v}"
                )));
            }
        }
        if !rotation.is_finite() {
            return Err(MockpressError::validation(
                "design area rotation must be a finite number",
            ));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
            rotation: normalize_degrees(rotation),
        })
    }

    /// Parse and validate the wire layout `{x, y, width, height, rotation?}`.
    pub fn from_json(s: &str) -> MockpressResult<Self> {
        let payload: AreaPayload = serde_json::from_str(s)
            .map_err(|e| MockpressError::validation(format!("invalid area data: {e}")))?;
        Self::try_from(payload)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Same area with a different rotation (normalized into `[0, 360)`).
    pub fn with_rotation(self, rotation: f64) -> MockpressResult<Self> {
        Self::new(self.x, self.y, self.width, self.height, rotation)
    }
}

impl Default for NormalizedRect {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Loosely typed design area as received at the system boundary.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaPayload {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: Option<f64>,
}

impl TryFrom<AreaPayload> for NormalizedRect {
    type Error = MockpressError;

    fn try_from(p: AreaPayload) -> MockpressResult<Self> {
        Self::new(p.x, p.y, p.width, p.height, p.rotation.unwrap_or(0.0))
    }
}

impl From<NormalizedRect> for AreaPayload {
    fn from(r: NormalizedRect) -> Self {
        Self {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
            rotation: Some(r.rotation),
        }
    }
}

impl<'de> serde::Deserialize<'de> for NormalizedRect {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let payload = AreaPayload::deserialize(deserializer)?;
        Self::try_from(payload).map_err(serde::de::Error::custom)
    }
}

/// Wrap any angle in degrees into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if r >= 360.0 { 0.0 } else { r }
}

/// Convert an on-screen rectangle into fractions of `size`.
///
/// Returns `None` while the image size is unknown; callers keep their previous value.
/// Fractions outside `[0, 1]` (a rectangle hanging off the image) are clamped.
pub fn to_normalized(rect: &PixelRect, size: ImageSize) -> Option<NormalizedRect> {
    if !size.is_known() {
        return None;
    }
    let frac = |v: f64, total: f64| {
        let f = v / total;
        if f.is_finite() { f.clamp(0.0, 1.0) } else { 0.0 }
    };
    let rotation = if rect.rotation.is_finite() {
        rect.rotation
    } else {
        0.0
    };
    Some(NormalizedRect {
        x: frac(rect.x, size.width),
        y: frac(rect.y, size.height),
        width: frac(rect.width, size.width),
        height: frac(rect.height, size.height),
        rotation: normalize_degrees(rotation),
    })
}

/// Scale a normalized area back into pixels of `size`. `None` while the size is unknown.
pub fn to_pixels(area: &NormalizedRect, size: ImageSize) -> Option<PixelRect> {
    if !size.is_known() {
        return None;
    }
    Some(PixelRect {
        x: area.x * size.width,
        y: area.y * size.height,
        width: area.width * size.width,
        height: area.height * size.height,
        rotation: area.rotation,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/normalize.rs"]
mod tests;
