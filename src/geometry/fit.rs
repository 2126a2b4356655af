/// Where a source image lands inside a target box under the contain policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Scaled source width in pixels.
    pub width: u32,
    /// Scaled source height in pixels.
    pub height: u32,
    /// Horizontal offset of the scaled source inside the box.
    pub left: u32,
    /// Vertical offset of the scaled source inside the box.
    pub top: u32,
}

/// Fit `src` into `box_` preserving aspect ratio, never cropping.
///
/// The scaled size uses `min(box_w / src_w, box_h / src_h)` and is rounded to whole
/// pixels (at least one pixel, at most the box); the leftover space is split evenly,
/// the odd pixel going to the right/bottom. Zero-sized inputs yield a zero placement.
pub fn fit_contain(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> Placement {
    if src_w == 0 || src_h == 0 || box_w == 0 || box_h == 0 {
        return Placement {
            width: 0,
            height: 0,
            left: 0,
            top: 0,
        };
    }

    let scale = (f64::from(box_w) / f64::from(src_w)).min(f64::from(box_h) / f64::from(src_h));
    let width = ((f64::from(src_w) * scale).round() as u32).clamp(1, box_w);
    let height = ((f64::from(src_h) * scale).round() as u32).clamp(1, box_h);

    Placement {
        width,
        height,
        left: (box_w - width) / 2,
        top: (box_h - height) / 2,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/fit.rs"]
mod tests;
