use image::{RgbaImage, imageops};

use crate::{
    foundation::core::{Affine, Point, Vec2},
    geometry::{fit::fit_contain, normalize::normalize_degrees},
};

/// Resampling kernel used when scaling designs into the design area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResizeFilter> for imageops::FilterType {
    fn from(f: ResizeFilter) -> Self {
        match f {
            ResizeFilter::Nearest => Self::Nearest,
            ResizeFilter::Triangle => Self::Triangle,
            ResizeFilter::CatmullRom => Self::CatmullRom,
            ResizeFilter::Gaussian => Self::Gaussian,
            ResizeFilter::Lanczos3 => Self::Lanczos3,
        }
    }
}

/// Scale `src` into a `box_w x box_h` canvas with the contain policy.
///
/// The scaled image is centered; the rest of the canvas is fully transparent.
pub fn resize_contain(src: &RgbaImage, box_w: u32, box_h: u32, filter: ResizeFilter) -> RgbaImage {
    let mut canvas = RgbaImage::new(box_w, box_h);
    let p = fit_contain(src.width(), src.height(), box_w, box_h);
    if p.width == 0 || p.height == 0 {
        return canvas;
    }

    let scaled = if (p.width, p.height) == src.dimensions() {
        src.clone()
    } else {
        imageops::resize(src, p.width, p.height, filter.into())
    };
    imageops::replace(&mut canvas, &scaled, i64::from(p.left), i64::from(p.top));
    canvas
}

/// Rotate `src` clockwise by `degrees`, growing the canvas to hold the whole result.
///
/// Quarter turns are exact pixel permutations; other angles are resampled bilinearly
/// around the image center. Pixels not covered by the source are fully transparent.
/// `src` is expected to be premultiplied.
pub fn rotate_expand(src: &RgbaImage, degrees: f64) -> RgbaImage {
    let deg = normalize_degrees(degrees);
    if deg == 0.0 {
        return src.clone();
    }
    if deg == 90.0 {
        return imageops::rotate90(src);
    }
    if deg == 180.0 {
        return imageops::rotate180(src);
    }
    if deg == 270.0 {
        return imageops::rotate270(src);
    }

    let (w, h) = (f64::from(src.width()), f64::from(src.height()));
    let rad = deg.to_radians();
    let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
    let out_w = expanded_extent(w * cos + h * sin);
    let out_h = expanded_extent(w * sin + h * cos);

    let forward = Affine::translate(Vec2::new(f64::from(out_w) / 2.0, f64::from(out_h) / 2.0))
        * Affine::rotate(rad)
        * Affine::translate(Vec2::new(-w / 2.0, -h / 2.0));
    let inverse = forward.inverse();

    let mut out = RgbaImage::new(out_w, out_h);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let s = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        px.0 = sample_bilinear(src, s.x - 0.5, s.y - 0.5);
    }
    out
}

fn expanded_extent(v: f64) -> u32 {
    // Trim float noise so an exact fit does not grow by a pixel.
    ((v - 1e-6).ceil().max(1.0)) as u32
}

fn sample_bilinear(src: &RgbaImage, fx: f64, fy: f64) -> [u8; 4] {
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let fetch = |x: i64, y: i64| -> [u8; 4] {
        if x < 0 || y < 0 || x >= i64::from(src.width()) || y >= i64::from(src.height()) {
            [0, 0, 0, 0]
        } else {
            src.get_pixel(x as u32, y as u32).0
        }
    };

    let taps = [
        (fetch(x0, y0), (1.0 - tx) * (1.0 - ty)),
        (fetch(x0 + 1, y0), tx * (1.0 - ty)),
        (fetch(x0, y0 + 1), (1.0 - tx) * ty),
        (fetch(x0 + 1, y0 + 1), tx * ty),
    ];

    let mut out = [0u8; 4];
    for (c, slot) in out.iter_mut().enumerate() {
        let v: f64 = taps.iter().map(|(p, w)| f64::from(p[c]) * w).sum();
        *slot = v.round().clamp(0.0, 255.0) as u8;
    }
    // Keep premultiplied invariants (color <= alpha) after rounding.
    for i in 0..3 {
        out[i] = out[i].min(out[3]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/composite/transform.rs"]
mod tests;
