use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => return dst,
        255 => return src,
        _ => {}
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Blend `src` over `dst` with its top-left corner at `(left, top)`.
///
/// Parts of `src` outside `dst` are clipped; both images hold premultiplied RGBA8.
pub fn over_image_at(dst: &mut image::RgbaImage, src: &image::RgbaImage, left: i64, top: i64) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x0 = left.max(0);
    let y0 = top.max(0);
    let x1 = (left + sw).min(dw);
    let y1 = (top + sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for y in y0..y1 {
        for x in x0..x1 {
            let s = src.get_pixel((x - left) as u32, (y - top) as u32).0;
            let d = dst.get_pixel_mut(x as u32, y as u32);
            d.0 = over(d.0, s);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blend.rs"]
mod tests;
