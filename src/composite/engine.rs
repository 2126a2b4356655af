use std::path::Path;

use image::RgbaImage;

use crate::{
    assets::{
        decode::{decode_image, encode_image, output_format},
        store::AssetStore,
    },
    composite::{
        blend::over_image_at,
        transform::{ResizeFilter, resize_contain, rotate_expand},
    },
    foundation::{
        core::ImageSize,
        error::{MockpressError, MockpressResult},
        math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    },
    geometry::normalize::{NormalizedRect, to_pixels},
};

/// Knobs for the compositing engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositeOptions {
    pub filter: ResizeFilter,
}

/// Place `design` onto `mockup` inside `area` and return the flattened result.
///
/// Both inputs and the output are straight-alpha RGBA8.
pub fn composite_images(
    mockup: &RgbaImage,
    design: &RgbaImage,
    area: &NormalizedRect,
    filter: ResizeFilter,
) -> MockpressResult<RgbaImage> {
    let mut base = mockup.clone();
    premultiply_rgba8_in_place(&mut base);
    let mut overlay = design.clone();
    premultiply_rgba8_in_place(&mut overlay);

    composite_premul(&mut base, &overlay, area, filter)?;
    unpremultiply_rgba8_in_place(&mut base);
    Ok(base)
}

/// Blend a premultiplied `design` onto a premultiplied `mockup` in place.
pub(crate) fn composite_premul(
    mockup: &mut RgbaImage,
    design: &RgbaImage,
    area: &NormalizedRect,
    filter: ResizeFilter,
) -> MockpressResult<()> {
    let (mw, mh) = mockup.dimensions();
    if mw == 0 || mh == 0 {
        return Err(MockpressError::invalid_dimensions(format!(
            "mockup is {mw}x{mh}"
        )));
    }
    if design.width() == 0 || design.height() == 0 {
        return Err(MockpressError::invalid_dimensions(format!(
            "design is {}x{}",
            design.width(),
            design.height()
        )));
    }

    let scaled = to_pixels(area, ImageSize::from_dimensions(mw, mh))
        .ok_or_else(|| MockpressError::invalid_dimensions("mockup size is unknown"))?;
    let [x, y, w, h, _] = scaled.rounded();
    if w <= 0 || h <= 0 {
        return Err(MockpressError::validation(format!(
            "design area is degenerate at {mw}x{mh}: {w}x{h} px"
        )));
    }
    let box_w = u32::try_from(w)
        .map_err(|_| MockpressError::validation(format!("design area width {w} out of range")))?;
    let box_h = u32::try_from(h)
        .map_err(|_| MockpressError::validation(format!("design area height {h} out of range")))?;

    let mut placed = resize_contain(design, box_w, box_h, filter);
    if area.rotation() != 0.0 {
        placed = rotate_expand(&placed, area.rotation());
    }

    // Anchored at the area's top-left, also after rotation.
    over_image_at(mockup, &placed, x, y);
    Ok(())
}

/// Composite the design at `design_path` onto the mockup at `mockup_path` and write the
/// result to `output_path`.
///
/// The output keeps the mockup's raster format (see [`output_format`]); callers should
/// pick the extension of `output_path` with [`output_extension`].
///
/// [`output_extension`]: crate::assets::decode::output_extension
#[tracing::instrument(skip(assets, area, options))]
pub fn composite(
    assets: &dyn AssetStore,
    mockup_path: &Path,
    design_path: &Path,
    area: &NormalizedRect,
    output_path: &Path,
    options: &CompositeOptions,
) -> MockpressResult<()> {
    for (role, path) in [("mockup", mockup_path), ("design", design_path)] {
        if !assets.exists(path) {
            return Err(MockpressError::not_found(format!(
                "{role} file not found: {}",
                path.display()
            )));
        }
    }

    let mockup = decode_image(&assets.read(mockup_path)?)?;
    let design = decode_image(&assets.read(design_path)?)?;
    let format = output_format(mockup.format);

    let mut canvas = mockup.rgba8_premul;
    composite_premul(&mut canvas, &design.rgba8_premul, area, options.filter)?;

    let bytes = encode_image(&canvas, format)?;
    assets.write(output_path, &bytes)?;
    tracing::debug!(
        width = canvas.width(),
        height = canvas.height(),
        ?format,
        "wrote composite"
    );
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composite/engine.rs"]
mod tests;
