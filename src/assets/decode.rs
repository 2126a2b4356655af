use std::io::Cursor;

use anyhow::Context;

use crate::{
    assets::PreparedImage,
    foundation::{
        error::{MockpressError, MockpressResult},
        math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    },
};

/// Decode encoded image bytes and convert to premultiplied RGBA8.
///
/// Fails with [`MockpressError::Decode`] for unreadable bytes and
/// [`MockpressError::InvalidDimensions`] for images without pixels.
pub fn decode_image(bytes: &[u8]) -> MockpressResult<PreparedImage> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("sniff image format")?;
    let format = reader.format();
    let dyn_img = reader
        .decode()
        .map_err(|e| MockpressError::decode(format!("decode image from memory: {e}")))?;

    let mut rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(MockpressError::invalid_dimensions(format!(
            "image decoded to {width}x{height}"
        )));
    }

    premultiply_rgba8_in_place(&mut rgba);
    Ok(PreparedImage {
        format,
        rgba8_premul: rgba,
    })
}

/// Read width/height from the header without decoding pixel data.
pub fn probe_dimensions(bytes: &[u8]) -> MockpressResult<(u32, u32)> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("sniff image format")?;
    let (w, h) = reader
        .into_dimensions()
        .map_err(|e| MockpressError::decode(format!("read image header: {e}")))?;
    if w == 0 || h == 0 {
        return Err(MockpressError::invalid_dimensions(format!(
            "image header reports {w}x{h}"
        )));
    }
    Ok((w, h))
}

/// Format detected from the leading magic bytes, if recognized.
pub fn sniff_format(bytes: &[u8]) -> Option<image::ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Formats written back out as-is; anything else is written as PNG.
pub fn output_format(source: Option<image::ImageFormat>) -> image::ImageFormat {
    match source {
        Some(f @ (image::ImageFormat::Png | image::ImageFormat::Jpeg | image::ImageFormat::WebP)) => f,
        _ => image::ImageFormat::Png,
    }
}

/// Conventional file extension for `format` (without the dot).
pub fn output_extension(format: image::ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("png")
}

/// Encode premultiplied RGBA8 pixels as `format`.
///
/// JPEG has no alpha channel, so pixels are flattened to RGB first.
pub fn encode_image(
    rgba8_premul: &image::RgbaImage,
    format: image::ImageFormat,
) -> MockpressResult<Vec<u8>> {
    let mut straight = rgba8_premul.clone();
    unpremultiply_rgba8_in_place(&mut straight);

    let dyn_img = match format {
        image::ImageFormat::Jpeg => {
            image::DynamicImage::ImageRgb8(image::DynamicImage::ImageRgba8(straight).to_rgb8())
        }
        _ => image::DynamicImage::ImageRgba8(straight),
    };

    let mut buf = Vec::new();
    dyn_img
        .write_to(&mut Cursor::new(&mut buf), format)
        .map_err(|e| MockpressError::decode(format!("encode {format:?}: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
