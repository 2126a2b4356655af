use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_format_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let prepared = decode_image(&png_bytes(img)).unwrap();
    assert_eq!(prepared.width(), 1);
    assert_eq!(prepared.height(), 1);
    assert_eq!(prepared.format, Some(image::ImageFormat::Png));
    assert_eq!(
        prepared.rgba8_premul.as_raw().as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, MockpressError::Decode(_)), "{err}");
    assert!(probe_dimensions(b"nope").is_err());
}

#[test]
fn probe_reads_header_dimensions() {
    let img = image::RgbaImage::from_pixel(7, 3, image::Rgba([0, 0, 0, 255]));
    assert_eq!(probe_dimensions(&png_bytes(img)).unwrap(), (7, 3));
}

#[test]
fn output_format_keeps_common_formats_and_falls_back_to_png() {
    use image::ImageFormat;
    assert_eq!(output_format(Some(ImageFormat::Jpeg)), ImageFormat::Jpeg);
    assert_eq!(output_format(Some(ImageFormat::WebP)), ImageFormat::WebP);
    assert_eq!(output_format(Some(ImageFormat::Bmp)), ImageFormat::Png);
    assert_eq!(output_format(None), ImageFormat::Png);
    assert_eq!(output_extension(ImageFormat::Png), "png");
    assert_eq!(output_extension(ImageFormat::Jpeg), "jpg");
}

#[test]
fn encode_png_restores_straight_alpha() {
    let mut px = image::RgbaImage::from_raw(2, 1, vec![10, 20, 30, 255, 200, 100, 0, 0]).unwrap();
    crate::foundation::math::premultiply_rgba8_in_place(&mut px);
    let bytes = encode_image(&px, image::ImageFormat::Png).unwrap();
    let back = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(back.as_raw().as_slice(), &[10, 20, 30, 255, 0, 0, 0, 0]);
}

#[test]
fn encode_jpeg_drops_alpha() {
    let px = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]));
    let bytes = encode_image(&px, image::ImageFormat::Jpeg).unwrap();
    let back = image::load_from_memory(&bytes).unwrap();
    assert_eq!(back.color(), image::ColorType::Rgb8);
    assert_eq!((back.width(), back.height()), (4, 4));
}

#[test]
fn sniff_format_reads_magic_bytes() {
    let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
    assert_eq!(sniff_format(&png_bytes(img)), Some(image::ImageFormat::Png));
    assert_eq!(sniff_format(b"plain text"), None);
}
