use std::io::Cursor;
use std::path::PathBuf;

use super::*;
use crate::assets::store::FsAssetStore;

const WHITE: image::Rgba<u8> = image::Rgba([255, 255, 255, 255]);
const RED: image::Rgba<u8> = image::Rgba([255, 0, 0, 255]);

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "mockpress_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn encode(img: &RgbaImage, format: image::ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    let dyn_img = match format {
        image::ImageFormat::Jpeg => image::DynamicImage::ImageRgb8(
            image::DynamicImage::ImageRgba8(img.clone()).to_rgb8(),
        ),
        _ => image::DynamicImage::ImageRgba8(img.clone()),
    };
    dyn_img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

#[test]
fn default_area_places_wide_design_centered_in_its_box() {
    let mockup = RgbaImage::from_pixel(1000, 1000, WHITE);
    let design = RgbaImage::from_pixel(400, 200, RED);
    let out = composite_images(
        &mockup,
        &design,
        &NormalizedRect::DEFAULT,
        ResizeFilter::Lanczos3,
    )
    .unwrap();

    assert_eq!(out.dimensions(), (1000, 1000));
    let red: Vec<(u32, u32)> = out
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0 == RED.0)
        .map(|(x, y, _)| (x, y))
        .collect();
    assert_eq!(red.len(), 200 * 100);
    assert_eq!(red.first(), Some(&(400, 450)));
    assert_eq!(red.last(), Some(&(599, 549)));
    // Padding strips of the design box leave the mockup untouched.
    assert_eq!(*out.get_pixel(500, 420), WHITE);
    assert_eq!(*out.get_pixel(500, 580), WHITE);
}

#[test]
fn transparent_design_pixels_keep_the_mockup() {
    let mockup = RgbaImage::from_pixel(10, 10, image::Rgba([0, 0, 255, 255]));
    let mut design = RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 0]));
    design.put_pixel(0, 0, RED);
    let area = NormalizedRect::new(0.0, 0.0, 0.2, 0.2, 0.0).unwrap();
    let out = composite_images(&mockup, &design, &area, ResizeFilter::Nearest).unwrap();

    assert_eq!(*out.get_pixel(0, 0), RED);
    assert_eq!(out.get_pixel(1, 1).0, [0, 0, 255, 255]);
    assert_eq!(out.get_pixel(5, 5).0, [0, 0, 255, 255]);
}

#[test]
fn quarter_rotation_turns_the_band_and_keeps_top_left_anchor() {
    let mockup = RgbaImage::from_pixel(1000, 1000, WHITE);
    let design = RgbaImage::from_pixel(400, 200, RED);
    let area = NormalizedRect::DEFAULT.with_rotation(90.0).unwrap();
    let out = composite_images(&mockup, &design, &area, ResizeFilter::Lanczos3).unwrap();

    // The horizontal band becomes a vertical one in columns 450..550.
    assert_eq!(*out.get_pixel(500, 410), RED);
    assert_eq!(*out.get_pixel(420, 500), WHITE);
    assert_eq!(*out.get_pixel(449, 500), WHITE);
    assert_eq!(*out.get_pixel(450, 400), RED);
}

#[test]
fn degenerate_area_is_rejected() {
    let mockup = RgbaImage::from_pixel(1000, 1000, WHITE);
    let design = RgbaImage::from_pixel(4, 4, RED);
    let area = NormalizedRect::new(0.5, 0.5, 0.0001, 0.2, 0.0).unwrap();
    let err = composite_images(&mockup, &design, &area, ResizeFilter::Lanczos3).unwrap_err();
    assert!(err.is_validation(), "{err}");
}

#[test]
fn empty_mockup_has_invalid_dimensions() {
    let mockup = RgbaImage::new(0, 0);
    let design = RgbaImage::from_pixel(4, 4, RED);
    let err = composite_images(
        &mockup,
        &design,
        &NormalizedRect::DEFAULT,
        ResizeFilter::Lanczos3,
    )
    .unwrap_err();
    assert!(matches!(err, MockpressError::InvalidDimensions(_)), "{err}");
}

#[test]
fn file_composite_reports_missing_inputs() {
    let root = temp_dir("engine_missing");
    let assets = FsAssetStore::new(&root);
    let mockup_path = root.join("m.png");
    assets
        .write(&mockup_path, &encode(&RgbaImage::from_pixel(8, 8, WHITE), image::ImageFormat::Png))
        .unwrap();

    let err = composite(
        &assets,
        &mockup_path,
        &root.join("missing.png"),
        &NormalizedRect::DEFAULT,
        &root.join("out.png"),
        &CompositeOptions::default(),
    )
    .unwrap_err();
    assert!(err.is_not_found(), "{err}");
    assert!(!root.join("out.png").exists());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn file_composite_keeps_jpeg_mockup_format() {
    let root = temp_dir("engine_jpeg");
    let assets = FsAssetStore::new(&root);
    let mockup_path = root.join("m.jpg");
    let design_path = root.join("d.png");
    let out_path = root.join("out.jpg");
    assets
        .write(&mockup_path, &encode(&RgbaImage::from_pixel(50, 40, WHITE), image::ImageFormat::Jpeg))
        .unwrap();
    assets
        .write(&design_path, &encode(&RgbaImage::from_pixel(10, 10, RED), image::ImageFormat::Png))
        .unwrap();

    composite(
        &assets,
        &mockup_path,
        &design_path,
        &NormalizedRect::DEFAULT,
        &out_path,
        &CompositeOptions::default(),
    )
    .unwrap();

    let bytes = std::fs::read(&out_path).unwrap();
    assert_eq!(
        image::guess_format(&bytes).unwrap(),
        image::ImageFormat::Jpeg
    );
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (50, 40));

    std::fs::remove_dir_all(&root).ok();
}
