use super::*;

const RED: image::Rgba<u8> = image::Rgba([255, 0, 0, 255]);

fn opaque_rows(img: &RgbaImage, x: u32) -> Vec<u32> {
    (0..img.height())
        .filter(|&y| img.get_pixel(x, y).0[3] == 255)
        .collect()
}

#[test]
fn filters_map_onto_image_kernels() {
    assert_eq!(
        imageops::FilterType::from(ResizeFilter::default()),
        imageops::FilterType::Lanczos3
    );
    assert_eq!(
        imageops::FilterType::from(ResizeFilter::Nearest),
        imageops::FilterType::Nearest
    );
}

#[test]
fn contain_pads_wide_design_with_transparent_strips() {
    let design = RgbaImage::from_pixel(400, 200, RED);
    let out = resize_contain(&design, 200, 200, ResizeFilter::Lanczos3);
    assert_eq!(out.dimensions(), (200, 200));

    for x in [0, 57, 199] {
        assert_eq!(opaque_rows(&out, x), (50..150).collect::<Vec<_>>());
    }
    assert_eq!(out.get_pixel(100, 100).0, RED.0);
    assert_eq!(out.get_pixel(100, 10).0, [0, 0, 0, 0]);
    assert_eq!(out.get_pixel(100, 190).0, [0, 0, 0, 0]);
}

#[test]
fn contain_same_size_is_identity() {
    let mut design = RgbaImage::from_pixel(3, 2, RED);
    design.put_pixel(1, 1, image::Rgba([0, 0, 40, 40]));
    let out = resize_contain(&design, 3, 2, ResizeFilter::Lanczos3);
    assert_eq!(out, design);
}

#[test]
fn zero_rotation_and_full_turns_are_identity() {
    let mut img = RgbaImage::from_pixel(5, 3, RED);
    img.put_pixel(0, 0, image::Rgba([0, 255, 0, 255]));
    assert_eq!(rotate_expand(&img, 0.0), img);
    assert_eq!(rotate_expand(&img, 360.0), img);
    assert_eq!(rotate_expand(&img, -720.0), img);
}

#[test]
fn quarter_turn_is_clockwise_and_exact() {
    let mut img = RgbaImage::from_pixel(3, 2, RED);
    let green = image::Rgba([0, 255, 0, 255]);
    img.put_pixel(0, 0, green);

    let out = rotate_expand(&img, 90.0);
    assert_eq!(out.dimensions(), (2, 3));
    // Top-left moves to top-right under a clockwise quarter turn.
    assert_eq!(*out.get_pixel(1, 0), green);

    assert_eq!(rotate_expand(&img, -90.0), imageops::rotate270(&img));
    assert_eq!(rotate_expand(&img, 180.0), imageops::rotate180(&img));
}

#[test]
fn arbitrary_angle_expands_canvas_with_transparent_corners() {
    let img = RgbaImage::from_pixel(10, 10, RED);
    let out = rotate_expand(&img, 45.0);
    assert_eq!(out.dimensions(), (15, 15));

    assert_eq!(out.get_pixel(7, 7).0, RED.0);
    for (x, y) in [(0, 0), (14, 0), (0, 14), (14, 14)] {
        assert_eq!(out.get_pixel(x, y).0[3], 0, "corner ({x}, {y})");
    }
    for px in out.pixels() {
        assert!(px.0[0] <= px.0[3] && px.0[1] <= px.0[3] && px.0[2] <= px.0[3]);
    }
}

#[test]
fn small_angle_on_wide_image_grows_height() {
    let img = RgbaImage::from_pixel(100, 20, RED);
    let out = rotate_expand(&img, 10.0);
    // 100*cos + 20*sin = 101.96..., 100*sin + 20*cos = 37.06...
    assert_eq!(out.dimensions(), (102, 38));
}
