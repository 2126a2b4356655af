use super::*;

#[test]
fn to_normalized_divides_by_image_size_and_keeps_rotation() {
    let px = PixelRect::new(100.0, 50.0, 200.0, 100.0, 30.0);
    let n = to_normalized(&px, ImageSize::new(1000.0, 500.0)).unwrap();
    assert_eq!(n.x(), 0.1);
    assert_eq!(n.y(), 0.1);
    assert_eq!(n.width(), 0.2);
    assert_eq!(n.height(), 0.2);
    assert_eq!(n.rotation(), 30.0);
}

#[test]
fn unknown_size_is_a_noop() {
    let px = PixelRect::new(1.0, 2.0, 3.0, 4.0, 0.0);
    assert!(to_normalized(&px, ImageSize::UNKNOWN).is_none());
    assert!(to_normalized(&px, ImageSize::new(100.0, 0.0)).is_none());
    assert!(to_pixels(&NormalizedRect::DEFAULT, ImageSize::new(0.0, 100.0)).is_none());
}

#[test]
fn pixel_roundtrip_within_one_unit_across_sizes() {
    let sizes = [
        ImageSize::new(1000.0, 1000.0),
        ImageSize::new(613.0, 917.0),
        ImageSize::new(37.5, 1280.25),
        ImageSize::new(4096.0, 3.0),
    ];
    for size in sizes {
        let rects = [
            PixelRect::new(0.0, 0.0, size.width, size.height, 0.0),
            PixelRect::new(size.width / 3.0, size.height / 7.0, size.width / 5.0, size.height / 2.0, 12.5),
            PixelRect::new(size.width - 1.0, size.height - 1.0, 1.0, 1.0, 359.9),
        ];
        for r in rects {
            let n = to_normalized(&r, size).unwrap();
            let back = to_pixels(&n, size).unwrap();
            let (a, b) = (r.rounded(), back.rounded());
            for i in 0..5 {
                assert!((a[i] - b[i]).abs() <= 1, "{r:?} -> {back:?} at {size:?}");
            }
        }
    }
}

#[test]
fn same_fractions_render_at_any_display_size() {
    let n = NormalizedRect::new(0.25, 0.5, 0.5, 0.25, 0.0).unwrap();
    let small = to_pixels(&n, ImageSize::new(400.0, 200.0)).unwrap();
    let large = to_pixels(&n, ImageSize::new(4000.0, 2000.0)).unwrap();
    assert_eq!(small, PixelRect::new(100.0, 100.0, 200.0, 50.0, 0.0));
    assert_eq!(large, PixelRect::new(1000.0, 1000.0, 2000.0, 500.0, 0.0));
    assert_eq!(to_normalized(&small, ImageSize::new(400.0, 200.0)).unwrap(), n);
}

#[test]
fn new_rejects_out_of_range_and_non_finite() {
    assert!(NormalizedRect::new(-0.1, 0.0, 0.5, 0.5, 0.0).is_err());
    assert!(NormalizedRect::new(0.0, 1.5, 0.5, 0.5, 0.0).is_err());
    assert!(NormalizedRect::new(0.0, 0.0, f64::NAN, 0.5, 0.0).is_err());
    assert!(NormalizedRect::new(0.0, 0.0, 0.5, 0.5, f64::INFINITY).is_err());
    assert!(NormalizedRect::new(0.0, 0.0, 1.0, 1.0, 0.0).is_ok());
}

#[test]
fn rotation_is_normalized_into_0_360() {
    assert_eq!(normalize_degrees(0.0), 0.0);
    assert_eq!(normalize_degrees(360.0), 0.0);
    assert_eq!(normalize_degrees(-90.0), 270.0);
    assert_eq!(normalize_degrees(725.0), 5.0);
    assert!(normalize_degrees(-1e-20) < 360.0);

    let r = NormalizedRect::new(0.1, 0.1, 0.1, 0.1, -45.0).unwrap();
    assert_eq!(r.rotation(), 315.0);
}

#[test]
fn full_turns_return_to_original_rotation() {
    for start in [0.0, 17.25, 180.0, 359.5] {
        for turns in 1..=5 {
            let spun = normalize_degrees(start + 360.0 * f64::from(turns));
            assert!((spun - start).abs() < 1e-9, "{start} + {turns} turns -> {spun}");
            let back = normalize_degrees(start - 360.0 * f64::from(turns));
            assert!((back - start).abs() < 1e-9);
        }
    }
}

#[test]
fn wire_layout_roundtrips_through_json() {
    let r = NormalizedRect::new(0.4, 0.4, 0.2, 0.2, 15.0).unwrap();
    let json = serde_json::to_string(&r).unwrap();
    assert_eq!(
        json,
        r#"{"x":0.4,"y":0.4,"width":0.2,"height":0.2,"rotation":15.0}"#
    );
    let back: NormalizedRect = serde_json::from_str(&json).unwrap();
    assert_eq!(back, r);
}

#[test]
fn from_json_defaults_rotation_and_rejects_bad_payloads() {
    let r = NormalizedRect::from_json(r#"{"x":0.1,"y":0.2,"width":0.3,"height":0.4}"#).unwrap();
    assert_eq!(r.rotation(), 0.0);

    let err = NormalizedRect::from_json(r#"{"x":"0.1","y":0.2,"width":0.3,"height":0.4}"#)
        .unwrap_err();
    assert!(err.is_validation());

    let err = NormalizedRect::from_json(r#"{"x":0.1,"y":0.2,"width":0.3}"#).unwrap_err();
    assert!(err.is_validation());

    let err = NormalizedRect::from_json(r#"{"x":2.0,"y":0.2,"width":0.3,"height":0.4}"#)
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn deserialize_enforces_validation() {
    let bad = serde_json::from_str::<NormalizedRect>(
        r#"{"x":0.1,"y":0.2,"width":1.3,"height":0.4,"rotation":0}"#,
    );
    assert!(bad.is_err());
}
