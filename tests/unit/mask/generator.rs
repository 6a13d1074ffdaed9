use super::*;
use image::Rgba;

fn square_logo(size: u32, content: (u32, u32, u32, u32)) -> RgbaImage {
    let (cx, cy, cw, ch) = content;
    RgbaImage::from_fn(size, size, |x, y| {
        let inside = x >= cx && x < cx + cw && y >= cy && y < cy + ch;
        Rgba([10, 20, 30, if inside { 255 } else { 0 }])
    })
}

#[test]
fn opaque_image_covers_everything() {
    let img = RgbaImage::from_pixel(16, 9, Rgba([1, 2, 3, 255]));
    let mask = generate_mask(&img, &MaskOptions::default()).unwrap();
    assert!(mask.coverage() > 99.0);
    assert_eq!(mask.bounding_box(), Some(BoundingBox::new(0.0, 0.0, 16.0, 9.0)));
}

#[test]
fn transparent_image_has_no_content() {
    let img = RgbaImage::from_pixel(16, 9, Rgba([1, 2, 3, 0]));
    let mask = generate_mask(&img, &MaskOptions::default()).unwrap();
    assert!(mask.coverage() < 1.0);
    assert_eq!(mask.bounding_box(), None);
}

#[test]
fn content_box_without_edges_is_exact() {
    let img = square_logo(20, (4, 6, 5, 3));
    let opts = MaskOptions {
        edge_detection: false,
        ..MaskOptions::default()
    };
    let mask = generate_mask(&img, &opts).unwrap();
    assert_eq!(mask.bounding_box(), Some(BoundingBox::new(4.0, 6.0, 5.0, 3.0)));
    assert!((mask.coverage() - 15.0 / 400.0 * 100.0).abs() < 1e-9);
}

#[test]
fn edge_detection_thickens_the_outline() {
    let img = square_logo(20, (8, 8, 4, 4));
    let mask = generate_mask(&img, &MaskOptions::default()).unwrap();
    assert_eq!(mask.bounding_box(), Some(BoundingBox::new(7.0, 7.0, 6.0, 6.0)));
    assert_eq!(mask.get(9, 9), 255);
}

#[test]
fn threshold_is_configurable() {
    let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 100]));
    let low = MaskOptions {
        threshold: 50,
        ..MaskOptions::default()
    };
    let high = MaskOptions {
        threshold: 150,
        ..MaskOptions::default()
    };
    assert!(generate_mask(&img, &low).unwrap().coverage() > 99.0);
    assert!(generate_mask(&img, &high).unwrap().coverage() < 1.0);
}

#[test]
fn blur_removes_single_pixel_noise() {
    let mut img = RgbaImage::from_pixel(15, 15, Rgba([0, 0, 0, 0]));
    img.put_pixel(7, 7, Rgba([0, 0, 0, 40]));
    let opts = MaskOptions {
        blur: 2,
        edge_detection: false,
        ..MaskOptions::default()
    };
    assert_eq!(generate_mask(&img, &opts).unwrap().bounding_box(), None);

    let unblurred = MaskOptions {
        edge_detection: false,
        ..MaskOptions::default()
    };
    assert!(generate_mask(&img, &unblurred).unwrap().bounding_box().is_some());
}

#[test]
fn dilate_and_erode_options_apply_in_order() {
    let img = square_logo(20, (8, 8, 3, 3));
    let grown = MaskOptions {
        edge_detection: false,
        dilate: 2,
        ..MaskOptions::default()
    };
    assert_eq!(
        generate_mask(&img, &grown).unwrap().bounding_box(),
        Some(BoundingBox::new(6.0, 6.0, 7.0, 7.0))
    );

    let opened = MaskOptions {
        edge_detection: false,
        dilate: 1,
        erode: 1,
        ..MaskOptions::default()
    };
    assert_eq!(
        generate_mask(&img, &opened).unwrap().bounding_box(),
        Some(BoundingBox::new(8.0, 8.0, 3.0, 3.0))
    );
}

#[test]
fn invert_is_self_inverse() {
    let img = square_logo(12, (2, 3, 4, 5));
    let mask = generate_mask(&img, &MaskOptions::default()).unwrap();
    let inv = mask.invert();
    assert_ne!(inv.data(), mask.data());
    assert_eq!(inv.invert(), mask);

    let binary = Mask::from_raw(2, 2, vec![255, 0, 0, 0]).unwrap();
    assert_eq!(binary.coverage() + binary.invert().coverage(), 100.0);
    assert_eq!(
        binary.invert().bounding_box(),
        Some(BoundingBox::new(0.0, 0.0, 2.0, 2.0))
    );
}

#[test]
fn mask_methods_return_new_masks() {
    let mask = Mask::from_raw(3, 3, vec![0, 0, 0, 0, 255, 0, 0, 0, 0]).unwrap();
    let grown = mask.dilate(1);
    assert!((mask.coverage() - 100.0 / 9.0).abs() < 1e-9);
    assert_eq!(grown.coverage(), 100.0);
    assert_eq!(grown.erode(1).bounding_box(), Some(BoundingBox::new(0.0, 0.0, 3.0, 3.0)));
    assert_eq!(mask.erode(1).bounding_box(), None);
}

#[test]
fn from_raw_validates_length() {
    assert!(Mask::from_raw(2, 2, vec![0; 3]).is_err());
    assert!(Mask::from_raw(0, 2, vec![]).is_err());
}

#[test]
fn apply_mask_is_destination_in() {
    let img = RgbaImage::from_pixel(2, 1, Rgba([50, 60, 70, 200]));
    let mask = Mask::from_raw(2, 1, vec![255, 0]).unwrap();
    let out = apply_mask(&img, &mask).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [50, 60, 70, 200]);
    assert_eq!(out.get_pixel(1, 0).0[3], 0);

    let wrong = Mask::from_raw(1, 1, vec![255]).unwrap();
    assert!(matches!(
        apply_mask(&img, &wrong),
        Err(LogofitError::CompositeDimensionMismatch { .. })
    ));
}

#[test]
fn options_deserialize_with_defaults() {
    let opts: MaskOptions = serde_json::from_str(r#"{"dilate": 3}"#).unwrap();
    assert_eq!(
        opts,
        MaskOptions {
            dilate: 3,
            ..MaskOptions::default()
        }
    );
}
