use super::*;
use image::Rgba;

fn logo_on_transparent(w: u32, h: u32, content: (u32, u32, u32, u32)) -> RgbaImage {
    let (cx, cy, cw, ch) = content;
    RgbaImage::from_fn(w, h, |x, y| {
        let inside = x >= cx && x < cx + cw && y >= cy && y < cy + ch;
        if inside {
            Rgba([200, 40, 40, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

fn assert_within(spec: &CropSpec, sw: u32, sh: u32) {
    assert!(spec.x >= 0.0 && spec.y >= 0.0, "{spec:?}");
    assert!(spec.x + spec.width <= f64::from(sw) + 1e-9, "{spec:?}");
    assert!(spec.y + spec.height <= f64::from(sh) + 1e-9, "{spec:?}");
}

fn assert_aspect(spec: &CropSpec, tw: u32, th: u32) {
    let want = f64::from(tw) / f64::from(th);
    assert!((spec.width / spec.height - want).abs() < 1e-6, "{spec:?}");
}

#[test]
fn center_crop_is_largest_centered_rectangle() {
    let spec = center_crop_spec(400, 200, 100, 100);
    assert_eq!(
        spec,
        CropSpec {
            x: 100.0,
            y: 0.0,
            width: 200.0,
            height: 200.0
        }
    );

    let tall = center_crop_spec(300, 300, 200, 100);
    assert_eq!(tall.width, 300.0);
    assert_eq!(tall.height, 150.0);
    assert_eq!(tall.y, 75.0);
}

#[test]
fn every_mode_produces_exact_target_dimensions() {
    let img = logo_on_transparent(320, 180, (40, 30, 90, 60));
    for mode in [CropMode::Center, CropMode::Smart, CropMode::Attention] {
        for (tw, th) in [(100, 100), (64, 128), (500, 90)] {
            let opts = CropOptions {
                mode,
                padding: None,
            };
            let (spec, out) = crop_image(&img, tw, th, &opts).unwrap();
            assert_eq!(out.dimensions(), (tw, th), "{mode:?}");
            assert_within(&spec, 320, 180);
            assert_aspect(&spec, tw, th);
        }
    }
}

#[test]
fn smart_crop_centers_on_mask_content() {
    let img = logo_on_transparent(400, 400, (150, 150, 100, 100));
    let opts = CropOptions {
        mode: CropMode::Smart,
        padding: None,
    };
    let (spec, out) = crop_image(&img, 200, 200, &opts).unwrap();
    assert_eq!(out.dimensions(), (200, 200));

    let c = spec.center();
    assert!((150.0..=250.0).contains(&c.x));
    assert!((150.0..=250.0).contains(&c.y));
    assert!(spec.to_box().contains_box(&BoundingBox::new(150.0, 150.0, 100.0, 100.0)));
}

#[test]
fn smart_crop_follows_off_center_content() {
    let img = logo_on_transparent(400, 400, (300, 40, 60, 60));
    let spec = smart_crop_spec(&img, 100, 100, None).unwrap();
    assert!(spec.x > 200.0, "{spec:?}");
    assert!(spec.y < 100.0, "{spec:?}");
    assert_within(&spec, 400, 400);
}

#[test]
fn smart_padding_grows_the_crop() {
    let img = logo_on_transparent(400, 400, (150, 150, 100, 100));
    let tight = smart_crop_spec(&img, 1, 1, None).unwrap();
    let frac = smart_crop_spec(&img, 1, 1, Some(0.05)).unwrap();
    let px = smart_crop_spec(&img, 1, 1, Some(30.0)).unwrap();
    assert!((frac.width - (tight.width + 40.0)).abs() < 1e-9);
    assert!((px.width - (tight.width + 60.0)).abs() < 1e-9);
}

#[test]
fn smart_crop_without_content_falls_back_to_center() {
    let img = RgbaImage::from_pixel(300, 100, Rgba([0, 0, 0, 0]));
    assert!(smart_crop_spec(&img, 50, 50, None).is_err());

    let opts = CropOptions {
        mode: CropMode::Smart,
        padding: None,
    };
    let (spec, out) = crop_image(&img, 50, 50, &opts).unwrap();
    assert_eq!(spec, center_crop_spec(300, 100, 50, 50));
    assert_eq!(out.dimensions(), (50, 50));
}

#[test]
fn attention_moves_toward_texture() {
    let img = RgbaImage::from_fn(400, 200, |x, y| {
        if (330..390).contains(&x) && (130..190).contains(&y) {
            let v = if (x + y) % 2 == 0 { 255 } else { 0 };
            Rgba([v, v, v, 255])
        } else {
            Rgba([128, 128, 128, 255])
        }
    });
    let spec = attention_crop_spec(&img, 100, 100).unwrap();
    assert_eq!(spec.width, 200.0);
    assert_eq!(spec.height, 200.0);
    assert!(spec.x > 150.0, "{spec:?}");
    assert_within(&spec, 400, 200);
}

#[test]
fn attention_on_flat_image_falls_back_to_center() {
    let img = RgbaImage::from_pixel(200, 100, Rgba([90, 90, 90, 255]));
    assert!(attention_crop_spec(&img, 10, 10).is_err());

    let opts = CropOptions {
        mode: CropMode::Attention,
        padding: None,
    };
    let (spec, _) = crop_image(&img, 10, 10, &opts).unwrap();
    assert_eq!(spec, center_crop_spec(200, 100, 10, 10));
}

#[test]
fn same_size_crop_returns_source_unchanged() {
    let img = logo_on_transparent(30, 20, (5, 5, 10, 10));
    let (spec, out) = crop_image(&img, 30, 20, &CropOptions::default()).unwrap();
    assert_eq!(out, img);
    assert_eq!(spec.to_box(), BoundingBox::new(0.0, 0.0, 30.0, 20.0));
}

#[test]
fn zero_target_is_rejected() {
    let img = logo_on_transparent(10, 10, (0, 0, 5, 5));
    assert!(matches!(
        crop_image(&img, 0, 10, &CropOptions::default()),
        Err(LogofitError::InvalidTargetSize { .. })
    ));
}

#[test]
fn mode_names_are_snake_case() {
    let opts: CropOptions = serde_json::from_str(r#"{"mode": "attention"}"#).unwrap();
    assert_eq!(opts.mode, CropMode::Attention);
    assert_eq!(opts.padding, None);
}
