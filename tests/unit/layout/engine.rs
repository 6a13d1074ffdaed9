use super::*;

fn square() -> BoundingBox {
    BoundingBox::new(0.0, 0.0, 100.0, 100.0)
}

fn opts(alignment: Alignment, fill_mode: FillMode) -> LayoutOptions {
    LayoutOptions {
        alignment,
        fill_mode,
        margins: None,
    }
}

#[test]
fn wide_banner_contain_fits_height() {
    let calc = compute_layout_for_box(
        &square(),
        Margins::default(),
        1600,
        400,
        &LayoutOptions::default(),
    )
    .unwrap();
    assert_eq!((calc.logo_width, calc.logo_height), (320, 320));
    assert_eq!((calc.logo_x, calc.logo_y), (640, 40));
    assert_eq!((calc.usable_width, calc.usable_height), (1280, 320));
    assert_eq!(calc.margin_left, 160);
    assert_eq!(calc.margin_top, 40);
    assert!((calc.scale - 3.2).abs() < 1e-12);
    // Centered horizontally.
    assert_eq!(calc.logo_x as u32 * 2 + calc.logo_width, 1600);
}

#[test]
fn contain_never_exceeds_usable_area() {
    let logos = [
        BoundingBox::new(0.0, 0.0, 100.0, 100.0),
        BoundingBox::new(3.0, 7.0, 1000.0, 13.0),
        BoundingBox::new(0.0, 0.0, 17.0, 900.0),
        BoundingBox::new(-5.0, -5.0, 33.3, 66.7),
    ];
    let canvases = [(1, 1), (7, 1000), (1080, 1080), (1500, 500), (333, 777)];
    for logo in &logos {
        for &(w, h) in &canvases {
            let calc =
                compute_layout_for_box(logo, Margins::uniform(0.15), w, h, &LayoutOptions::default())
                    .unwrap();
            assert!(calc.logo_width <= calc.usable_width, "{logo:?} {w}x{h} {calc:?}");
            assert!(calc.logo_height <= calc.usable_height, "{logo:?} {w}x{h} {calc:?}");
            assert!(calc.logo_x >= 0 && calc.logo_y >= 0);
            assert!(calc.logo_x as u32 + calc.logo_width <= w);
            assert!(calc.logo_y as u32 + calc.logo_height <= h);
        }
    }
}

#[test]
fn compass_alignments_pin_edges() {
    let wide = BoundingBox::new(0.0, 0.0, 200.0, 100.0);
    let m = Margins::uniform(0.1);

    let nw = compute_layout_for_box(&wide, m, 1000, 1000, &opts(Alignment::NorthWest, FillMode::Contain))
        .unwrap();
    assert_eq!((nw.logo_x, nw.logo_y), (100, 100));
    assert_eq!((nw.logo_width, nw.logo_height), (800, 400));

    let s = compute_layout_for_box(&wide, m, 1000, 1000, &opts(Alignment::South, FillMode::Contain))
        .unwrap();
    assert_eq!((s.logo_x, s.logo_y), (100, 500));

    let e = compute_layout_for_box(&wide, m, 1000, 1000, &opts(Alignment::East, FillMode::Contain))
        .unwrap();
    assert_eq!((e.logo_x, e.logo_y), (100, 300));

    let tall = BoundingBox::new(0.0, 0.0, 100.0, 200.0);
    let se = compute_layout_for_box(&tall, m, 1000, 1000, &opts(Alignment::SouthEast, FillMode::Contain))
        .unwrap();
    assert_eq!((se.logo_x, se.logo_y), (500, 100));
}

#[test]
fn cover_fills_usable_area_and_may_overflow() {
    let calc = compute_layout_for_box(
        &square(),
        Margins::zero(),
        400,
        200,
        &opts(Alignment::Center, FillMode::Cover),
    )
    .unwrap();
    assert_eq!((calc.logo_width, calc.logo_height), (400, 400));
    assert_eq!((calc.logo_x, calc.logo_y), (0, -100));
}

#[test]
fn stretch_matches_usable_area() {
    let calc = compute_layout_for_box(
        &square(),
        Margins::uniform(0.1),
        500,
        300,
        &opts(Alignment::NorthEast, FillMode::Stretch),
    )
    .unwrap();
    assert_eq!((calc.logo_width, calc.logo_height), (400, 240));
    assert_eq!((calc.logo_x, calc.logo_y), (50, 30));
}

#[test]
fn explicit_margins_override_safe_margins() {
    let o = LayoutOptions {
        margins: Some(Margins::zero()),
        ..LayoutOptions::default()
    };
    let calc = compute_layout_for_box(&square(), Margins::uniform(0.15), 300, 300, &o).unwrap();
    assert_eq!((calc.logo_width, calc.logo_x), (300, 0));
}

#[test]
fn rounding_happens_once() {
    // 1/3 margins on a 100 px canvas would drift if each step rounded.
    let o = LayoutOptions {
        margins: Some(Margins::uniform(1.0 / 3.0)),
        ..LayoutOptions::default()
    };
    let calc = compute_layout_for_box(&square(), Margins::default(), 100, 100, &o).unwrap();
    assert_eq!(calc.logo_width, 33);
    assert_eq!(calc.logo_x, 33);
}

#[test]
fn degenerate_logo_is_treated_as_square() {
    let line = BoundingBox::new(0.0, 0.0, 50.0, 0.0);
    let calc = compute_layout_for_box(&line, Margins::zero(), 200, 100, &LayoutOptions::default())
        .unwrap();
    assert_eq!((calc.logo_width, calc.logo_height), (100, 100));
}

#[test]
fn zero_canvas_is_rejected() {
    let err = compute_layout_for_box(&square(), Margins::default(), 0, 100, &LayoutOptions::default())
        .unwrap_err();
    assert!(matches!(err, LogofitError::InvalidTargetSize { width: 0, height: 100 }));
}

#[test]
fn options_parse_from_snake_case() {
    let o: LayoutOptions =
        serde_json::from_str(r#"{"alignment": "south_west", "fill_mode": "cover"}"#).unwrap();
    assert_eq!(o.alignment, Alignment::SouthWest);
    assert_eq!(o.fill_mode, FillMode::Cover);
    assert_eq!(o.margins, None);
}
