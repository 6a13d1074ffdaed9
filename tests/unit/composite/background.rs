use super::*;

#[test]
fn transparent_and_solid() {
    let clear = render_background(&BackgroundSpec::Transparent, 4, 3).unwrap();
    assert!(clear.pixels().all(|p| p.0 == [0, 0, 0, 0]));

    let solid = render_background(
        &BackgroundSpec::Solid {
            color: Color::rgb(10, 20, 30),
        },
        4,
        3,
    )
    .unwrap();
    assert_eq!(solid.dimensions(), (4, 3));
    assert!(solid.pixels().all(|p| p.0 == [10, 20, 30, 255]));
}

#[test]
fn horizontal_gradient_runs_left_to_right() {
    let spec = BackgroundSpec::LinearGradient {
        from: Color::rgb(0, 0, 0),
        to: Color::rgb(255, 255, 255),
        angle_deg: 0.0,
    };
    let img = render_background(&spec, 100, 10).unwrap();
    let left = img.get_pixel(0, 5).0;
    let right = img.get_pixel(99, 5).0;
    assert!(left[0] < 5, "{left:?}");
    assert!(right[0] > 250, "{right:?}");
    // Constant along each column.
    assert_eq!(img.get_pixel(50, 0), img.get_pixel(50, 9));
    // Monotonic across the row.
    let row: Vec<u8> = (0..100).map(|x| img.get_pixel(x, 5).0[0]).collect();
    assert!(row.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn vertical_gradient_runs_top_to_bottom() {
    let spec = BackgroundSpec::LinearGradient {
        from: Color::rgb(255, 0, 0),
        to: Color::rgb(0, 0, 255),
        angle_deg: 90.0,
    };
    let img = render_background(&spec, 10, 100).unwrap();
    assert!(img.get_pixel(5, 0).0[0] > 250);
    assert!(img.get_pixel(5, 99).0[2] > 250);
}

#[test]
fn zero_size_is_rejected() {
    assert!(matches!(
        render_background(&BackgroundSpec::Transparent, 0, 5),
        Err(LogofitError::InvalidTargetSize { .. })
    ));
}

#[test]
fn spec_deserializes_from_tagged_json() {
    let bg: BackgroundSpec =
        serde_json::from_str(r##"{"type": "solid", "color": "#ff0000"}"##).unwrap();
    assert_eq!(
        bg,
        BackgroundSpec::Solid {
            color: Color::rgb(255, 0, 0)
        }
    );

    let grad: BackgroundSpec = serde_json::from_str(
        r##"{"type": "linear_gradient", "from": "#000", "to": "#fff"}"##,
    )
    .unwrap();
    assert!(matches!(
        grad,
        BackgroundSpec::LinearGradient { angle_deg, .. } if angle_deg == 0.0
    ));
}
