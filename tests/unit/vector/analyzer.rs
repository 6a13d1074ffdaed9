use super::*;
use crate::foundation::core::{Affine, Point};

fn analyze(svg: &str) -> VectorAnalysis {
    analyze_vector(svg.as_bytes()).unwrap()
}

fn close(a: BoundingBox, b: BoundingBox) {
    assert!(a.approx_eq(&b, 1e-9), "{a:?} != {b:?}");
}

#[test]
fn rect_and_inner_circle_union_to_rect_box() {
    let a = analyze(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200">
             <rect x="50" y="50" width="100" height="100"/>
             <circle cx="100" cy="100" r="30"/>
           </svg>"#,
    );
    assert_eq!(a.canvas_box, BoundingBox::from_size(200.0, 200.0));
    assert_eq!(a.bounding_box(), BoundingBox::new(50.0, 50.0, 100.0, 100.0));
    assert_eq!(a.root.kind, NodeKind::Root);
    assert_eq!(a.root.children.len(), 2);
    assert_eq!(a.root.children[1].kind, NodeKind::Circle);
    assert_eq!(
        a.root.children[1].intrinsic_box,
        Some(BoundingBox::new(70.0, 70.0, 60.0, 60.0))
    );
}

#[test]
fn nested_groups_compose_parent_then_child() {
    let a = analyze(
        r#"<svg viewBox="0 0 500 500">
             <g transform="translate(10,20)">
               <g transform="scale(2)">
                 <rect x="1" y="1" width="5" height="5"/>
               </g>
             </g>
           </svg>"#,
    );
    let rect = &a.root.children[0].children[0].children[0];
    assert_eq!(rect.kind, NodeKind::Rect);
    let expected = Affine::translate((10.0, 20.0)) * Affine::scale(2.0);
    assert_eq!(rect.transform, expected);
    assert_eq!(rect.transform * Point::new(1.0, 1.0), Point::new(12.0, 22.0));
    close(a.bounding_box(), BoundingBox::new(12.0, 22.0, 10.0, 10.0));
}

#[test]
fn element_transform_applies_inside_group_transform() {
    let a = analyze(
        r#"<svg width="100" height="100">
             <g transform="translate(10,20)">
               <rect width="4" height="2" transform="scale(2)"/>
             </g>
           </svg>"#,
    );
    close(a.bounding_box(), BoundingBox::new(10.0, 20.0, 8.0, 4.0));
}

#[test]
fn rotation_about_center_keeps_square_in_place() {
    let a = analyze(
        r#"<svg width="100" height="100">
             <rect x="40" y="40" width="20" height="20" transform="rotate(90, 50, 50)"/>
           </svg>"#,
    );
    close(a.bounding_box(), BoundingBox::new(40.0, 40.0, 20.0, 20.0));

    // Pivoting on the origin instead swings the square to negative x.
    let b = analyze(
        r#"<svg width="100" height="100">
             <rect x="40" y="40" width="20" height="20" transform="rotate(90)"/>
           </svg>"#,
    );
    close(b.bounding_box(), BoundingBox::new(-60.0, 40.0, 20.0, 20.0));
}

#[test]
fn rotated_rect_box_is_axis_aligned_hull() {
    let a = analyze(
        r#"<svg width="100" height="100">
             <rect x="0" y="0" width="10" height="10" transform="rotate(45)"/>
           </svg>"#,
    );
    let d = 10.0 * std::f64::consts::SQRT_2;
    close(a.bounding_box(), BoundingBox::new(-d / 2.0, 0.0, d, d));
}

#[test]
fn child_inside_parent_box_does_not_change_union() {
    let base = analyze(r#"<svg><rect x="0" y="0" width="80" height="40"/></svg>"#);
    let with_child = analyze(
        r#"<svg><rect x="0" y="0" width="80" height="40"/><ellipse cx="40" cy="20" rx="10" ry="5"/></svg>"#,
    );
    assert_eq!(base.bounding_box(), with_child.bounding_box());
}

#[test]
fn path_polygon_and_line_geometry() {
    let a = analyze(
        r#"<svg viewBox="0 0 100 100">
             <path d="M10 10 L30 10 L30 40 Z"/>
             <polygon points="50,50 60,70 40,70"/>
             <line x1="90" y1="5" x2="80" y2="15"/>
           </svg>"#,
    );
    let kids = &a.root.children;
    assert_eq!(kids[0].intrinsic_box, Some(BoundingBox::new(10.0, 10.0, 20.0, 30.0)));
    assert_eq!(kids[1].intrinsic_box, Some(BoundingBox::new(40.0, 50.0, 20.0, 20.0)));
    assert_eq!(kids[2].intrinsic_box, Some(BoundingBox::new(80.0, 5.0, 10.0, 10.0)));
    assert_eq!(a.bounding_box(), BoundingBox::new(10.0, 5.0, 80.0, 65.0));
}

#[test]
fn defs_and_unknown_elements_are_preserved_but_skipped() {
    let a = analyze(
        r#"<svg width="64" height="64">
             <defs><rect x="-500" y="-500" width="10" height="10"/></defs>
             <title>Acme</title>
             <foo:widget xmlns:foo="urn:x" size="huge"/>
             <rect x="8" y="8" width="16" height="16"/>
           </svg>"#,
    );
    let kinds: Vec<_> = a.root.children.iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![NodeKind::Other, NodeKind::Other, NodeKind::Other, NodeKind::Rect]
    );
    assert_eq!(a.root.children[2].name, "widget");
    assert_eq!(a.root.children[2].attr("size"), Some("huge"));
    assert_eq!(a.bounding_box(), BoundingBox::new(8.0, 8.0, 16.0, 16.0));
    assert_eq!(a.node_count(), 6);
}

#[test]
fn text_has_no_intrinsic_geometry() {
    let a = analyze(r#"<svg width="10" height="10"><text x="1" y="2">Hi</text></svg>"#);
    assert_eq!(a.root.children[0].kind, NodeKind::Text);
    assert_eq!(a.content_box, None);
    assert_eq!(a.bounding_box(), a.canvas_box);
}

#[test]
fn canvas_box_sources() {
    let vb = analyze(r#"<svg viewBox="-5 -5 30 20" width="300" height="200"/>"#);
    assert_eq!(vb.canvas_box, BoundingBox::new(-5.0, -5.0, 30.0, 20.0));

    let wh = analyze(r#"<svg width="120px" height="48"/>"#);
    assert_eq!(wh.canvas_box, BoundingBox::from_size(120.0, 48.0));

    let none = analyze(r#"<svg/>"#);
    assert_eq!(none.canvas_box, BoundingBox::from_size(100.0, 100.0));
    assert_eq!(none.content_box, None);

    let pct = analyze(r#"<svg width="100%" height="100%"/>"#);
    assert_eq!(pct.canvas_box, BoundingBox::from_size(100.0, 100.0));
}

#[test]
fn attributes_keep_document_order_and_unescape() {
    let a = analyze(r#"<svg width="10" height="10" data-name="A &amp; B"/>"#);
    let keys: Vec<_> = a.root.attributes.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["width", "height", "data-name"]);
    assert_eq!(a.root.attr("data-name"), Some("A & B"));
}

#[test]
fn malformed_documents_are_rejected() {
    for bad in [
        "",
        "<svg><g></svg>",
        "<svg><rect></g></svg>",
        "<svg><g>",
        r#"<svg><rect x="ten" width="1" height="1"/></svg>"#,
        r#"<svg><circle r="-1"/></svg>"#,
        r#"<svg><path d="M 0 0 Q"/></svg>"#,
        r#"<svg><g transform="rotate(x)"/></svg>"#,
        r#"<svg viewBox="0 0 10"/>"#,
        r#"<html><svg/></html>"#,
        "<svg/><svg/>",
    ] {
        assert!(
            matches!(
                analyze_vector(bad.as_bytes()),
                Err(LogofitError::MalformedDocument(_))
            ),
            "{bad:?} should be malformed"
        );
    }
}

#[test]
fn absolute_units_convert_to_pixels() {
    let a = analyze(r#"<svg width="1in" height="72pt"/>"#);
    close(a.canvas_box, BoundingBox::from_size(96.0, 96.0));
    let mm = analyze(r#"<svg width="25.4mm" height="2.54cm"/>"#);
    close(mm.canvas_box, BoundingBox::from_size(96.0, 96.0));
}

#[test]
fn full_bleed_percentage_background_resolves_against_canvas() {
    let a = analyze(
        r#"<svg viewBox="0 0 200 100">
             <rect width="100%" height="100%"/>
             <circle cx="100" cy="50" r="20"/>
           </svg>"#,
    );
    assert_eq!(
        a.root.children[0].intrinsic_box,
        Some(BoundingBox::new(0.0, 0.0, 200.0, 100.0))
    );
    assert_eq!(a.bounding_box(), BoundingBox::new(0.0, 0.0, 200.0, 100.0));

    let offset = analyze(r#"<svg viewBox="0 0 200 100"><rect x="25%" y="10%" width="50%" height="20"/></svg>"#);
    assert_eq!(offset.bounding_box(), BoundingBox::new(50.0, 10.0, 100.0, 20.0));
}

#[test]
fn font_relative_shapes_are_kept_without_geometry() {
    let a = analyze(
        r#"<svg width="100" height="100">
             <circle cx="50" cy="50" r="2em"/>
             <rect x="10" y="10" width="5" height="5"/>
           </svg>"#,
    );
    assert_eq!(a.root.children.len(), 2);
    assert_eq!(a.root.children[0].kind, NodeKind::Circle);
    assert_eq!(a.root.children[0].intrinsic_box, None);
    assert_eq!(a.bounding_box(), BoundingBox::new(10.0, 10.0, 5.0, 5.0));
}

#[test]
fn nested_svg_places_its_viewbox_in_the_outer_viewport() {
    let a = analyze(
        r#"<svg viewBox="0 0 400 200">
             <svg x="100" y="50" width="100" height="100" viewBox="0 0 10 10">
               <rect x="0" y="0" width="5" height="5"/>
             </svg>
           </svg>"#,
    );
    assert_eq!(a.canvas_box, BoundingBox::new(0.0, 0.0, 400.0, 200.0));
    close(a.bounding_box(), BoundingBox::new(100.0, 50.0, 50.0, 50.0));

    // Percentages inside the inner document use the inner viewBox.
    let pct = analyze(
        r#"<svg viewBox="0 0 400 200">
             <svg x="10" y="20" width="40" height="20">
               <rect width="50%" height="50%"/>
             </svg>
           </svg>"#,
    );
    close(pct.bounding_box(), BoundingBox::new(10.0, 20.0, 20.0, 10.0));
}
