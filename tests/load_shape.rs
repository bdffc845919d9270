use std::f64::consts::PI;
use svg_contours::path::PathCommand;
use svg_contours::{
    EllipseOrigin, FillRule, GeometryResolver, LoadOptions, PathData, Point2, Shape, ShapeError,
    SplitResolver, UnifiedPath, UnknownElementPolicy, load_shape, load_shape_from_str,
    parse_path_data,
};

const NS: &str = r#"xmlns="http://www.w3.org/2000/svg""#;

fn document(body: &str) -> String {
    format!(r#"<svg {NS} width="100" height="100">{body}</svg>"#)
}

fn source_coords() -> LoadOptions {
    LoadOptions::default().with_invert_y(false)
}

fn load(body: &str) -> Shape {
    load_shape_from_str(&document(body), &source_coords()).unwrap()
}

fn assert_close(actual: [f64; 4], expected: [f64; 4], tol: f64) {
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() <= tol, "{actual:?} != {expected:?}");
    }
}

/// Bounding box of everything usvg draws for the same document.
fn usvg_bounds(svg: &str) -> [f64; 4] {
    let tree = usvg::Tree::from_str(svg, &usvg::Options::default()).unwrap();
    let b = tree.root().bounding_box();
    [b.left() as f64, b.top() as f64, b.right() as f64, b.bottom() as f64]
}

fn positive_contours(shape: &Shape) -> usize {
    shape.contours.iter().filter(|c| c.winding() > 0).count()
}

#[test]
fn circle_bounding_box() {
    let shape = load(r#"<circle cx="0" cy="0" r="10"/>"#);
    assert_eq!(shape.contours.len(), 1);
    assert_close(shape.bounds().unwrap().to_ltrb(), [-10., -10., 10., 10.], 1e-9);
}

#[test]
fn primitive_bounds_match_usvg() {
    let cases = [
        r#"<circle cx="30" cy="40" r="12.5"/>"#,
        r#"<ellipse cx="50" cy="50" rx="20" ry="8"/>"#,
        r#"<rect x="5" y="10" width="30" height="15"/>"#,
        r#"<polygon points="10,10 60,20 30,70"/>"#,
        r#"<path d="M10 10 C 40 -10 60 30 90 10 Q 95 50 50 90 Z"/>"#,
        r#"<path d="M20 50 A30 20 0 1 1 80 50 Z"/>"#,
    ];
    let options = source_coords().with_ellipse_origin(EllipseOrigin::Center);
    for body in cases {
        let svg = document(body);
        let shape = load_shape_from_str(&svg, &options).unwrap();
        let ours = shape.bounds().unwrap().to_ltrb();
        assert_close(ours, usvg_bounds(&svg), 1e-2);
    }
}

#[test]
fn ellipse_defaults_to_bounding_box_origin() {
    let shape = load(r#"<ellipse cx="10" cy="20" rx="8" ry="4"/>"#);
    assert_close(shape.bounds().unwrap().to_ltrb(), [10., 20., 18., 24.], 1e-9);
}

#[test]
fn overlapping_circles_union() {
    let r = 10.0;
    let shape = load(r#"<circle cx="0" cy="0" r="10"/><circle cx="10" cy="0" r="10"/>"#);
    assert_eq!(shape.contours.len(), 1);
    assert_eq!(shape.contours[0].winding(), 1);
    let area = shape.area();
    assert!(area < 2.0 * PI * r * r, "area {area}");
    assert!(area > PI * r * r, "area {area}");
    assert!(shape.validate());
}

#[test]
fn disjoint_shapes_keep_area_in_any_order() {
    let parts = [
        r#"<rect x="0" y="0" width="10" height="10"/>"#,
        r#"<circle cx="30" cy="5" r="5"/>"#,
        r#"<polygon points="50,0 60,0 55,10"/>"#,
    ];
    let singles: f64 = parts.iter().map(|p| load(p).area()).sum();

    let forward = load(&parts.concat());
    let backward = load(&parts.iter().rev().copied().collect::<String>());
    assert!((forward.area() - singles).abs() < 1e-6);
    assert!((backward.area() - singles).abs() < 1e-6);
    assert_eq!(forward.contours.len(), 3);
    assert_eq!(positive_contours(&forward), positive_contours(&backward));
}

#[test]
fn resolving_twice_changes_nothing() {
    let shape = load(
        r#"<circle cx="0" cy="0" r="10"/><rect x="-2" y="-20" width="4" height="40"/><circle cx="0" cy="0" r="4"/>"#,
    );
    let contours: Vec<Vec<_>> = shape.contours.iter().map(|c| c.edges.clone()).collect();
    let again = SplitResolver::default()
        .resolve(UnifiedPath::from_path(PathData::from_contours(&contours), FillRule::NonZero))
        .unwrap();
    let again = svg_contours::ContourBuilder::new(false).build(&again);
    assert_eq!(again.contours.len(), shape.contours.len());
    assert_eq!(again.edge_count(), shape.edge_count());
    assert_eq!(positive_contours(&again), positive_contours(&shape));
    assert!((again.area() - shape.area()).abs() < 1e-6);
}

#[test]
fn enclosed_shape_with_hole() {
    let shape = load(r#"<path d="M0 0 H10 V10 H0 Z M2 2 V8 H8 V2 Z"/>"#);
    assert_eq!(shape.contours.len(), 2);
    let mut windings: Vec<i32> = shape.contours.iter().map(|c| c.winding()).collect();
    windings.sort();
    assert_eq!(windings, vec![-1, 1]);
    assert!((shape.area() - 64.).abs() < 1e-9);
}

#[test]
fn even_odd_rule_cuts_hole_from_same_direction_contours() {
    let body = r#"<path d="M0 0 H10 V10 H0 Z M2 2 H8 V8 H2 Z"/>"#;
    let nonzero = load(body);
    assert_eq!(nonzero.contours.len(), 1);
    let evenodd = load_shape_from_str(
        &document(body),
        &source_coords().with_fill_rule(FillRule::EvenOdd),
    )
    .unwrap();
    assert_eq!(evenodd.contours.len(), 2);
    assert!((evenodd.area() - 64.).abs() < 1e-9);
}

#[test]
fn implicit_lineto_repetition() {
    let path = parse_path_data("M 0 0 L 10,10 20 20 Z").unwrap();
    assert_eq!(
        path.commands(),
        &[
            PathCommand::MoveTo(Point2::new(0., 0.)),
            PathCommand::LineTo(Point2::new(10., 10.)),
            PathCommand::LineTo(Point2::new(20., 20.)),
            PathCommand::Close,
        ]
    );
    let contours = path.contours();
    assert_eq!(contours.len(), 1);
    assert_eq!(contours[0].len(), 3);
}

#[test]
fn truncated_path_is_malformed() {
    let err = load_shape_from_str(&document(r#"<path d="M 0 0 L"/>"#), &source_coords()).unwrap_err();
    assert!(matches!(err, ShapeError::MalformedPathSyntax { .. }), "{err}");
}

#[test]
fn unsupported_command_is_reported() {
    let err = load_shape_from_str(&document(r#"<path d="M 0 0 X 1 1"/>"#), &source_coords()).unwrap_err();
    assert!(matches!(err, ShapeError::UnsupportedCommand { command: 'X', .. }), "{err}");
}

#[test]
fn groups_and_transforms_do_not_change_geometry() {
    let bare = load(r#"<circle cx="20" cy="20" r="5"/>"#);
    let nested = load(r#"<g><g transform="translate(50 50) scale(2)"><circle cx="20" cy="20" r="5"/></g></g>"#);
    assert_eq!(bare, nested);
}

#[test]
fn y_axis_inversion() {
    let svg = document(r#"<rect x="0" y="10" width="5" height="20"/>"#);
    let shape = load_shape_from_str(&svg, &LoadOptions::default()).unwrap();
    assert!(shape.inverse_y_axis);
    assert_close(shape.bounds().unwrap().to_ltrb(), [0., -30., 5., -10.], 1e-9);
    assert!(shape.area() < 0.);
    assert!(shape.description().starts_with("@invert-y\n{ "));
}

#[test]
fn unknown_elements_follow_policy() {
    let svg = document(r#"<text x="0" y="0">label</text><rect x="0" y="0" width="1" height="1"/>"#);
    let shape = load_shape_from_str(&svg, &source_coords()).unwrap();
    assert_eq!(shape.contours.len(), 1);
    let strict = source_coords().with_unknown_elements(UnknownElementPolicy::Fail);
    let err = load_shape_from_str(&svg, &strict).unwrap_err();
    assert!(matches!(err, ShapeError::UnresolvableElement { .. }));
}

#[test]
fn missing_attribute_names_it() {
    let err = load_shape_from_str(&document(r#"<rect x="0" y="0" width="4"/>"#), &source_coords()).unwrap_err();
    match err {
        ShapeError::MissingAttribute { element, name } => {
            assert_eq!(element, "rect");
            assert_eq!(name, "height");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn structure_errors() {
    let err = load_shape_from_str(r#"<html><circle cx="0" cy="0" r="1"/></html>"#, &source_coords()).unwrap_err();
    assert!(matches!(err, ShapeError::DocumentStructureInvalid(_)));
    let err = load_shape_from_str("<svg><circle", &source_coords()).unwrap_err();
    assert!(matches!(err, ShapeError::Xml(_)));
}

#[test]
fn failed_load_leaves_sink_empty() {
    let xml = document(r#"<circle cx="0" cy="0" r="1"/><path d="M0 0 L"/>"#);
    let doc = roxmltree::Document::parse(&xml).unwrap();
    let mut sink: Option<Shape> = None;
    assert!(load_shape(&doc.root_element(), &source_coords(), &mut sink).is_err());
    assert!(sink.is_none());

    let xml = document(r#"<circle cx="0" cy="0" r="1"/>"#);
    let doc = roxmltree::Document::parse(&xml).unwrap();
    load_shape(&doc.root_element(), &source_coords(), &mut sink).unwrap();
    assert_eq!(sink.map(|s| s.contours.len()), Some(1));
}

#[test]
fn degenerate_document_is_empty_shape() {
    let shape = load(r#"<circle cx="0" cy="0" r="0"/><rect x="0" y="0" width="0" height="3"/>"#);
    assert!(shape.is_empty());
    assert!(shape.bounds().is_none());
}

#[test]
fn circle_pairs_union_at_any_spacing() {
    for r in [3.0f64, 6.0, 10.0, 25.0] {
        for k in 1..40 {
            let d = 2.0 * r * k as f64 / 40.0;
            for degrees in [0.0f64, 30.0, 45.0, 90.0] {
                let (sin, cos) = degrees.to_radians().sin_cos();
                let body = format!(
                    r#"<circle cx="0" cy="0" r="{r}"/><circle cx="{}" cy="{}" r="{r}"/>"#,
                    d * cos,
                    d * sin
                );
                let case = format!("r={r} d={d} angle={degrees}");
                let shape = load_shape_from_str(&document(&body), &source_coords())
                    .unwrap_or_else(|e| panic!("{case}: {e}"));
                assert_eq!(shape.contours.len(), 1, "{case}");
                assert_eq!(shape.contours[0].winding(), 1, "{case}");
                assert!(shape.validate(), "{case}");
                let area = shape.area();
                assert!(area > PI * r * r && area < 2.0 * PI * r * r, "{case}: area {area}");
            }
        }
    }
}

#[test]
fn rotated_arc_ellipses_union() {
    let first = load(r#"<path d="M0 0 A20 10 30 1 1 30 10 Z"/>"#);
    let second = load(r#"<path d="M5 0 A20 10 -30 1 1 35 10 Z"/>"#);
    let both = load(r#"<path d="M0 0 A20 10 30 1 1 30 10 Z"/><path d="M5 0 A20 10 -30 1 1 35 10 Z"/>"#);
    assert!(both.validate());
    assert!(!both.is_empty());
    let (a, b) = (first.area().abs(), second.area().abs());
    assert!(both.area() >= a.max(b) - 1e-6, "{} < {}", both.area(), a.max(b));
    assert!(both.area() < a + b, "{} >= {}", both.area(), a + b);
}

#[test]
fn circle_grid_leaves_holes_between_rows() {
    let body: String = (0..3)
        .flat_map(|i| (0..3).map(move |j| format!(r#"<circle cx="{}" cy="{}" r="6"/>"#, 10 * i, 10 * j)))
        .collect();
    let shape = load(&body);
    assert!(shape.validate());
    let outer = shape.contours.iter().filter(|c| c.winding() > 0).count();
    let holes = shape.contours.iter().filter(|c| c.winding() < 0).count();
    assert_eq!((outer, holes), (1, 4));
    assert_close(shape.bounds().unwrap().to_ltrb(), [-6., -6., 26., 26.], 1e-9);
}
