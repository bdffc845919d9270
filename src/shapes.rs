//! Conversion of individual SVG elements into path data.

use crate::config::{EllipseOrigin, LoadOptions};
use crate::document::SvgNode;
use crate::error::{Result, ShapeError};
use crate::geometry::point::Point2;
use crate::path::parser::{leading_number, parse_points};
use crate::path::{PathData, parse_path_data};

/// Outline of a single leaf element, with arcs already expanded.
///
/// Returns `Ok(None)` for tags without geometry. Zero or negative sizes give
/// an empty path rather than an error.
pub fn translate_element<E: SvgNode>(element: &E, options: &LoadOptions) -> Result<Option<PathData>> {
    let tag = element.tag_name();
    let mut path = PathData::new();
    match tag {
        "circle" => {
            let cx = number(element, "cx")?;
            let cy = number(element, "cy")?;
            let r = number(element, "r")?;
            if r > 0.0 {
                path.push_oval(Point2::new(cx, cy), r, r);
            }
        }
        "ellipse" => {
            let cx = number(element, "cx")?;
            let cy = number(element, "cy")?;
            let rx = number(element, "rx")?;
            let ry = number(element, "ry")?;
            if rx > 0.0 && ry > 0.0 {
                let (center, rx, ry) = match options.ellipse_origin {
                    EllipseOrigin::BoundingBoxOrigin => {
                        let (hx, hy) = (rx / 2.0, ry / 2.0);
                        (Point2::new(cx + hx, cy + hy), hx, hy)
                    }
                    EllipseOrigin::Center => (Point2::new(cx, cy), rx, ry),
                };
                path.push_oval(center, rx, ry);
            }
        }
        "rect" => {
            let width = number(element, "width")?;
            let height = number(element, "height")?;
            let x = number(element, "x")?;
            let y = number(element, "y")?;
            if width > 0.0 && height > 0.0 {
                path.push_rect(x, y, width, height);
            }
        }
        "polygon" | "polyline" => {
            let points = element
                .attribute("points")
                .ok_or_else(|| ShapeError::missing(tag, "points"))?;
            path = polygon(points)?;
        }
        "path" => {
            let data = element
                .attribute("d")
                .ok_or_else(|| ShapeError::missing(tag, "d"))?;
            path = parse_path_data(data)?;
        }
        _ => return Ok(None),
    }
    Ok(Some(path.canonicalize()))
}

/// Closed outline through a `points` list. Filling treats an open polyline
/// the same way, so both elements share it.
fn polygon(points: &str) -> Result<PathData> {
    let points = parse_points(points)?;
    let Some((first, rest)) = points.split_first() else {
        return Err(ShapeError::malformed(0, "points list has no coordinates"));
    };
    let mut path = PathData::new();
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    path.close();
    Ok(path)
}

fn number<E: SvgNode>(element: &E, name: &str) -> Result<f64> {
    element
        .attribute(name)
        .and_then(leading_number)
        .ok_or_else(|| ShapeError::missing(element.tag_name(), name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rect::Rect;
    use crate::path::PathCommand;

    fn with_element<T>(xml: &str, f: impl FnOnce(roxmltree::Node) -> T) -> T {
        let doc = roxmltree::Document::parse(xml).unwrap();
        f(doc.root_element())
    }

    fn translate(xml: &str) -> Result<Option<PathData>> {
        with_element(xml, |e| translate_element(&e, &LoadOptions::default()))
    }

    fn bounds(path: &PathData) -> [f64; 4] {
        let rects: Vec<Rect> = path
            .contours()
            .iter()
            .flatten()
            .filter_map(|s| s.bounds())
            .collect();
        let first = rects[0];
        rects.iter().fold(first, |acc, r| acc.union(r)).to_ltrb()
    }

    fn assert_ltrb(actual: [f64; 4], expected: [f64; 4]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn circle_bounds() {
        let path = translate(r#"<circle cx="0" cy="0" r="10"/>"#).unwrap().unwrap();
        assert!(!path.has_arcs());
        assert_ltrb(bounds(&path), [-10., -10., 10., 10.]);
    }

    #[test]
    fn ellipse_origin_modes() {
        let xml = r#"<ellipse cx="10" cy="20" rx="8" ry="4"/>"#;
        let path = translate(xml).unwrap().unwrap();
        assert_ltrb(bounds(&path), [10., 20., 18., 24.]);

        let centered = with_element(xml, |e| {
            let options = LoadOptions::default().with_ellipse_origin(EllipseOrigin::Center);
            translate_element(&e, &options)
        })
        .unwrap()
        .unwrap();
        assert_ltrb(bounds(&centered), [2., 16., 18., 24.]);
    }

    #[test]
    fn rect_corners() {
        let path = translate(r#"<rect x="1" y="2" width="3" height="4"/>"#).unwrap().unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.commands()[2], PathCommand::LineTo(Point2::new(4., 6.)));
        assert_ltrb(bounds(&path), [1., 2., 4., 6.]);
    }

    #[test]
    fn polygon_is_closed() {
        let path = translate(r#"<polygon points="0,0 10,0 10,10"/>"#).unwrap().unwrap();
        assert_eq!(path.commands().last(), Some(&PathCommand::Close));
        assert_eq!(path.contours()[0].len(), 3);
        let polyline = translate(r#"<polyline points="0,0 10,0 10,10"/>"#).unwrap().unwrap();
        assert_eq!(polyline, path);
    }

    #[test]
    fn path_arcs_are_expanded() {
        let path = translate(r#"<path d="M0 0 A5 5 0 0 1 10 0 Z"/>"#).unwrap().unwrap();
        assert!(!path.has_arcs());
    }

    #[test]
    fn missing_and_invalid_attributes() {
        let err = translate(r#"<circle cx="0" cy="0"/>"#).unwrap_err();
        assert!(matches!(err, ShapeError::MissingAttribute { ref name, .. } if name == "r"));
        let err = translate(r#"<rect x="a" y="0" width="1" height="1"/>"#).unwrap_err();
        assert!(matches!(err, ShapeError::MissingAttribute { ref name, .. } if name == "x"));
        let err = translate(r#"<path/>"#).unwrap_err();
        assert!(matches!(err, ShapeError::MissingAttribute { ref element, .. } if element == "path"));
        let err = translate(r#"<polygon points=""/>"#).unwrap_err();
        assert!(matches!(err, ShapeError::MalformedPathSyntax { .. }));
    }

    #[test]
    fn degenerate_sizes_are_empty() {
        let path = translate(r#"<circle cx="0" cy="0" r="0"/>"#).unwrap().unwrap();
        assert!(path.is_empty());
        let path = translate(r#"<rect x="0" y="0" width="-1" height="5"/>"#).unwrap().unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn unknown_tags_have_no_geometry() {
        assert!(translate(r#"<text x="0">hi</text>"#).unwrap().is_none());
        assert!(translate(r#"<line x1="0" y1="0" x2="1" y2="1"/>"#).unwrap().is_none());
    }
}
