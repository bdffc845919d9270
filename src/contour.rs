//! Final shape representation handed to distance-field generation.

use crate::geometry::point::Point2;
use crate::geometry::rect::Rect;
use crate::geometry::segment::Segment;
use crate::geometry::winding::{signed_area, winding_number};
use crate::resolve::ResolvedPath;
use std::fmt::{self, Write};

/// Gap allowed between one edge's end and the next edge's start.
const CONNECT_TOLERANCE: f64 = 1e-9;

/// One closed boundary loop.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    pub edges: Vec<Segment>,
}

impl Contour {
    pub fn new(edges: Vec<Segment>) -> Self {
        Self { edges }
    }

    /// Signed enclosed area, positive when the inside is on the left.
    pub fn area(&self) -> f64 {
        signed_area(&self.edges)
    }

    /// `1` for counter-clockwise (in y-up terms), `-1` for clockwise, `0` when
    /// the contour encloses nothing.
    pub fn winding(&self) -> i32 {
        let area = self.area();
        if area > 0.0 {
            1
        } else if area < 0.0 {
            -1
        } else {
            0
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.edges
            .iter()
            .filter_map(|e| e.bounds())
            .reduce(|a, b| a.union(&b))
    }

    /// Each edge starts where the previous one ends, and the last returns to
    /// the first.
    pub fn is_closed(&self) -> bool {
        let Some(last) = self.edges.last() else {
            return false;
        };
        let mut prev = last.end();
        self.edges.iter().all(|e| {
            let connected = e.start().distance(prev) <= CONNECT_TOLERANCE;
            prev = e.end();
            connected
        })
    }
}

/// Contours of one document plus the axis convention they are expressed in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    pub contours: Vec<Contour>,
    /// Y coordinates were negated relative to the source document.
    pub inverse_y_axis: bool,
}

impl Shape {
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.contours.iter().map(|c| c.edges.len()).sum()
    }

    /// Sum of the contours' signed areas.
    pub fn area(&self) -> f64 {
        self.contours.iter().map(Contour::area).sum()
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.contours
            .iter()
            .filter_map(Contour::bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Nonzero winding number of `p` over all contours.
    pub fn winding_at(&self, p: Point2) -> i32 {
        winding_number(self.contours.iter().flat_map(|c| c.edges.iter()), p)
    }

    /// Every contour is non-empty, closed and connected, with finite points.
    pub fn validate(&self) -> bool {
        self.contours
            .iter()
            .all(|c| c.is_closed() && c.edges.iter().all(Segment::is_finite))
    }

    /// Text form understood by distance-field generators:
    ///
    /// ```text
    /// @invert-y
    /// { 0, 0; 10, 0; (12, 5); 10, 10; # }
    /// ```
    ///
    /// Points are separated by `;`, control points sit in parentheses and `#`
    /// closes the contour back to its first point.
    pub fn description(&self) -> String {
        let mut out = String::new();
        // Writing to a String never fails.
        let _ = self.write_description(&mut out);
        out
    }

    fn write_description(&self, out: &mut impl Write) -> fmt::Result {
        if self.inverse_y_axis {
            writeln!(out, "@invert-y")?;
        }
        for contour in &self.contours {
            out.write_str("{ ")?;
            for edge in &contour.edges {
                let p = edge.start();
                write!(out, "{}, {}; ", p.x, p.y)?;
                match *edge {
                    Segment::Linear(_) => {}
                    Segment::Quadratic([_, c, _]) => write!(out, "({}, {}); ", c.x, c.y)?,
                    Segment::Cubic([_, c1, c2, _]) => {
                        write!(out, "({}, {}; {}, {}); ", c1.x, c1.y, c2.x, c2.y)?
                    }
                }
            }
            writeln!(out, "# }}")?;
        }
        Ok(())
    }
}

/// Turns resolved path data into a [`Shape`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ContourBuilder {
    invert_y: bool,
}

impl ContourBuilder {
    pub fn new(invert_y: bool) -> Self {
        Self { invert_y }
    }

    /// One contour per subpath; open subpaths are closed with a line.
    pub fn build(&self, resolved: &ResolvedPath) -> Shape {
        let flip = |p: Point2| Point2::new(p.x, -p.y);
        let contours = resolved
            .contours()
            .into_iter()
            .map(|edges| {
                if self.invert_y {
                    Contour::new(edges.iter().map(|e| e.map(flip)).collect())
                } else {
                    Contour::new(edges)
                }
            })
            .collect();
        Shape {
            contours,
            inverse_y_axis: self.invert_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::winding::FillRule;
    use crate::path::parse_path_data;
    use crate::resolve::{GeometryResolver, SplitResolver, UnifiedPath};

    fn resolved(d: &str) -> ResolvedPath {
        let path = parse_path_data(d).unwrap();
        SplitResolver::default()
            .resolve(UnifiedPath::from_path(path, FillRule::NonZero))
            .unwrap()
    }

    #[test]
    fn builds_contours_without_inversion() {
        let shape = ContourBuilder::new(false).build(&resolved("M0 0 H10 V10 H0 Z M2 2 V8 H8 V2 Z"));
        assert!(!shape.inverse_y_axis);
        assert_eq!(shape.contours.len(), 2);
        assert_eq!(shape.edge_count(), 8);
        assert!(shape.validate());
        assert!((shape.area() - 64.).abs() < 1e-9);
        let mut windings: Vec<i32> = shape.contours.iter().map(Contour::winding).collect();
        windings.sort();
        assert_eq!(windings, vec![-1, 1]);
        assert_eq!(shape.bounds().unwrap().to_ltrb(), [0., 0., 10., 10.]);
        assert_eq!(shape.winding_at(Point2::new(1., 1.)), shape.winding_at(Point2::new(9., 9.)));
        assert_eq!(shape.winding_at(Point2::new(5., 5.)), 0);
    }

    #[test]
    fn inversion_negates_y_and_flips_area() {
        let path = resolved("M0 0 H10 V4 H0 Z");
        let plain = ContourBuilder::new(false).build(&path);
        let flipped = ContourBuilder::new(true).build(&path);
        assert!(flipped.inverse_y_axis);
        assert_eq!(flipped.bounds().unwrap().to_ltrb(), [0., -4., 10., 0.]);
        assert!((plain.area() + flipped.area()).abs() < 1e-9);
        assert!(flipped.area() < 0.);
    }

    #[test]
    fn quadratic_edges_keep_their_type() {
        let shape = ContourBuilder::new(false).build(&resolved("M0 0 Q5 10 10 0 Z"));
        assert_eq!(shape.contours.len(), 1);
        let edges = &shape.contours[0].edges;
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().any(|e| matches!(e, Segment::Quadratic(_))));
    }

    #[test]
    fn open_contour_is_not_valid() {
        let shape = Shape {
            contours: vec![Contour::new(vec![Segment::line(Point2::ZERO, Point2::new(1., 0.))])],
            inverse_y_axis: false,
        };
        assert!(!shape.validate());
        assert!(!Contour::default().is_closed());
    }

    #[test]
    fn description_text() {
        let contour = Contour::new(vec![
            Segment::line(Point2::new(0., 0.), Point2::new(10., 0.)),
            Segment::quad(Point2::new(10., 0.), Point2::new(12., 5.), Point2::new(10., 10.)),
            Segment::cubic(
                Point2::new(10., 10.),
                Point2::new(5., 12.),
                Point2::new(2., 12.),
                Point2::new(0., 0.),
            ),
        ]);
        let shape = Shape {
            contours: vec![contour],
            inverse_y_axis: true,
        };
        assert_eq!(
            shape.description(),
            "@invert-y\n{ 0, 0; 10, 0; (12, 5); 10, 10; (5, 12; 2, 12); # }\n"
        );
        assert_eq!(Shape::default().description(), "");
    }
}
