//! Typed path commands and the path-data mini-language.

pub mod arc;
pub mod parser;

use crate::geometry::point::Point2;
use crate::geometry::segment::Segment;
use std::fmt;

pub use parser::parse_path_data;

/// Elliptical arc parameters, with an absolute end point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcTo {
    pub rx: f64,
    pub ry: f64,
    /// X-axis rotation in degrees.
    pub rotation: f64,
    pub large_arc: bool,
    pub sweep: bool,
    pub end: Point2,
}

/// One drawing command, always in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point2),
    LineTo(Point2),
    /// Control point, end point.
    QuadTo(Point2, Point2),
    /// First control, second control, end point.
    CubicTo(Point2, Point2, Point2),
    ArcTo(ArcTo),
    Close,
}

/// An ordered list of commands describing one or more subpaths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn move_to(&mut self, p: Point2) {
        self.commands.push(PathCommand::MoveTo(p));
    }

    pub fn line_to(&mut self, p: Point2) {
        self.commands.push(PathCommand::LineTo(p));
    }

    pub fn quad_to(&mut self, control: Point2, end: Point2) {
        self.commands.push(PathCommand::QuadTo(control, end));
    }

    pub fn cubic_to(&mut self, c1: Point2, c2: Point2, end: Point2) {
        self.commands.push(PathCommand::CubicTo(c1, c2, end));
    }

    pub fn arc_to(&mut self, arc: ArcTo) {
        self.commands.push(PathCommand::ArcTo(arc));
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    /// Appends the subpaths of `other`.
    pub fn append(&mut self, other: PathData) {
        self.commands.extend(other.commands);
    }

    /// Closed axis-aligned rectangle, corners visited in order
    /// `(x, y) → (x + w, y) → (x + w, y + h) → (x, y + h)`.
    pub fn push_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.move_to(Point2::new(x, y));
        self.line_to(Point2::new(x + width, y));
        self.line_to(Point2::new(x + width, y + height));
        self.line_to(Point2::new(x, y + height));
        self.close();
    }

    /// Closed axis-aligned ellipse made of four quarter arcs, starting at the
    /// rightmost point.
    pub fn push_oval(&mut self, center: Point2, rx: f64, ry: f64) {
        let quarter = |end: Point2| ArcTo {
            rx,
            ry,
            rotation: 0.0,
            large_arc: false,
            sweep: true,
            end,
        };
        let right = Point2::new(center.x + rx, center.y);
        self.move_to(right);
        self.arc_to(quarter(Point2::new(center.x, center.y + ry)));
        self.arc_to(quarter(Point2::new(center.x - rx, center.y)));
        self.arc_to(quarter(Point2::new(center.x, center.y - ry)));
        self.arc_to(quarter(right));
        self.close();
    }

    pub fn has_arcs(&self) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, PathCommand::ArcTo(_)))
    }

    /// Same path with every arc replaced by its cubic approximation.
    pub fn canonicalize(self) -> PathData {
        if !self.has_arcs() {
            return self;
        }
        let mut out = Vec::with_capacity(self.commands.len());
        let mut start = Point2::ZERO;
        let mut curr = Point2::ZERO;
        for command in self.commands {
            match command {
                PathCommand::MoveTo(p) => {
                    start = p;
                    curr = p;
                    out.push(command);
                }
                PathCommand::LineTo(p)
                | PathCommand::QuadTo(_, p)
                | PathCommand::CubicTo(_, _, p) => {
                    curr = p;
                    out.push(command);
                }
                PathCommand::ArcTo(arc) => {
                    out.extend(arc::arc_to_commands(curr, &arc));
                    curr = arc.end;
                }
                PathCommand::Close => {
                    curr = start;
                    out.push(command);
                }
            }
        }
        PathData { commands: out }
    }

    /// Splits the path into closed edge chains, one per subpath.
    ///
    /// A subpath left open is closed with a straight line back to its start.
    /// Subpaths without drawing commands produce nothing.
    pub fn contours(&self) -> Vec<Vec<Segment>> {
        let mut contours = Vec::new();
        let mut current: Vec<Segment> = Vec::new();
        let mut start = Point2::ZERO;
        let mut curr = Point2::ZERO;

        let mut finish = |current: &mut Vec<Segment>, start: Point2, curr: Point2| {
            if current.is_empty() {
                return;
            }
            if curr != start {
                current.push(Segment::line(curr, start));
            }
            contours.push(std::mem::take(current));
        };

        for command in self.commands.iter() {
            match *command {
                PathCommand::MoveTo(p) => {
                    finish(&mut current, start, curr);
                    start = p;
                    curr = p;
                }
                PathCommand::LineTo(p) => {
                    current.push(Segment::line(curr, p));
                    curr = p;
                }
                PathCommand::QuadTo(c, p) => {
                    current.push(Segment::quad(curr, c, p));
                    curr = p;
                }
                PathCommand::CubicTo(c1, c2, p) => {
                    current.push(Segment::cubic(curr, c1, c2, p));
                    curr = p;
                }
                PathCommand::ArcTo(ref arc) => {
                    for expanded in arc::arc_to_commands(curr, arc) {
                        match expanded {
                            PathCommand::LineTo(p) => {
                                current.push(Segment::line(curr, p));
                                curr = p;
                            }
                            PathCommand::CubicTo(c1, c2, p) => {
                                current.push(Segment::cubic(curr, c1, c2, p));
                                curr = p;
                            }
                            _ => {}
                        }
                    }
                    curr = arc.end;
                }
                PathCommand::Close => {
                    finish(&mut current, start, curr);
                    curr = start;
                }
            }
        }
        finish(&mut current, start, curr);
        contours
    }

    /// Path with one closed subpath per edge chain.
    pub fn from_contours(contours: &[Vec<Segment>]) -> PathData {
        let mut path = PathData::new();
        for contour in contours {
            let Some(first) = contour.first() else {
                continue;
            };
            path.move_to(first.start());
            for segment in contour {
                match *segment {
                    Segment::Linear([_, p]) => path.line_to(p),
                    Segment::Quadratic([_, c, p]) => path.quad_to(c, p),
                    Segment::Cubic([_, c1, c2, p]) => path.cubic_to(c1, c2, p),
                }
            }
            path.close();
        }
        path
    }
}

struct Coord(Point2);

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0.x, self.0.y)
    }
}

/// Absolute path-data text, readable by [`parse_path_data`].
impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match *command {
                PathCommand::MoveTo(p) => write!(f, "M{}", Coord(p))?,
                PathCommand::LineTo(p) => write!(f, "L{}", Coord(p))?,
                PathCommand::QuadTo(c, p) => write!(f, "Q{} {}", Coord(c), Coord(p))?,
                PathCommand::CubicTo(c1, c2, p) => {
                    write!(f, "C{} {} {}", Coord(c1), Coord(c2), Coord(p))?
                }
                PathCommand::ArcTo(arc) => write!(
                    f,
                    "A{} {} {} {} {} {}",
                    arc.rx,
                    arc.ry,
                    arc.rotation,
                    arc.large_arc as u8,
                    arc.sweep as u8,
                    Coord(arc.end)
                )?,
                PathCommand::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_subpath_is_closed() {
        let mut path = PathData::new();
        path.move_to(Point2::new(0., 0.));
        path.line_to(Point2::new(4., 0.));
        path.line_to(Point2::new(4., 3.));
        let contours = path.contours();
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 3);
        assert_eq!(contours[0][2], Segment::line(Point2::new(4., 3.), Point2::ZERO));
    }

    #[test]
    fn close_at_start_adds_no_edge() {
        let mut path = PathData::new();
        path.push_rect(0., 0., 2., 2.);
        let contours = path.contours();
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 4);
    }

    #[test]
    fn lone_moveto_yields_nothing() {
        let mut path = PathData::new();
        path.move_to(Point2::new(1., 1.));
        path.move_to(Point2::new(2., 2.));
        path.close();
        assert!(path.contours().is_empty());
    }

    #[test]
    fn oval_canonicalizes_to_four_cubics() {
        let mut path = PathData::new();
        path.push_oval(Point2::new(0., 0.), 10., 5.);
        assert!(path.has_arcs());
        let canonical = path.clone().canonicalize();
        assert!(!canonical.has_arcs());
        let cubics = canonical
            .commands()
            .iter()
            .filter(|c| matches!(c, PathCommand::CubicTo(..)))
            .count();
        assert_eq!(cubics, 4);
        assert_eq!(path.contours(), canonical.contours());
    }

    #[test]
    fn display_round_trips() {
        let mut path = PathData::new();
        path.move_to(Point2::new(0.5, -1.));
        path.quad_to(Point2::new(1., 2.), Point2::new(3., 4.));
        path.cubic_to(Point2::new(5., 6.), Point2::new(7., 8.), Point2::new(9., 1e-7));
        path.arc_to(ArcTo {
            rx: 2.,
            ry: 3.,
            rotation: 30.,
            large_arc: true,
            sweep: false,
            end: Point2::new(-4., 0.),
        });
        path.close();
        let text = path.to_string();
        assert!(text.starts_with("M0.5 -1 Q1 2 3 4 C"));
        assert_eq!(parse_path_data(&text).unwrap(), path);
    }

    #[test]
    fn from_contours_inverts_contours() {
        let mut path = PathData::new();
        path.push_rect(1., 1., 3., 2.);
        let contours = path.contours();
        assert_eq!(PathData::from_contours(&contours).contours(), contours);
    }
}
