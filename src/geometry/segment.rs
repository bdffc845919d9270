use crate::geometry::point::Point2;
use crate::geometry::rect::Rect;

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum SegType {
    Linear,
    Quadratic,
    Cubic,
}

/// Vertical travel direction of a y-monotone piece.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Direction {
    Up,
    Down,
    Horizontal,
}

impl Direction {
    fn from_dy(dy: f64) -> Self {
        if dy > 0.0 {
            Direction::Up
        } else if dy < 0.0 {
            Direction::Down
        } else {
            Direction::Horizontal
        }
    }

    pub fn to_winding_inc(&self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
            Direction::Horizontal => 0,
        }
    }
}

/// One edge of a contour: a line or a quadratic/cubic Bézier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Linear([Point2; 2]),
    Quadratic([Point2; 3]),
    Cubic([Point2; 4]),
}

// Gauss-Legendre nodes and weights on [0, 1]. Exact up to degree 5.
const GAUSS_NODES: [f64; 3] = [
    0.5 - 0.387_298_334_620_741_7,
    0.5,
    0.5 + 0.387_298_334_620_741_7,
];
const GAUSS_WEIGHTS: [f64; 3] = [5.0 / 18.0, 8.0 / 18.0, 5.0 / 18.0];

impl Segment {
    pub fn line(p0: Point2, p1: Point2) -> Self {
        Segment::Linear([p0, p1])
    }

    pub fn quad(p0: Point2, p1: Point2, p2: Point2) -> Self {
        Segment::Quadratic([p0, p1, p2])
    }

    pub fn cubic(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Segment::Cubic([p0, p1, p2, p3])
    }

    pub fn seg_type(&self) -> SegType {
        match self {
            Segment::Linear(_) => SegType::Linear,
            Segment::Quadratic(_) => SegType::Quadratic,
            Segment::Cubic(_) => SegType::Cubic,
        }
    }

    /// All control points, endpoints included.
    pub fn points(&self) -> &[Point2] {
        match self {
            Segment::Linear(p) => p,
            Segment::Quadratic(p) => p,
            Segment::Cubic(p) => p,
        }
    }

    fn points_mut(&mut self) -> &mut [Point2] {
        match self {
            Segment::Linear(p) => p,
            Segment::Quadratic(p) => p,
            Segment::Cubic(p) => p,
        }
    }

    pub fn start(&self) -> Point2 {
        self.points()[0]
    }

    pub fn end(&self) -> Point2 {
        let points = self.points();
        points[points.len() - 1]
    }

    pub fn is_finite(&self) -> bool {
        self.points().iter().all(|p| p.is_finite())
    }

    /// Applies `f` to every control point.
    pub fn map(&self, f: impl Fn(Point2) -> Point2) -> Self {
        let mut out = *self;
        for p in out.points_mut() {
            *p = f(*p);
        }
        out
    }

    pub fn reversed(&self) -> Self {
        match *self {
            Segment::Linear([a, b]) => Segment::Linear([b, a]),
            Segment::Quadratic([a, b, c]) => Segment::Quadratic([c, b, a]),
            Segment::Cubic([a, b, c, d]) => Segment::Cubic([d, c, b, a]),
        }
    }

    /// Same curve with its endpoints moved, control points untouched.
    pub fn with_endpoints(&self, start: Point2, end: Point2) -> Self {
        let mut out = *self;
        let points = out.points_mut();
        let last = points.len() - 1;
        points[0] = start;
        points[last] = end;
        out
    }

    pub fn point(&self, t: f64) -> Point2 {
        if t <= 0.0 {
            return self.start();
        }
        if t >= 1.0 {
            return self.end();
        }
        match *self {
            Segment::Linear([a, b]) => a.lerp(b, t),
            Segment::Quadratic([a, b, c]) => a.lerp(b, t).lerp(b.lerp(c, t), t),
            Segment::Cubic([a, b, c, d]) => {
                let ab = a.lerp(b, t);
                let bc = b.lerp(c, t);
                let cd = c.lerp(d, t);
                ab.lerp(bc, t).lerp(bc.lerp(cd, t), t)
            }
        }
    }

    pub fn derivative(&self, t: f64) -> Point2 {
        match *self {
            Segment::Linear([a, b]) => b - a,
            Segment::Quadratic([a, b, c]) => ((b - a) * (1.0 - t) + (c - b) * t) * 2.0,
            Segment::Cubic([a, b, c, d]) => {
                let mt = 1.0 - t;
                ((b - a) * (mt * mt) + (c - b) * (2.0 * t * mt) + (d - c) * (t * t)) * 3.0
            }
        }
    }

    /// Unit tangent at `t`, falling back to neighbouring control points where the
    /// derivative vanishes (coincident control points).
    pub fn tangent(&self, t: f64) -> Option<Point2> {
        if let Some(d) = self.derivative(t).normalize() {
            return Some(d);
        }
        let points = self.points();
        let last = points.len() - 1;
        if t < 0.5 {
            points[1..]
                .iter()
                .find_map(|p| (*p - points[0]).normalize())
        } else {
            points[..last]
                .iter()
                .rev()
                .find_map(|p| (points[last] - *p).normalize())
        }
    }

    /// Splits at `t` by de Casteljau subdivision.
    pub fn split(&self, t: f64) -> (Segment, Segment) {
        match *self {
            Segment::Linear([a, b]) => {
                let m = a.lerp(b, t);
                (Segment::Linear([a, m]), Segment::Linear([m, b]))
            }
            Segment::Quadratic([a, b, c]) => {
                let ab = a.lerp(b, t);
                let bc = b.lerp(c, t);
                let m = ab.lerp(bc, t);
                (Segment::Quadratic([a, ab, m]), Segment::Quadratic([m, bc, c]))
            }
            Segment::Cubic([a, b, c, d]) => {
                let ab = a.lerp(b, t);
                let bc = b.lerp(c, t);
                let cd = c.lerp(d, t);
                let abc = ab.lerp(bc, t);
                let bcd = bc.lerp(cd, t);
                let m = abc.lerp(bcd, t);
                (
                    Segment::Cubic([a, ab, abc, m]),
                    Segment::Cubic([m, bcd, cd, d]),
                )
            }
        }
    }

    /// The part of the curve between parameters `t0 < t1`.
    pub fn subsegment(&self, t0: f64, t1: f64) -> Segment {
        let tail = if t0 <= 0.0 { *self } else { self.split(t0).1 };
        if t1 >= 1.0 {
            return tail;
        }
        let local = if t0 <= 0.0 { t1 } else { (t1 - t0) / (1.0 - t0) };
        tail.split(local).0
    }

    /// Bounding box of the control polygon; contains the curve.
    pub fn control_bounds(&self) -> Option<Rect> {
        Rect::from_points(self.points().iter().copied())
    }

    /// Tight bounding box of the curve itself.
    pub fn bounds(&self) -> Option<Rect> {
        let mut rect = Rect::from_points([self.start(), self.end()])?;
        for t in self.extrema_params(|p| p.x).chain(self.extrema_params(|p| p.y)) {
            rect = rect.include(self.point(t))?;
        }
        Some(rect)
    }

    /// Parameters in (0, 1) where the selected coordinate has a local extremum.
    fn extrema_params(&self, axis: impl Fn(Point2) -> f64) -> impl Iterator<Item = f64> {
        let roots = match *self {
            Segment::Linear(_) => Vec::new(),
            Segment::Quadratic([a, b, c]) => {
                let (a, b, c) = (axis(a), axis(b), axis(c));
                let den = a - 2.0 * b + c;
                if den != 0.0 { vec![(a - b) / den] } else { Vec::new() }
            }
            Segment::Cubic([a, b, c, d]) => {
                let (a, b, c, d) = (axis(a), axis(b), axis(c), axis(d));
                quadratic_roots(-a + 3.0 * b - 3.0 * c + d, 2.0 * (a - 2.0 * b + c), b - a)
            }
        };
        roots.into_iter().filter(|t| *t > 0.0 && *t < 1.0)
    }

    /// Splits the parameter range into pieces that are monotone in y.
    pub fn y_monotone_ranges(&self) -> Vec<(f64, f64)> {
        let mut cuts: Vec<f64> = self.extrema_params(|p| p.y).collect();
        cuts.sort_by(f64::total_cmp);
        let mut ranges = Vec::with_capacity(cuts.len() + 1);
        let mut prev = 0.0;
        for t in cuts {
            if t > prev {
                ranges.push((prev, t));
                prev = t;
            }
        }
        ranges.push((prev, 1.0));
        ranges
    }

    /// Maximum distance of the inner control points from the chord.
    pub fn flatness(&self) -> f64 {
        let points = self.points();
        let (a, b) = (self.start(), self.end());
        let chord = b - a;
        let len = chord.length();
        points[1..points.len() - 1]
            .iter()
            .map(|p| {
                if len > 0.0 {
                    (*p - a).cross(chord).abs() / len
                } else {
                    p.distance(a)
                }
            })
            .fold(0.0, f64::max)
    }

    /// Sum of absolute turning angles along the control polygon.
    pub fn control_turn(&self) -> f64 {
        let points = self.points();
        let legs: Vec<Point2> = points
            .windows(2)
            .filter_map(|w| (w[1] - w[0]).normalize())
            .collect();
        legs.windows(2)
            .map(|w| w[0].cross(w[1]).atan2(w[0].dot(w[1])).abs())
            .sum()
    }

    /// This edge's term of the shoelace integral `½∮(x dy − y dx)`.
    pub fn signed_area(&self) -> f64 {
        match *self {
            Segment::Linear([a, b]) => 0.5 * a.cross(b),
            _ => {
                let mut sum = 0.0;
                for (t, w) in GAUSS_NODES.iter().zip(GAUSS_WEIGHTS) {
                    let p = self.point(*t);
                    let d = self.derivative(*t);
                    sum += w * p.cross(d);
                }
                0.5 * sum
            }
        }
    }

    /// Signed crossings of the ray from `p` towards +x.
    ///
    /// Upward crossings count +1, downward −1. Each y-monotone piece is treated
    /// as half-open in y so that shared endpoints are never counted twice.
    pub fn winding_contribution(&self, p: Point2) -> i32 {
        if let Segment::Linear([a, b]) = *self {
            return line_crossing(a, b, p);
        }
        let Some(hull) = self.control_bounds() else {
            return 0;
        };
        if p.y < hull.top() || p.y > hull.bottom() || p.x >= hull.right() {
            return 0;
        }
        let mut winding = 0;
        for (t0, t1) in self.y_monotone_ranges() {
            let a = self.point(t0);
            let b = self.point(t1);
            let dir = Direction::from_dy(b.y - a.y);
            let (lo, hi) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
            if dir == Direction::Horizontal || p.y < lo || p.y >= hi {
                continue;
            }
            if hull.left() > p.x {
                winding += dir.to_winding_inc();
                continue;
            }
            let t = self.solve_y(t0, t1, p.y);
            if self.point(t).x > p.x {
                winding += dir.to_winding_inc();
            }
        }
        winding
    }

    /// Bisection for `y(t) = y` on a y-monotone range.
    fn solve_y(&self, mut lo: f64, mut hi: f64, y: f64) -> f64 {
        let rising = self.point(hi).y > self.point(lo).y;
        for _ in 0..64 {
            let mid = 0.5 * (lo + hi);
            if mid <= lo || mid >= hi {
                break;
            }
            let below = self.point(mid).y < y;
            if below == rising {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }

    /// True when both segments have the same control points within `tol`, in
    /// either direction.
    pub fn coincides_with(&self, other: &Segment, tol: f64) -> bool {
        if self.seg_type() != other.seg_type() {
            return false;
        }
        let same = |a: &[Point2], b: &[Point2]| a.iter().zip(b).all(|(p, q)| p.distance(*q) <= tol);
        same(self.points(), other.points()) || same(self.reversed().points(), other.points())
    }
}

/// Signed crossing of a line with the +x ray from `p`, half-open in y.
fn line_crossing(a: Point2, b: Point2, p: Point2) -> i32 {
    let dir = Direction::from_dy(b.y - a.y);
    let crosses = match dir {
        Direction::Up => a.y <= p.y && p.y < b.y,
        Direction::Down => b.y <= p.y && p.y < a.y,
        Direction::Horizontal => false,
    };
    if !crosses {
        return 0;
    }
    let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
    if x > p.x { dir.to_winding_inc() } else { 0 }
}

/// Real roots of `a t² + b t + c = 0`, degrading to the linear case.
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    let scale = a.abs().max(b.abs()).max(c.abs());
    if scale == 0.0 {
        return Vec::new();
    }
    if a.abs() <= scale * 1e-12 {
        return if b != 0.0 { vec![-c / b] } else { Vec::new() };
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let sq = disc.sqrt();
    // Numerically stable form.
    let q = -0.5 * (b + b.signum() * sq);
    if q == 0.0 {
        return vec![0.0];
    }
    vec![q / a, c / q]
}
