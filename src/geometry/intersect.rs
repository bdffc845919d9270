//! Pairwise edge intersection.
//!
//! Lines are intersected analytically. Anything involving a curve is
//! subdivided until both pieces are flat, then the chords are intersected and
//! the parameters mapped back onto the original curves.

use crate::geometry::point::Point2;
use crate::geometry::segment::{SegType, Segment};

const MAX_SUBDIVISION_DEPTH: u32 = 40;
const MAX_SELF_INTERSECTION_DEPTH: u32 = 12;
const MAX_REFINE_STEPS: u32 = 16;
/// Parameter distance below which a refined self-crossing has collapsed onto
/// a single point of the curve.
const MIN_LOOP_SPAN: f64 = 1e-6;

/// A point shared by two edges, at parameter `t` on the first and `u` on the second.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Crossing {
    pub t: f64,
    pub u: f64,
    pub point: Point2,
}

/// The subdivision search ran out of work budget.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BudgetExhausted;

/// Tolerances and work limit for one intersection query.
#[derive(Debug, Clone)]
pub struct IntersectContext {
    /// Distance below which points are considered equal.
    pub tolerance: f64,
    /// Flatness at which curve pieces are replaced by their chords.
    pub flatness: f64,
    budget: usize,
}

impl IntersectContext {
    pub fn new(tolerance: f64, flatness: f64, budget: usize) -> Self {
        Self {
            tolerance,
            flatness,
            budget,
        }
    }

    fn spend(&mut self) -> Result<(), BudgetExhausted> {
        if self.budget == 0 {
            return Err(BudgetExhausted);
        }
        self.budget -= 1;
        Ok(())
    }
}

pub fn intersect(
    a: &Segment,
    b: &Segment,
    ctx: &mut IntersectContext,
) -> Result<Vec<Crossing>, BudgetExhausted> {
    let mut out = Vec::new();
    if a.seg_type() == SegType::Linear && b.seg_type() == SegType::Linear {
        line_line(a.start(), a.end(), b.start(), b.end(), ctx.tolerance, &mut out);
    } else {
        subdivide(a, (0.0, 1.0), b, (0.0, 1.0), 0, ctx, &mut out)?;
        for c in &mut out {
            refine(a, b, c, ctx.tolerance);
        }
    }
    Ok(dedup(out, ctx.tolerance))
}

/// Points where a cubic crosses itself. Lines and quadratics never do.
pub fn self_intersect(
    seg: &Segment,
    ctx: &mut IntersectContext,
) -> Result<Vec<Crossing>, BudgetExhausted> {
    let mut out = Vec::new();
    if seg.seg_type() == SegType::Cubic {
        self_subdivide(seg, (0.0, 1.0), 0, ctx, &mut out)?;
        for c in &mut out {
            let estimate = *c;
            refine(seg, seg, c, ctx.tolerance);
            if c.u - c.t <= MIN_LOOP_SPAN {
                *c = estimate;
            }
        }
    }
    Ok(dedup(out, ctx.tolerance))
}

fn self_subdivide(
    seg: &Segment,
    range: (f64, f64),
    depth: u32,
    ctx: &mut IntersectContext,
    out: &mut Vec<Crossing>,
) -> Result<(), BudgetExhausted> {
    // A curve that turns by less than half a revolution cannot loop onto itself.
    if depth >= MAX_SELF_INTERSECTION_DEPTH || seg.control_turn() < std::f64::consts::PI * 0.99 {
        return Ok(());
    }
    ctx.spend()?;
    let mid = 0.5 * (range.0 + range.1);
    let (left, right) = seg.split(0.5);
    let joint = left.end();
    let mut found = Vec::new();
    subdivide(&left, (range.0, mid), &right, (mid, range.1), 0, ctx, &mut found)?;
    out.extend(
        found
            .into_iter()
            .filter(|c| c.point.distance(joint) > ctx.tolerance && c.t < c.u),
    );
    self_subdivide(&left, (range.0, mid), depth + 1, ctx, out)?;
    self_subdivide(&right, (mid, range.1), depth + 1, ctx, out)
}

fn subdivide(
    a: &Segment,
    ar: (f64, f64),
    b: &Segment,
    br: (f64, f64),
    depth: u32,
    ctx: &mut IntersectContext,
    out: &mut Vec<Crossing>,
) -> Result<(), BudgetExhausted> {
    let (Some(ab), Some(bb)) = (a.control_bounds(), b.control_bounds()) else {
        return Ok(());
    };
    if !ab.outset(ctx.tolerance).overlaps(&bb) {
        return Ok(());
    }
    ctx.spend()?;

    let a_flat = depth >= MAX_SUBDIVISION_DEPTH || a.flatness() <= ctx.flatness;
    let b_flat = depth >= MAX_SUBDIVISION_DEPTH || b.flatness() <= ctx.flatness;
    if a_flat && b_flat {
        let mut chords = Vec::new();
        // Chords stay within `flatness` of their curves, so that is all the
        // slack a chord crossing needs.
        line_line(a.start(), a.end(), b.start(), b.end(), ctx.flatness, &mut chords);
        for c in chords {
            out.push(Crossing {
                t: ar.0 + (ar.1 - ar.0) * c.t,
                u: br.0 + (br.1 - br.0) * c.u,
                point: c.point,
            });
        }
        return Ok(());
    }

    // Split whichever piece is less flat.
    if !a_flat && (b_flat || ab.extent() >= bb.extent()) {
        let (a0, a1) = a.split(0.5);
        let mid = 0.5 * (ar.0 + ar.1);
        subdivide(&a0, (ar.0, mid), b, br, depth + 1, ctx, out)?;
        subdivide(&a1, (mid, ar.1), b, br, depth + 1, ctx, out)
    } else {
        let (b0, b1) = b.split(0.5);
        let mid = 0.5 * (br.0 + br.1);
        subdivide(a, ar, &b0, (br.0, mid), depth + 1, ctx, out)?;
        subdivide(a, ar, &b1, (mid, br.1), depth + 1, ctx, out)
    }
}

/// Intersects segments `a0→a1` and `b0→b1`. Collinear overlaps report the
/// endpoints of each segment that lie on the other.
fn line_line(a0: Point2, a1: Point2, b0: Point2, b1: Point2, tol: f64, out: &mut Vec<Crossing>) {
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let len1 = d1.length();
    let len2 = d2.length();
    if len1 == 0.0 || len2 == 0.0 {
        return;
    }
    let w = b0 - a0;
    let denom = d1.cross(d2);

    if denom.abs() <= 1e-12 * len1 * len2 {
        // Parallel: only collinear overlaps matter.
        if w.cross(d1).abs() / len1 > tol {
            return;
        }
        let on_a = |p: Point2| (p - a0).dot(d1) / (len1 * len1);
        let on_b = |p: Point2| (p - b0).dot(d2) / (len2 * len2);
        let slack_a = tol / len1;
        let slack_b = tol / len2;
        for (p, u) in [(b0, 0.0), (b1, 1.0)] {
            let t = on_a(p);
            if t >= -slack_a && t <= 1.0 + slack_a {
                out.push(Crossing {
                    t: t.clamp(0.0, 1.0),
                    u,
                    point: p,
                });
            }
        }
        for (p, t) in [(a0, 0.0), (a1, 1.0)] {
            let u = on_b(p);
            if u >= -slack_b && u <= 1.0 + slack_b {
                out.push(Crossing {
                    t,
                    u: u.clamp(0.0, 1.0),
                    point: p,
                });
            }
        }
        return;
    }

    let t = w.cross(d2) / denom;
    let u = w.cross(d1) / denom;
    let slack_a = tol / len1;
    let slack_b = tol / len2;
    if t < -slack_a || t > 1.0 + slack_a || u < -slack_b || u > 1.0 + slack_b {
        return;
    }
    let t = t.clamp(0.0, 1.0);
    let u = u.clamp(0.0, 1.0);
    out.push(Crossing {
        t,
        u,
        point: a0 + d1 * t,
    });
}

/// Newton iteration on `a(t) - b(u) = 0`, starting from the chord estimate in
/// `c`. The estimate is kept when the iteration stalls on near-parallel
/// tangents, leaves the parameter range or wanders further than `tol`.
fn refine(a: &Segment, b: &Segment, c: &mut Crossing, tol: f64) {
    let (mut t, mut u) = (c.t, c.u);
    for _ in 0..MAX_REFINE_STEPS {
        let r = a.point(t) - b.point(u);
        let da = a.derivative(t);
        let db = b.derivative(u);
        let det = -da.cross(db);
        if det.abs() <= 1e-12 * da.length() * db.length() {
            return;
        }
        let dt = r.cross(db) / det;
        let du = r.cross(da) / det;
        t += dt;
        u += du;
        if !(-1e-9..=1.0 + 1e-9).contains(&t) || !(-1e-9..=1.0 + 1e-9).contains(&u) {
            return;
        }
        if dt.abs() <= 1e-15 && du.abs() <= 1e-15 {
            break;
        }
    }
    let (t, u) = (t.clamp(0.0, 1.0), u.clamp(0.0, 1.0));
    let point = a.point(t).lerp(b.point(u), 0.5);
    if point.distance(c.point) > tol || a.point(t).distance(b.point(u)) > tol * 1e-3 {
        return;
    }
    *c = Crossing { t, u, point };
}

/// Merges crossings closer than `tol`, which adjacent subdivision pieces report
/// for the same point.
fn dedup(mut crossings: Vec<Crossing>, tol: f64) -> Vec<Crossing> {
    crossings.sort_by(|a, b| a.t.total_cmp(&b.t).then(a.u.total_cmp(&b.u)));
    let mut out: Vec<Crossing> = Vec::with_capacity(crossings.len());
    for c in crossings {
        if out.iter().any(|o| o.point.distance(c.point) <= tol) {
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> IntersectContext {
        IntersectContext::new(1e-9, 1e-10, 1 << 16)
    }

    #[test]
    fn crossing_lines() {
        let a = Segment::line(Point2::new(0., 0.), Point2::new(2., 2.));
        let b = Segment::line(Point2::new(0., 2.), Point2::new(2., 0.));
        let hits = intersect(&a, &b, &mut ctx()).unwrap();
        assert_eq!(hits.len(), 1);
        assert!((hits[0].t - 0.5).abs() < 1e-12);
        assert!((hits[0].u - 0.5).abs() < 1e-12);
        assert!(hits[0].point.distance(Point2::new(1., 1.)) < 1e-12);
    }

    #[test]
    fn disjoint_lines() {
        let a = Segment::line(Point2::new(0., 0.), Point2::new(1., 0.));
        let b = Segment::line(Point2::new(0., 1.), Point2::new(1., 2.));
        assert!(intersect(&a, &b, &mut ctx()).unwrap().is_empty());
    }

    #[test]
    fn collinear_overlap_reports_inner_endpoints() {
        let a = Segment::line(Point2::new(0., 0.), Point2::new(2., 0.));
        let b = Segment::line(Point2::new(1., 0.), Point2::new(3., 0.));
        let hits = intersect(&a, &b, &mut ctx()).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().any(|h| (h.t - 0.5).abs() < 1e-12 && h.u == 0.0));
        assert!(hits.iter().any(|h| h.t == 1.0 && (h.u - 0.5).abs() < 1e-12));
    }

    #[test]
    fn line_through_arch() {
        let arch = Segment::quad(Point2::new(0., 0.), Point2::new(1., 2.), Point2::new(2., 0.));
        let line = Segment::line(Point2::new(-1., 0.5), Point2::new(3., 0.5));
        let hits = intersect(&arch, &line, &mut ctx()).unwrap();
        assert_eq!(hits.len(), 2);
        for h in hits {
            assert!((arch.point(h.t).y - 0.5).abs() < 1e-6);
            assert!(h.point.distance(arch.point(h.t)) < 1e-6);
        }
    }

    #[test]
    fn cubic_loop() {
        let seg = Segment::cubic(
            Point2::new(0., 0.),
            Point2::new(3., 3.),
            Point2::new(-1., 3.),
            Point2::new(2., 0.),
        );
        let hits = self_intersect(&seg, &mut ctx()).unwrap();
        assert_eq!(hits.len(), 1);
        let h = hits[0];
        assert!(h.t < h.u);
        assert!(seg.point(h.t).distance(seg.point(h.u)) < 1e-6);

        let simple = Segment::cubic(
            Point2::new(0., 0.),
            Point2::new(1., 1.),
            Point2::new(2., 1.),
            Point2::new(3., 0.),
        );
        assert!(self_intersect(&simple, &mut ctx()).unwrap().is_empty());
    }

    #[test]
    fn curve_crossings_are_refined_past_chord_accuracy() {
        let a = Segment::cubic(Point2::new(0., 0.), Point2::new(1., 2.), Point2::new(2., 2.), Point2::new(3., 0.));
        let b = Segment::cubic(
            Point2::new(0., 1.5),
            Point2::new(1., -0.5),
            Point2::new(2., -0.5),
            Point2::new(3., 1.5),
        );
        // Coarse flatness leaves chord crossings well off the true curves.
        let mut coarse = IntersectContext::new(1e-2, 1e-3, 1 << 16);
        let hits = intersect(&a, &b, &mut coarse).unwrap();
        assert_eq!(hits.len(), 2);
        for h in &hits {
            assert!(a.point(h.t).distance(b.point(h.u)) < 1e-9);
            assert!(h.point.distance(a.point(h.t)) < 1e-9);
        }
        // Both curves are symmetric about x = 1.5.
        assert!((hits[0].point.x + hits[1].point.x - 3.0).abs() < 1e-9);
        assert!((hits[0].point.y - hits[1].point.y).abs() < 1e-9);
    }

    #[test]
    fn budget_is_enforced() {
        let arch = Segment::quad(Point2::new(0., 0.), Point2::new(1., 2.), Point2::new(2., 0.));
        let mut tiny = IntersectContext::new(1e-9, 1e-10, 2);
        assert_eq!(intersect(&arch, &arch.reversed(), &mut tiny), Err(BudgetExhausted));
    }
}
