//! Elliptical arc to cubic Bézier conversion.

use crate::geometry::point::Point2;
use crate::path::{ArcTo, PathCommand};
use std::f64::consts::PI;

/// Cubic segments emitted per π radians of sweep, rounded up.
pub const ARC_SEGMENTS_PER_PI: f64 = 2.0;

/// Replaces an arc from `start` with line/cubic commands.
///
/// Follows the endpoint-to-center conversion of the SVG implementation notes:
/// radii too small to reach the end point are scaled up, a zero radius turns
/// the arc into a straight line and an arc ending where it starts is dropped.
pub fn arc_to_commands(start: Point2, arc: &ArcTo) -> Vec<PathCommand> {
    let end = arc.end;
    if start == end {
        return Vec::new();
    }
    let mut rx = arc.rx.abs();
    let mut ry = arc.ry.abs();
    if rx == 0.0 || ry == 0.0 {
        return vec![PathCommand::LineTo(end)];
    }

    let phi = arc.rotation.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    let half = (start - end) * 0.5;
    let x1p = cos_phi * half.x + sin_phi * half.y;
    let y1p = -sin_phi * half.x + cos_phi * half.y;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let num = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
    let den = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
    let mut coef = if den > 0.0 { (num / den).max(0.0).sqrt() } else { 0.0 };
    if arc.large_arc == arc.sweep {
        coef = -coef;
    }
    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;

    let mid = (start + end) * 0.5;
    let center = Point2::new(
        cos_phi * cxp - sin_phi * cyp + mid.x,
        sin_phi * cxp + cos_phi * cyp + mid.y,
    );

    let u = Point2::new((x1p - cxp) / rx, (y1p - cyp) / ry);
    let v = Point2::new((-x1p - cxp) / rx, (-y1p - cyp) / ry);
    let theta1 = vector_angle(Point2::new(1.0, 0.0), u);
    let mut dtheta = vector_angle(u, v);
    if !arc.sweep && dtheta > 0.0 {
        dtheta -= 2.0 * PI;
    } else if arc.sweep && dtheta < 0.0 {
        dtheta += 2.0 * PI;
    }

    // The slack keeps exact quarter turns from rounding up to an extra segment.
    let segments = ((dtheta.abs() * ARC_SEGMENTS_PER_PI / PI - 1e-9).ceil() as usize).max(1);
    let delta = dtheta / segments as f64;
    let k = 4.0 / 3.0 * (delta / 4.0).tan();

    let on_ellipse = |a: f64| {
        let (sin_a, cos_a) = a.sin_cos();
        Point2::new(
            center.x + rx * cos_phi * cos_a - ry * sin_phi * sin_a,
            center.y + rx * sin_phi * cos_a + ry * cos_phi * sin_a,
        )
    };
    let tangent = |a: f64| {
        let (sin_a, cos_a) = a.sin_cos();
        Point2::new(
            -rx * cos_phi * sin_a - ry * sin_phi * cos_a,
            -rx * sin_phi * sin_a + ry * cos_phi * cos_a,
        )
    };

    let mut commands = Vec::with_capacity(segments);
    let mut from = start;
    for i in 0..segments {
        let a0 = theta1 + delta * i as f64;
        let a1 = a0 + delta;
        let to = if i + 1 == segments { end } else { on_ellipse(a1) };
        commands.push(PathCommand::CubicTo(
            from + tangent(a0) * k,
            to - tangent(a1) * k,
            to,
        ));
        from = to;
    }
    commands
}

fn vector_angle(u: Point2, v: Point2) -> f64 {
    u.cross(v).atan2(u.dot(v))
}
