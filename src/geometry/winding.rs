use crate::geometry::point::Point2;
use crate::geometry::segment::Segment;

/// Rule deciding whether a winding number means "inside".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl FillRule {
    pub fn is_inside(&self, winding: i32) -> bool {
        match self {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }
}

/// Winding number of `p` with respect to a set of closed contours.
pub fn winding_number<'a, I>(edges: I, p: Point2) -> i32
where
    I: IntoIterator<Item = &'a Segment>,
{
    edges.into_iter().map(|e| e.winding_contribution(p)).sum()
}

/// Signed area enclosed by a closed chain of edges. Positive when the region
/// lies to the left of the direction of travel.
pub fn signed_area<'a, I>(edges: I) -> f64
where
    I: IntoIterator<Item = &'a Segment>,
{
    edges.into_iter().map(|e| e.signed_area()).sum()
}
