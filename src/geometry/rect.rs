use crate::geometry::point::Point2;

/// An axis-aligned bounding box. `top` is the smaller y value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Rect {
    pub fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Option<Self> {
        if left <= right && top <= bottom && (right - left).is_finite() && (bottom - top).is_finite()
        {
            Some(Rect {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }

    /// Smallest rect containing every point, `None` for an empty or non-finite set.
    pub fn from_points<I: IntoIterator<Item = Point2>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Rect::from_ltrb(first.x, first.y, first.x, first.y)?;
        for p in iter {
            rect = rect.include(p)?;
        }
        Some(rect)
    }

    pub fn to_ltrb(&self) -> [f64; 4] {
        [self.left, self.top, self.right, self.bottom]
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn mid_point(&self) -> Point2 {
        Point2::new(
            self.left + self.width() / 2.0,
            self.top + self.height() / 2.0,
        )
    }

    /// Length of the longer side.
    pub fn extent(&self) -> f64 {
        self.width().max(self.height())
    }

    pub fn include(&self, p: Point2) -> Option<Self> {
        Rect::from_ltrb(
            self.left.min(p.x),
            self.top.min(p.y),
            self.right.max(p.x),
            self.bottom.max(p.y),
        )
    }

    pub fn union(&self, other: &Self) -> Self {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Grows every side by `amount`.
    pub fn outset(&self, amount: f64) -> Self {
        Rect {
            left: self.left - amount,
            top: self.top - amount,
            right: self.right + amount,
            bottom: self.bottom + amount,
        }
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted() {
        assert!(Rect::from_ltrb(1., 0., 0., 1.).is_none());
        assert!(Rect::from_ltrb(0., 0., f64::INFINITY, 1.).is_none());
    }

    #[test]
    fn from_points() {
        let r = Rect::from_points([
            Point2::new(2., -1.),
            Point2::new(-3., 4.),
            Point2::new(0., 0.),
        ])
        .unwrap();
        assert_eq!(r.to_ltrb(), [-3., -1., 2., 4.]);
        assert!(Rect::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn overlap_and_union() {
        let a = Rect::from_ltrb(0., 0., 10., 10.).unwrap();
        let b = Rect::from_ltrb(10., 5., 20., 20.).unwrap();
        let c = Rect::from_ltrb(11., 0., 12., 1.).unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert_eq!(a.union(&c).to_ltrb(), [0., 0., 12., 10.]);
    }
}
