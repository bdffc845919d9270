//! Options controlling one document load.

pub use crate::geometry::winding::FillRule;

/// What to do with an element that has no outline geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum UnknownElementPolicy {
    /// Ignore it and keep walking.
    #[default]
    Skip,
    /// Abort the load with [`ShapeError::UnresolvableElement`](crate::ShapeError::UnresolvableElement).
    Fail,
}

/// How the `cx`/`cy`/`rx`/`ry` attributes of `<ellipse>` are read.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EllipseOrigin {
    /// `(cx, cy)` is the top-left corner of an `rx` × `ry` bounding box.
    #[default]
    BoundingBoxOrigin,
    /// `(cx, cy)` is the center and `rx`, `ry` the radii, as SVG defines it.
    Center,
}

/// Fallback for [`LoadOptions::max_group_depth`].
pub const DEFAULT_MAX_GROUP_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Fill rule of each element's own outline.
    pub fill_rule: FillRule,
    pub unknown_elements: UnknownElementPolicy,
    pub ellipse_origin: EllipseOrigin,
    /// Negate y coordinates so +y points up in the produced shape.
    pub invert_y: bool,
    /// Deepest `<g>` nesting accepted below the root.
    pub max_group_depth: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            fill_rule: FillRule::NonZero,
            unknown_elements: UnknownElementPolicy::Skip,
            ellipse_origin: EllipseOrigin::BoundingBoxOrigin,
            invert_y: true,
            max_group_depth: DEFAULT_MAX_GROUP_DEPTH,
        }
    }
}

impl LoadOptions {
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    pub fn with_unknown_elements(mut self, policy: UnknownElementPolicy) -> Self {
        self.unknown_elements = policy;
        self
    }

    pub fn with_ellipse_origin(mut self, origin: EllipseOrigin) -> Self {
        self.ellipse_origin = origin;
        self
    }

    pub fn with_invert_y(mut self, invert_y: bool) -> Self {
        self.invert_y = invert_y;
        self
    }

    pub fn with_max_group_depth(mut self, depth: usize) -> Self {
        self.max_group_depth = depth;
        self
    }
}
