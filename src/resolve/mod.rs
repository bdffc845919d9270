//! Boolean union of element outlines and resolution of the result into
//! non-overlapping, consistently wound contours.

mod arrange;
pub mod quad_tree;

use crate::error::Result;
use crate::geometry::segment::Segment;
use crate::geometry::winding::FillRule;
use crate::path::PathData;
use arrange::{Operand, normalize_winding, simplify};
use tracing::{debug, trace};

/// Endpoints closer than this fraction of the geometry's extent are merged
/// into one vertex.
pub const ENDPOINT_SNAP_RANGE_PROPORTION: f64 = 1.0 / 16384.0;

/// Union of everything walked so far.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnifiedPath {
    path: PathData,
    fill_rule: FillRule,
}

impl UnifiedPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps path data that is to be read with `fill_rule`.
    pub fn from_path(path: PathData, fill_rule: FillRule) -> Self {
        Self { path, fill_rule }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn path(&self) -> &PathData {
        &self.path
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    pub fn into_path(self) -> PathData {
        self.path
    }
}

/// Closed contours with no crossings, arcs or overlaps. Outer boundaries have
/// positive signed area and holes negative.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedPath {
    path: PathData,
}

impl ResolvedPath {
    pub fn path(&self) -> &PathData {
        &self.path
    }

    pub fn into_path(self) -> PathData {
        self.path
    }

    pub fn contours(&self) -> Vec<Vec<Segment>> {
        self.path.contours()
    }
}

/// The two geometry primitives the loader depends on.
pub trait GeometryResolver {
    /// Area covered by `acc` or by `path`.
    fn union(&self, acc: UnifiedPath, path: PathData) -> Result<UnifiedPath>;

    /// Splits at self-intersections, removes overlaps and gives every contour
    /// the winding matching its nesting.
    fn resolve(&self, path: UnifiedPath) -> Result<ResolvedPath>;
}

/// Resolver that splits edges at their crossings and rebuilds the boundary.
/// Curves stay curves; nothing is flattened.
#[derive(Debug, Clone, Default)]
pub struct SplitResolver {
    fill_rule: FillRule,
}

impl SplitResolver {
    /// `fill_rule` applies to each path handed to [`GeometryResolver::union`].
    pub fn new(fill_rule: FillRule) -> Self {
        Self { fill_rule }
    }
}

impl GeometryResolver for SplitResolver {
    fn union(&self, acc: UnifiedPath, path: PathData) -> Result<UnifiedPath> {
        let incoming = Operand::new(path.canonicalize().contours(), self.fill_rule);
        if incoming.is_empty() {
            return Ok(acc);
        }
        let mut operands = Vec::with_capacity(2);
        if !acc.is_empty() {
            let fill_rule = acc.fill_rule();
            operands.push(Operand::new(acc.into_path().canonicalize().contours(), fill_rule));
        }
        operands.push(incoming);

        let arranged = normalize_winding(simplify(&operands)?);
        debug!(contours = arranged.contours.len(), "union");
        Ok(UnifiedPath::from_path(
            PathData::from_contours(&arranged.contours),
            FillRule::NonZero,
        ))
    }

    fn resolve(&self, path: UnifiedPath) -> Result<ResolvedPath> {
        let fill_rule = path.fill_rule();
        let path = path.into_path().canonicalize();
        trace!(%path, "resolving");
        let arranged = normalize_winding(simplify(&[Operand::new(path.contours(), fill_rule)])?);
        let path = PathData::from_contours(&arranged.contours);
        debug!(contours = arranged.contours.len(), "resolved");
        trace!(%path, "resolved path");
        Ok(ResolvedPath { path })
    }
}
