//! Planar primitives shared by the parser, resolver and contour builder.

pub mod intersect;
pub mod point;
pub mod rect;
pub mod segment;
pub mod winding;
