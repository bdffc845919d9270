//! Loads the filled outlines of an SVG document into one shape of closed,
//! non-overlapping contours suitable for signed-distance-field generation.
//!
//! ```no_run
//! use svg_contours::{LoadOptions, load_shape_from_str};
//!
//! let svg = r#"<svg><circle cx="0" cy="0" r="10"/><rect x="0" y="-2" width="20" height="4"/></svg>"#;
//! let shape = load_shape_from_str(svg, &LoadOptions::default())?;
//! print!("{}", shape.description());
//! # Ok::<(), svg_contours::ShapeError>(())
//! ```

pub mod config;
pub mod contour;
pub mod document;
pub mod error;
pub mod geometry;
pub mod path;
pub mod preview;
pub mod resolve;
pub mod shapes;
pub mod walker;

pub use config::{EllipseOrigin, FillRule, LoadOptions, UnknownElementPolicy};
pub use contour::{Contour, ContourBuilder, Shape};
pub use document::SvgNode;
pub use error::{Result, ShapeError};
pub use geometry::point::Point2;
pub use geometry::segment::Segment;
pub use path::{PathCommand, PathData, parse_path_data};
pub use resolve::{GeometryResolver, ResolvedPath, SplitResolver, UnifiedPath};
pub use walker::DocumentWalker;

use tracing::debug;

/// Receives the shape produced by a successful load.
pub trait ShapeSink {
    fn accept(&mut self, shape: Shape);
}

impl ShapeSink for Shape {
    fn accept(&mut self, shape: Shape) {
        *self = shape;
    }
}

impl ShapeSink for Option<Shape> {
    fn accept(&mut self, shape: Shape) {
        *self = Some(shape);
    }
}

/// Walks `root`, unions all outlines, resolves the result and hands the shape
/// to `sink`. On error the sink is left untouched.
pub fn load_shape<E, S>(root: &E, options: &LoadOptions, sink: &mut S) -> Result<()>
where
    E: SvgNode,
    S: ShapeSink + ?Sized,
{
    let resolver = SplitResolver::new(options.fill_rule);
    let unified = DocumentWalker::new(options, &resolver).walk(root)?;
    let resolved = resolver.resolve(unified)?;
    let shape = ContourBuilder::new(options.invert_y).build(&resolved);
    debug!(
        contours = shape.contours.len(),
        edges = shape.edge_count(),
        "shape loaded"
    );
    sink.accept(shape);
    Ok(())
}

/// Parses `xml` and loads its shape.
pub fn load_shape_from_str(xml: &str, options: &LoadOptions) -> Result<Shape> {
    let parsing = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = roxmltree::Document::parse_with_options(xml, parsing)?;
    let mut shape = Shape::default();
    load_shape(&doc.root_element(), options, &mut shape)?;
    Ok(shape)
}
