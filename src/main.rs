//! svg-contours CLI
//!
//! Loads an SVG document, resolves its outlines and prints the result.

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use svg_contours::preview::{rasterize, save_png};
use svg_contours::{EllipseOrigin, FillRule, LoadOptions, Shape, UnknownElementPolicy, load_shape_from_str};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "svg-contours")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve SVG outlines into contours for distance-field generation", long_about = None)]
struct Cli {
    /// Input SVG document
    input: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// What to print to stdout
    #[arg(short, long, value_enum, default_value_t = Emit::Description)]
    emit: Emit,

    /// Fill rule applied to each element's own outline
    #[arg(long, value_enum, default_value_t = FillArg::Nonzero)]
    fill_rule: FillArg,

    /// Fail on elements without outline geometry instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Read ellipse cx/cy as the center rather than the bounding box origin
    #[arg(long)]
    ellipse_center: bool,

    /// Keep the document's y-down axis
    #[arg(long)]
    no_invert_y: bool,

    /// Deepest accepted <g> nesting
    #[arg(long, default_value_t = svg_contours::config::DEFAULT_MAX_GROUP_DEPTH)]
    max_group_depth: usize,

    /// Write a PNG rendering of the resolved shape
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Preview width in pixels (defaults to the document width)
    #[arg(long)]
    width: Option<u32>,

    /// Preview height in pixels (defaults to the document height)
    #[arg(long)]
    height: Option<u32>,

    /// Draw contour outlines over the preview fill
    #[arg(long)]
    outline: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Shape description text
    Description,
    /// Resolved path data
    Path,
    /// Contour and edge counts, area and bounds
    Summary,
    /// Nothing
    None,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FillArg {
    Nonzero,
    Evenodd,
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions::default()
            .with_fill_rule(match self.fill_rule {
                FillArg::Nonzero => FillRule::NonZero,
                FillArg::Evenodd => FillRule::EvenOdd,
            })
            .with_unknown_elements(if self.strict {
                UnknownElementPolicy::Fail
            } else {
                UnknownElementPolicy::Skip
            })
            .with_ellipse_origin(if self.ellipse_center {
                EllipseOrigin::Center
            } else {
                EllipseOrigin::BoundingBoxOrigin
            })
            .with_invert_y(!self.no_invert_y)
            .with_max_group_depth(self.max_group_depth)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let svg = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let shape = load_shape_from_str(&svg, &cli.load_options())
        .with_context(|| format!("loading shape from {}", cli.input.display()))?;
    info!(
        contours = shape.contours.len(),
        edges = shape.edge_count(),
        "resolved {}",
        cli.input.display()
    );

    match cli.emit {
        Emit::Description => print!("{}", shape.description()),
        Emit::Path => println!("{}", shape_path(&shape)),
        Emit::Summary => print_summary(&shape),
        Emit::None => {}
    }

    if let Some(out) = &cli.preview {
        let (width, height) = preview_size(&cli, &svg)?;
        let canvas = rasterize(&shape, width, height, cli.outline);
        save_png(out, &canvas)?;
        info!("preview written to {}", out.display());
    }
    Ok(())
}

/// Path data of the shape in its own coordinates.
fn shape_path(shape: &Shape) -> svg_contours::PathData {
    let contours: Vec<Vec<svg_contours::Segment>> =
        shape.contours.iter().map(|c| c.edges.clone()).collect();
    svg_contours::PathData::from_contours(&contours)
}

fn print_summary(shape: &Shape) {
    println!("contours: {}", shape.contours.len());
    println!("edges: {}", shape.edge_count());
    println!("area: {}", shape.area());
    match shape.bounds() {
        Some(b) => println!(
            "bounds: {} {} {} {}",
            b.left(),
            b.top(),
            b.right(),
            b.bottom()
        ),
        None => println!("bounds: none"),
    }
    println!("inverse y axis: {}", shape.inverse_y_axis);
    println!("valid: {}", shape.validate());
}

/// Explicit size, or the document size as `usvg` computes it.
fn preview_size(cli: &Cli, svg: &str) -> Result<(u32, u32)> {
    if let (Some(w), Some(h)) = (cli.width, cli.height) {
        return Ok((w, h));
    }
    let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
        .context("reading document size")?;
    let size = tree.size();
    let width = cli.width.unwrap_or(size.width().ceil() as u32);
    let height = cli.height.unwrap_or(size.height().ceil() as u32);
    if width == 0 || height == 0 {
        bail!("document has no usable size; pass --width and --height");
    }
    Ok((width, height))
}
