//! CPU rasterization of a [`Shape`] for visual inspection.
//!
//! This is a debugging aid for the `svg-contours` binary's `--preview` flag.
//! The loading pipeline never calls into it, and it makes no claim to be a
//! renderer: no anti-aliasing, styles or transforms.

use crate::contour::Shape;
use crate::geometry::point::Point2;
use anyhow::{Context, Result, ensure};
use std::fs::File;
use std::io::BufWriter;
use std::mem::swap;
use std::path::Path;

/// Line samples per curved edge when drawing outlines.
const OUTLINE_STEPS: usize = 16;

pub const FILL_COLOR: [u8; 4] = [255, 255, 255, 255];
pub const OUTER_COLOR: [u8; 4] = [0, 0, 255, 255];
pub const HOLE_COLOR: [u8; 4] = [255, 0, 0, 255];

/// An RGBA8 image.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let base = pixel_offset(self.width, x, y);
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.pixels[base..base + 4]);
        Some(out)
    }

    fn set_pixel(&mut self, x: i64, y: i64, rgba: &[u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let base = pixel_offset(self.width, x as u32, y as u32);
        self.pixels[base..base + 4].copy_from_slice(rgba);
    }

    pub fn draw_line(&mut self, from: (i64, i64), to: (i64, i64), rgba: &[u8; 4]) {
        let (mut x1, mut y1) = from;
        let (mut x2, mut y2) = to;
        let is_steep = (x1 - x2).abs() < (y1 - y2).abs();
        if is_steep {
            swap(&mut x1, &mut y1);
            swap(&mut x2, &mut y2);
        }
        if x1 > x2 {
            swap(&mut x1, &mut x2);
            swap(&mut y1, &mut y2);
        }
        let step = if x2 == x1 {
            0.0
        } else {
            (y2 - y1) as f64 / (x2 - x1) as f64
        };
        let mut y = y1 as f64;
        for x in x1..=x2 {
            let py = y.round() as i64;
            if is_steep {
                self.set_pixel(py, x, rgba);
            } else {
                self.set_pixel(x, py, rgba);
            }
            y += step;
        }
    }
}

/// Byte offset of pixel `(x, y)` in a row-major RGBA8 buffer `width` pixels wide.
fn pixel_offset(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * 4
}

/// Fills every pixel whose center has a nonzero winding number, in document
/// coordinates (an inverted shape is flipped back). With `outline`, contour
/// edges are drawn on top: outer boundaries blue, holes red.
pub fn rasterize(shape: &Shape, width: u32, height: u32, outline: bool) -> Canvas {
    let mut canvas = Canvas::new(width, height);
    let to_shape = |x: f64, y: f64| {
        if shape.inverse_y_axis {
            Point2::new(x, -y)
        } else {
            Point2::new(x, y)
        }
    };

    for y in 0..height {
        for x in 0..width {
            let center = to_shape(x as f64 + 0.5, y as f64 + 0.5);
            if shape.winding_at(center) != 0 {
                canvas.set_pixel(x as i64, y as i64, &FILL_COLOR);
            }
        }
    }

    if outline {
        for contour in &shape.contours {
            // Inversion flips the sign of every area, so outer boundaries are
            // the ones whose sign matches the flag.
            let is_outer = (contour.area() > 0.0) != shape.inverse_y_axis;
            let color = if is_outer { OUTER_COLOR } else { HOLE_COLOR };
            for edge in &contour.edges {
                let steps = if edge.points().len() == 2 { 1 } else { OUTLINE_STEPS };
                let pixel = |t: f64| {
                    let p = edge.point(t);
                    let p = to_shape(p.x, p.y);
                    (p.x.floor() as i64, p.y.floor() as i64)
                };
                let mut prev = pixel(0.0);
                for i in 1..=steps {
                    let next = pixel(i as f64 / steps as f64);
                    canvas.draw_line(prev, next, &color);
                    prev = next;
                }
            }
        }
    }
    canvas
}

pub fn save_png(path: &Path, canvas: &Canvas) -> Result<()> {
    ensure!(
        canvas.width > 0 && canvas.height > 0,
        "cannot write an empty {}x{} image",
        canvas.width,
        canvas.height
    );
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let wtr = BufWriter::new(file);

    let mut encoder = png::Encoder::new(wtr, canvas.width, canvas.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header().context("writing PNG header")?;
    writer
        .write_image_data(&canvas.pixels)
        .context("writing PNG data")?;
    Ok(())
}
