//! Edge arrangement: splits every edge where it meets another, keeps the
//! pieces that separate filled from unfilled area and links them back into
//! closed contours.

use crate::error::{Result, ShapeError};
use crate::geometry::intersect::{IntersectContext, intersect, self_intersect};
use crate::geometry::point::Point2;
use crate::geometry::rect::Rect;
use crate::geometry::segment::Segment;
use crate::geometry::winding::{FillRule, signed_area, winding_number};
use crate::resolve::ENDPOINT_SNAP_RANGE_PROPORTION;
use crate::resolve::quad_tree::QuadTree;
use std::collections::HashMap;
use tracing::debug;

const MAX_TREE_DEPTH: u8 = 10;
const MIN_CELL_EDGES: usize = 8;
/// Subdivision steps allowed for one pair of edges.
const PAIR_BUDGET: usize = 1 << 16;

/// One input area: closed contours interpreted with a fill rule.
#[derive(Debug, Clone)]
pub struct Operand {
    edges: Vec<Segment>,
    fill_rule: FillRule,
}

impl Operand {
    pub fn new(contours: Vec<Vec<Segment>>, fill_rule: FillRule) -> Self {
        Self {
            edges: contours.into_iter().flatten().collect(),
            fill_rule,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    fn contains(&self, p: Point2) -> bool {
        self.fill_rule.is_inside(winding_number(&self.edges, p))
    }
}

/// Distances derived from the size of the geometry being resolved.
#[derive(Debug, Copy, Clone)]
pub struct Tolerances {
    /// Points closer than this are the same vertex.
    pub snap: f64,
    /// Curve pieces flatter than this are treated as lines.
    pub flatness: f64,
    /// Distance of the inside/outside sample points from an edge.
    pub side_offset: f64,
}

impl Tolerances {
    pub fn for_extent(extent: f64) -> Self {
        let snap = extent * ENDPOINT_SNAP_RANGE_PROPORTION;
        Self {
            snap,
            flatness: snap * 1e-3,
            side_offset: snap / 64.0,
        }
    }
}

/// Resolved contours and the tolerances they were built with.
#[derive(Debug, Clone)]
pub struct Arrangement {
    pub contours: Vec<Vec<Segment>>,
    pub tolerances: Tolerances,
}

#[derive(Debug, Clone, Copy)]
struct Piece {
    /// Geometry with endpoints moved onto the shared vertices.
    seg: Segment,
    /// The same stretch of the input edge before snapping. Its points lie on
    /// the operand boundary, so side samples taken from it are exact.
    exact: Segment,
    start: usize,
    end: usize,
}

impl Piece {
    fn reversed(self) -> Piece {
        Piece {
            seg: self.seg.reversed(),
            exact: self.exact.reversed(),
            start: self.end,
            end: self.start,
        }
    }
}

/// Boundary of the union of all operands: split at every crossing, coalesced,
/// oriented with the filled side on the left, linked into contours.
pub fn simplify(operands: &[Operand]) -> Result<Arrangement> {
    let edges: Vec<Segment> = operands.iter().flat_map(|op| op.edges.iter().copied()).collect();
    if let Some(bad) = edges.iter().find(|e| !e.is_finite()) {
        return Err(ShapeError::GeometryResolutionFailed(format!(
            "non-finite coordinate in edge {bad:?}"
        )));
    }
    let bounds = edges
        .iter()
        .filter_map(|e| e.control_bounds())
        .reduce(|a, b| a.union(&b));
    let Some(bounds) = bounds.filter(|b| b.extent() > 0.0) else {
        return Ok(Arrangement {
            contours: Vec::new(),
            tolerances: Tolerances::for_extent(0.0),
        });
    };
    let tol = Tolerances::for_extent(bounds.extent());

    let cuts = find_cuts(&edges, bounds, &tol)?;
    let mut vertices = VertexPool::new(tol.snap);
    let pieces = split_edges(&edges, cuts, &mut vertices);
    let pieces = coalesce(pieces, tol.snap);
    let total = pieces.len();
    let pieces = classify(pieces, operands, tol.side_offset);
    debug!(
        edges = edges.len(),
        pieces = total,
        boundary = pieces.len(),
        "arranged edges"
    );
    let contours = link(&pieces, vertices.len())?
        .into_iter()
        .map(|c| merge_collinear(c, tol.flatness))
        .collect();
    Ok(Arrangement {
        contours,
        tolerances: tol,
    })
}

/// Gives every contour the direction matching its nesting depth: outer
/// boundaries positive area, holes negative, islands in holes positive again.
/// Contours enclosing no area are dropped.
pub fn normalize_winding(arrangement: Arrangement) -> Arrangement {
    let Arrangement {
        contours,
        tolerances,
    } = arrangement;
    let min_area = tolerances.snap * tolerances.snap;
    let samples: Vec<Option<Point2>> = contours
        .iter()
        .map(|c| c.first().map(|e| e.point(0.5)))
        .collect();

    let mut out = Vec::with_capacity(contours.len());
    for (i, contour) in contours.iter().enumerate() {
        let area = signed_area(contour);
        let Some(sample) = samples[i] else {
            continue;
        };
        if area.abs() <= min_area {
            continue;
        }
        let depth = contours
            .iter()
            .enumerate()
            .filter(|(j, other)| *j != i && winding_number(other.iter(), sample) != 0)
            .count();
        let want_positive = depth % 2 == 0;
        if (area > 0.0) == want_positive {
            out.push(contour.clone());
        } else {
            out.push(contour.iter().rev().map(|e| e.reversed()).collect());
        }
    }
    Arrangement {
        contours: out,
        tolerances,
    }
}

/// Split parameters and points for every edge.
fn find_cuts(edges: &[Segment], bounds: Rect, tol: &Tolerances) -> Result<Vec<Vec<(f64, Point2)>>> {
    let boxes: Vec<Rect> = edges
        .iter()
        .map(|e| e.control_bounds().unwrap_or(bounds).outset(tol.snap))
        .collect();
    let tree = QuadTree::new(&boxes, bounds.outset(tol.snap), MAX_TREE_DEPTH, MIN_CELL_EDGES);
    let mut cuts: Vec<Vec<(f64, Point2)>> = vec![Vec::new(); edges.len()];

    let exhausted = |what: String| {
        ShapeError::GeometryResolutionFailed(format!("intersection search for {what} did not converge"))
    };

    for (i, j) in tree.candidate_pairs(&boxes) {
        let (a, b) = (&edges[i], &edges[j]);
        if a.coincides_with(b, tol.snap) {
            continue;
        }
        let mut ctx = IntersectContext::new(tol.snap, tol.flatness, PAIR_BUDGET);
        let crossings =
            intersect(a, b, &mut ctx).map_err(|_| exhausted(format!("edges {i} and {j}")))?;
        for c in crossings {
            add_cut(&mut cuts[i], a, c.t, c.point, tol.snap);
            add_cut(&mut cuts[j], b, c.u, c.point, tol.snap);
        }
    }

    for (i, edge) in edges.iter().enumerate() {
        let mut ctx = IntersectContext::new(tol.snap, tol.flatness, PAIR_BUDGET);
        let crossings = self_intersect(edge, &mut ctx).map_err(|_| exhausted(format!("edge {i}")))?;
        for c in crossings {
            add_cut(&mut cuts[i], edge, c.t, c.point, tol.snap);
            add_cut(&mut cuts[i], edge, c.u, c.point, tol.snap);
        }
    }
    Ok(cuts)
}

/// Records a split unless it falls on one of the edge's own endpoints.
fn add_cut(cuts: &mut Vec<(f64, Point2)>, edge: &Segment, t: f64, point: Point2, snap: f64) {
    if point.distance(edge.start()) <= snap || point.distance(edge.end()) <= snap {
        return;
    }
    cuts.push((t, point));
}

fn split_edges(edges: &[Segment], cuts: Vec<Vec<(f64, Point2)>>, vertices: &mut VertexPool) -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(edges.len());
    for (edge, mut cuts) in edges.iter().zip(cuts) {
        cuts.sort_by(|a, b| a.0.total_cmp(&b.0));
        cuts.push((1.0, edge.end()));

        let mut prev_t = 0.0;
        let mut prev_vertex = vertices.snap(edge.start());
        for (t, point) in cuts {
            let vertex = vertices.snap(point);
            if vertex == prev_vertex || t <= prev_t {
                if t >= 1.0 && vertex == prev_vertex && prev_t <= 0.0 {
                    // Closed loop in a single edge; keep it whole.
                    push_piece(&mut pieces, *edge, prev_vertex, vertex, vertices);
                }
                continue;
            }
            let seg = edge.subsegment(prev_t, t);
            push_piece(&mut pieces, seg, prev_vertex, vertex, vertices);
            prev_t = t;
            prev_vertex = vertex;
        }
    }
    pieces
}

fn push_piece(pieces: &mut Vec<Piece>, exact: Segment, start: usize, end: usize, vertices: &VertexPool) {
    let seg = exact.with_endpoints(vertices.position(start), vertices.position(end));
    if start == end
        && seg
            .control_bounds()
            .is_none_or(|b| b.extent() <= vertices.radius)
    {
        return;
    }
    pieces.push(Piece {
        seg,
        exact,
        start,
        end,
    });
}

/// Drops pieces that repeat an earlier piece's geometry in either direction.
fn coalesce(pieces: Vec<Piece>, snap: f64) -> Vec<Piece> {
    let mut seen: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    let mut out: Vec<Piece> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let key = (piece.start.min(piece.end), piece.start.max(piece.end));
        let bucket = seen.entry(key).or_default();
        if bucket
            .iter()
            .any(|&k| out[k].seg.coincides_with(&piece.seg, snap))
        {
            continue;
        }
        bucket.push(out.len());
        out.push(piece);
    }
    out
}

/// Keeps pieces with filled area on exactly one side, turned so that side is
/// on the left.
fn classify(pieces: Vec<Piece>, operands: &[Operand], offset: f64) -> Vec<Piece> {
    let inside = |p: Point2| operands.iter().any(|op| op.contains(p));
    pieces
        .into_iter()
        .filter_map(|piece| {
            let mid = piece.exact.point(0.5);
            let normal = piece.exact.tangent(0.5)?.perp();
            let left = inside(mid + normal * offset);
            let right = inside(mid - normal * offset);
            match (left, right) {
                (true, false) => Some(piece),
                (false, true) => Some(piece.reversed()),
                _ => None,
            }
        })
        .collect()
}

/// Walks the boundary pieces into closed chains. Where several pieces leave a
/// vertex the sharpest left turn is taken, which keeps regions touching at a
/// single point in separate contours.
fn link(pieces: &[Piece], vertex_count: usize) -> Result<Vec<Vec<Segment>>> {
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
    for (i, piece) in pieces.iter().enumerate() {
        outgoing[piece.start].push(i);
    }
    let turn = |incoming: Option<Point2>, next: &Piece| match (incoming, next.seg.tangent(0.0)) {
        (Some(a), Some(b)) => a.cross(b).atan2(a.dot(b)),
        _ => 0.0,
    };

    let mut used = vec![false; pieces.len()];
    let mut contours = Vec::new();
    for first in 0..pieces.len() {
        if used[first] {
            continue;
        }
        used[first] = true;
        let origin = pieces[first].start;
        let mut chain = vec![pieces[first].seg];
        let mut current = first;
        while pieces[current].end != origin {
            let incoming = pieces[current].seg.tangent(1.0);
            let next = outgoing[pieces[current].end]
                .iter()
                .copied()
                .filter(|&k| !used[k])
                .max_by(|&a, &b| {
                    turn(incoming, &pieces[a]).total_cmp(&turn(incoming, &pieces[b]))
                });
            let Some(next) = next else {
                let at = pieces[current].seg.end();
                return Err(ShapeError::GeometryResolutionFailed(format!(
                    "boundary does not close at ({}, {})",
                    at.x, at.y
                )));
            };
            used[next] = true;
            chain.push(pieces[next].seg);
            current = next;
        }
        contours.push(chain);
    }
    Ok(contours)
}

/// Joins consecutive straight edges that continue in the same direction.
fn merge_collinear(contour: Vec<Segment>, tol: f64) -> Vec<Segment> {
    let continues = |a: Point2, b: Point2, c: Point2| {
        let ac = c - a;
        let len = ac.length();
        len > 0.0 && (b - a).cross(ac).abs() / len <= tol && (b - a).dot(c - b) > 0.0
    };

    let mut out: Vec<Segment> = Vec::with_capacity(contour.len());
    for seg in contour {
        if let (Some(Segment::Linear([a, b])), Segment::Linear([_, c])) = (out.last(), seg) {
            if continues(*a, *b, c) {
                let a = *a;
                if let Some(last) = out.last_mut() {
                    *last = Segment::line(a, c);
                }
                continue;
            }
        }
        out.push(seg);
    }
    while out.len() > 2 {
        let (Segment::Linear([a, b]), Segment::Linear([_, c])) = (out[out.len() - 1], out[0]) else {
            break;
        };
        if !continues(a, b, c) {
            break;
        }
        out[0] = Segment::line(a, c);
        out.pop();
    }
    out
}

/// Deduplicates nearby points into shared vertex ids.
struct VertexPool {
    radius: f64,
    positions: Vec<Point2>,
    grid: HashMap<(i64, i64), Vec<usize>>,
}

impl VertexPool {
    fn new(radius: f64) -> Self {
        Self {
            radius,
            positions: Vec::new(),
            grid: HashMap::new(),
        }
    }

    fn len(&self) -> usize {
        self.positions.len()
    }

    fn position(&self, id: usize) -> Point2 {
        self.positions[id]
    }

    fn cell(&self, p: Point2) -> (i64, i64) {
        (
            (p.x / self.radius).floor() as i64,
            (p.y / self.radius).floor() as i64,
        )
    }

    fn snap(&mut self, p: Point2) -> usize {
        let (cx, cy) = self.cell(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(ids) = self.grid.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                if let Some(&id) = ids
                    .iter()
                    .find(|&&id| self.positions[id].distance(p) <= self.radius)
                {
                    return id;
                }
            }
        }
        let id = self.positions.len();
        self.positions.push(p);
        self.grid.entry((cx, cy)).or_default().push(id);
        id
    }
}
