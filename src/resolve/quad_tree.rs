use crate::geometry::rect::Rect;
use std::ops::Range;

pub type CellId = u32;

#[derive(Debug, Clone)]
pub struct QuadCell {
    pub bbox: Rect,
    /// Set once this cell is finalised as a leaf.
    pub leaf_entry_range: Option<Range<usize>>,
}

/// Spatial index over edge bounding boxes, used to find the edge pairs whose
/// boxes overlap without testing every pair.
#[derive(Debug)]
pub struct QuadTree {
    pub nodes: Vec<QuadCell>,
    /// Item indices, grouped per leaf.
    pub entries: Vec<usize>,
}

impl QuadTree {
    pub fn new(boxes: &[Rect], root_bbox: Rect, max_depth: u8, min_items: usize) -> Self {
        let root_entries: Vec<usize> = (0..boxes.len()).collect();
        let (nodes, entries) = build_quadtree(root_bbox, root_entries, max_depth, min_items, boxes);
        Self { nodes, entries }
    }

    pub fn leaves(&self) -> impl Iterator<Item = &[usize]> {
        self.nodes.iter().filter_map(|node| {
            let range = node.leaf_entry_range.as_ref()?;
            Some(&self.entries[range.clone()])
        })
    }

    /// Unordered pairs `(i, j)`, `i < j`, of items whose boxes overlap.
    /// Sorted, without duplicates.
    pub fn candidate_pairs(&self, boxes: &[Rect]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for leaf in self.leaves() {
            for (k, &i) in leaf.iter().enumerate() {
                for &j in &leaf[k + 1..] {
                    if boxes[i].overlaps(&boxes[j]) {
                        pairs.push((i.min(j), i.max(j)));
                    }
                }
            }
        }
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }
}

/// Build a quad tree by level-order subdivision.
///
/// Each level processes the current frontier, subdividing cells that hold more
/// than `min_items` items and marking the rest as leaves. An item is handed to
/// every child its box touches.
fn build_quadtree(
    root_bbox: Rect,
    root_entries: Vec<usize>,
    max_depth: u8,
    min_items: usize,
    boxes: &[Rect],
) -> (Vec<QuadCell>, Vec<usize>) {
    let mut nodes: Vec<QuadCell> = Vec::new();
    let mut leaf_entries: Vec<usize> = Vec::new();

    let root_id: CellId = 0;
    nodes.push(QuadCell {
        bbox: root_bbox,
        leaf_entry_range: None,
    });

    let mut frontier: Vec<(CellId, Vec<usize>)> = vec![(root_id, root_entries)];

    for _ in 0..max_depth {
        if frontier.is_empty() {
            break;
        }

        let mut next_frontier: Vec<(CellId, Vec<usize>)> = Vec::new();

        for (parent_id, parent_entries) in frontier {
            let parent_bbox = nodes[parent_id as usize].bbox;

            if parent_entries.len() <= min_items {
                save_as_leaf(&mut nodes, &mut leaf_entries, parent_id, parent_entries);
                continue;
            }

            let Some(child_bounds) = get_child_bounds(parent_bbox) else {
                save_as_leaf(&mut nodes, &mut leaf_entries, parent_id, parent_entries);
                continue;
            };

            let child_entries: [Vec<usize>; 4] = std::array::from_fn(|pos| {
                parent_entries
                    .iter()
                    .copied()
                    .filter(|&i| boxes[i].overlaps(&child_bounds[pos]))
                    .collect()
            });

            // Items spanning the whole cell gain nothing from another level.
            if child_entries
                .iter()
                .all(|entries| entries.len() == parent_entries.len())
            {
                save_as_leaf(&mut nodes, &mut leaf_entries, parent_id, parent_entries);
                continue;
            }

            let child_ids: [CellId; 4] = std::array::from_fn(|pos| {
                let id = nodes.len() as CellId;
                nodes.push(QuadCell {
                    bbox: child_bounds[pos],
                    leaf_entry_range: None,
                });
                id
            });

            for (child_id, entries) in child_ids.into_iter().zip(child_entries) {
                if !entries.is_empty() {
                    next_frontier.push((child_id, entries));
                }
            }
        }

        frontier = next_frontier;
    }

    // Remaining frontier cells reached max depth; finalize them as leaves.
    for (cell_id, entries) in frontier {
        save_as_leaf(&mut nodes, &mut leaf_entries, cell_id, entries);
    }

    (nodes, leaf_entries)
}

/// Mark a cell as a leaf and append its entries to the global leaf entry list.
fn save_as_leaf(
    nodes: &mut [QuadCell],
    leaf_entries: &mut Vec<usize>,
    cell_id: CellId,
    entries: Vec<usize>,
) {
    let start = leaf_entries.len();
    leaf_entries.extend(entries);
    nodes[cell_id as usize].leaf_entry_range = Some(start..leaf_entries.len());
}

/// Child cells in TL, TR, BL, BR order.
fn get_child_bounds(parent_bbox: Rect) -> Option<[Rect; 4]> {
    let mid = parent_bbox.mid_point();
    let tl = Rect::from_ltrb(parent_bbox.left(), parent_bbox.top(), mid.x, mid.y)?;
    let tr = Rect::from_ltrb(mid.x, parent_bbox.top(), parent_bbox.right(), mid.y)?;
    let bl = Rect::from_ltrb(parent_bbox.left(), mid.y, mid.x, parent_bbox.bottom())?;
    let br = Rect::from_ltrb(mid.x, mid.y, parent_bbox.right(), parent_bbox.bottom())?;
    Some([tl, tr, bl, br])
}
