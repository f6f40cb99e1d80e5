//! Quadtree - point storage with recursive subdivision
//!
//! Each node is `Empty`, a `Leaf` holding one point, or `Internal` with
//! exactly four children. A second point landing in a leaf splits it and
//! both points are pushed down. Splitting stops at `max_depth`: inserts that
//! would need a deeper split are dropped and `insert` returns `false`, so
//! coincident points are lost past the first one. Callers needing exact
//! multiplicity use [`fixed_grid`](super::fixed_grid) instead.
//!
//! The tree borrows nothing; it is rebuilt from entity positions every step.

use tracing::trace;

use crate::core::Vec2;
use crate::geometry::Aabb;

/// Reference split depth for demo-sized scenes
pub const DEFAULT_MAX_DEPTH: u32 = 4;

/// Point stored in the tree; `id` indexes the caller's entity arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadPoint {
    pub pos: Vec2,
    pub id: usize,
}

/// Square region covered by a tree
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Square {
    pub center: Vec2,
    pub half: f32,
}

impl Square {
    pub fn new(center: Vec2, half: f32) -> Self {
        Self { center, half: half.abs() }
    }

    /// Smallest square sharing the box's center that covers it
    pub fn enclosing(aabb: &Aabb) -> Self {
        Self::new(aabb.center, aabb.half_width.max(aabb.half_height))
    }

    pub fn to_aabb(&self) -> Aabb {
        Aabb::new(self.center, self.half, self.half)
    }
}

/// Node region as exact min / max corners. Children reuse the parent's
/// `mid` as their shared edge, so a point routed by `quadrant_of` always
/// lies inside the child's closed bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    min: Vec2,
    max: Vec2,
    mid: Vec2,
}

impl Cell {
    fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max, mid: (min + max) * 0.5 }
    }

    fn from_square(square: Square) -> Self {
        let h = Vec2::new(square.half, square.half);
        Self::new(square.center - h, square.center + h)
    }

    #[inline]
    fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[inline]
    fn overlaps(&self, range: &Aabb) -> bool {
        let min = range.min();
        let max = range.max();
        !(max.x < self.min.x || min.x > self.max.x || max.y < self.min.y || min.y > self.max.y)
    }

    /// Child index: bit 0 set on the +x side, bit 1 on the +y side
    #[inline]
    fn quadrant_of(&self, p: Vec2) -> usize {
        (p.x >= self.mid.x) as usize | (((p.y >= self.mid.y) as usize) << 1)
    }

    fn quadrant(&self, index: usize) -> Cell {
        let (lo_x, hi_x) = if index & 1 == 1 { (self.mid.x, self.max.x) } else { (self.min.x, self.mid.x) };
        let (lo_y, hi_y) = if index & 2 == 2 { (self.mid.y, self.max.y) } else { (self.min.y, self.mid.y) };
        Cell::new(Vec2::new(lo_x, lo_y), Vec2::new(hi_x, hi_y))
    }
}

#[derive(Clone, Debug)]
enum Slot {
    Empty,
    Leaf(QuadPoint),
    Internal(Box<[QuadNode; 4]>),
}

#[derive(Clone, Debug)]
struct QuadNode {
    cell: Cell,
    slot: Slot,
}

impl QuadNode {
    fn empty(cell: Cell) -> Self {
        Self { cell, slot: Slot::Empty }
    }

    fn subdivide(cell: Cell) -> Box<[QuadNode; 4]> {
        Box::new([
            QuadNode::empty(cell.quadrant(0)),
            QuadNode::empty(cell.quadrant(1)),
            QuadNode::empty(cell.quadrant(2)),
            QuadNode::empty(cell.quadrant(3)),
        ])
    }

    /// Containment is checked once at the root; below it points are placed
    /// purely by quadrant. Returns `false` only at the depth cap.
    fn insert(&mut self, point: QuadPoint, depth: u32, max_depth: u32) -> bool {
        debug_assert!(self.cell.contains(point.pos));
        match self.slot {
            Slot::Empty => {
                self.slot = Slot::Leaf(point);
                true
            }
            Slot::Leaf(existing) => {
                if depth >= max_depth {
                    return false;
                }
                let mut children = Self::subdivide(self.cell);
                // Fresh children are empty, so the old leaf always lands
                children[self.cell.quadrant_of(existing.pos)].slot = Slot::Leaf(existing);
                let q = self.cell.quadrant_of(point.pos);
                let stored = children[q].insert(point, depth + 1, max_depth);
                self.slot = Slot::Internal(children);
                stored
            }
            Slot::Internal(ref mut children) => {
                let q = self.cell.quadrant_of(point.pos);
                children[q].insert(point, depth + 1, max_depth)
            }
        }
    }

    fn query(&self, range: &Aabb, out: &mut Vec<QuadPoint>) {
        if !self.cell.overlaps(range) {
            return;
        }
        match &self.slot {
            Slot::Empty => {}
            Slot::Leaf(p) => {
                if range.contains(p.pos) {
                    out.push(*p);
                }
            }
            Slot::Internal(children) => {
                for child in children.iter() {
                    child.query(range, out);
                }
            }
        }
    }

    fn depth(&self) -> u32 {
        match &self.slot {
            Slot::Internal(children) => 1 + children.iter().map(QuadNode::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    fn count(&self) -> usize {
        match &self.slot {
            Slot::Empty => 0,
            Slot::Leaf(_) => 1,
            Slot::Internal(children) => children.iter().map(QuadNode::count).sum(),
        }
    }
}

/// Point quadtree over a fixed square region
#[derive(Clone, Debug)]
pub struct Quadtree {
    bounds: Square,
    root: QuadNode,
    max_depth: u32,
    len: usize,
    dropped: usize,
}

impl Quadtree {
    pub fn new(bounds: Square) -> Self {
        Self::with_max_depth(bounds, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(bounds: Square, max_depth: u32) -> Self {
        Self {
            bounds,
            root: QuadNode::empty(Cell::from_square(bounds)),
            max_depth,
            len: 0,
            dropped: 0,
        }
    }

    /// Build a tree from a position slice; ids are slice indices.
    pub fn from_points(bounds: Square, max_depth: u32, points: &[Vec2]) -> Self {
        let mut tree = Self::with_max_depth(bounds, max_depth);
        for (id, pos) in points.iter().enumerate() {
            tree.insert(*pos, id);
        }
        tree
    }

    /// Store `pos`. Returns `false` when the point lies outside the tree or
    /// would need a split past `max_depth`; only the latter counts as dropped.
    pub fn insert(&mut self, pos: Vec2, id: usize) -> bool {
        let point = QuadPoint { pos, id };
        if !self.root.cell.contains(pos) {
            return false;
        }
        let stored = self.root.insert(point, 0, self.max_depth);
        if stored {
            self.len += 1;
        } else {
            self.dropped += 1;
            trace!(id, x = pos.x, y = pos.y, "quadtree insert dropped at depth cap");
        }
        stored
    }

    /// All stored points inside `range` (closed bounds)
    pub fn query(&self, range: &Aabb) -> Vec<QuadPoint> {
        let mut out = Vec::new();
        self.root.query(range, &mut out);
        out
    }

    pub fn query_into(&self, range: &Aabb, out: &mut Vec<QuadPoint>) {
        self.root.query(range, out);
    }

    /// All stored points within `radius` of `center`
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<QuadPoint> {
        let mut out = self.query(&Aabb::new(center, radius, radius));
        let r2 = radius * radius;
        out.retain(|p| p.pos.distance_squared(center) <= r2);
        out
    }

    pub fn clear(&mut self) {
        self.root.slot = Slot::Empty;
        self.len = 0;
        self.dropped = 0;
    }

    pub fn bounds(&self) -> Square {
        self.bounds
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Deepest split actually reached
    pub fn depth(&self) -> u32 {
        self.root.depth()
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.len, self.root.count());
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts lost to the depth cap since the last `clear`
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
