//! Uniform grid broad phase
//!
//! Every call buckets the boxes from scratch: each box, grown by one cell on
//! every side, is registered in every cell it covers, then every unordered
//! pair sharing a bucket is reported. Straddling entities land in several
//! buckets, so the same pair can share more than one bucket; [`PairPolicy`]
//! decides whether that pair is reported once or once per shared bucket.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::EPSILON;
use crate::geometry::Aabb;

/// How a pair that shares several buckets is reported
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairPolicy {
    /// Once, from the lowest shared bucket
    #[default]
    Unique,
    /// Once per shared bucket; the pair callback must be idempotent
    EveryBucket,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridStats {
    pub buckets: usize,
    pub pairs: usize,
}

#[derive(Clone, Copy, Debug)]
struct CellRange {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

#[inline]
fn cell_range(aabb: &Aabb, cell_size: f32) -> CellRange {
    let lo = aabb.min();
    let hi = aabb.max();
    CellRange {
        min_x: ((lo.x - cell_size) / cell_size).floor() as i32,
        min_y: ((lo.y - cell_size) / cell_size).floor() as i32,
        max_x: ((hi.x + cell_size) / cell_size).floor() as i32,
        max_y: ((hi.y + cell_size) / cell_size).floor() as i32,
    }
}

/// Bucket `boxes` into cells of `cell_size` and call `on_pair(i, j)` with
/// `i < j` for candidate pairs. Buckets are visited in row-major cell order,
/// so the call sequence is deterministic.
pub fn fixed_grid<F>(boxes: &[Aabb], cell_size: f32, policy: PairPolicy, mut on_pair: F) -> GridStats
where
    F: FnMut(usize, usize),
{
    let mut stats = GridStats::default();
    if cell_size <= EPSILON || boxes.len() < 2 {
        return stats;
    }

    let ranges: Vec<CellRange> = boxes.iter().map(|b| cell_range(b, cell_size)).collect();

    // Keyed (row, column) so iteration is row-major
    let mut buckets: BTreeMap<(i32, i32), Vec<usize>> = BTreeMap::new();
    for (idx, r) in ranges.iter().enumerate() {
        for cy in r.min_y..=r.max_y {
            for cx in r.min_x..=r.max_x {
                buckets.entry((cy, cx)).or_default().push(idx);
            }
        }
    }
    stats.buckets = buckets.len();

    for (&(cy, cx), members) in buckets.iter() {
        for (a, &i) in members.iter().enumerate() {
            for &j in &members[a + 1..] {
                if policy == PairPolicy::Unique {
                    // Lowest shared cell is the max of both range minimums
                    let (ri, rj) = (&ranges[i], &ranges[j]);
                    if cx != ri.min_x.max(rj.min_x) || cy != ri.min_y.max(rj.min_y) {
                        continue;
                    }
                }
                stats.pairs += 1;
                on_pair(i.min(j), i.max(j));
            }
        }
    }
    stats
}

/// Collect candidate pairs into a vector
pub fn candidate_pairs(boxes: &[Aabb], cell_size: f32, policy: PairPolicy) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    fixed_grid(boxes, cell_size, policy, |i, j| pairs.push((i, j)));
    pairs
}
