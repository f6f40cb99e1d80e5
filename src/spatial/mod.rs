//! Broad-phase spatial indexes, rebuilt from entity positions every step

pub mod fixed_grid;
pub mod quadtree;

pub use fixed_grid::{candidate_pairs, fixed_grid, GridStats, PairPolicy};
pub use quadtree::{QuadPoint, Quadtree, Square, DEFAULT_MAX_DEPTH};
