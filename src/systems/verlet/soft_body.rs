//! Rope and cloth builders
//!
//! Both append particles to an existing arena and connect them by index, so
//! several meshes can share one particle vector and one spring list.

use std::ops::Range;

use crate::core::{PhysicsError, Vec2};

use super::{VerletConnection, VerletPoint};

/// Straight chain of `segments + 1` particles from `start` to `end`.
pub fn append_rope(
    points: &mut Vec<VerletPoint>,
    connections: &mut Vec<VerletConnection>,
    start: Vec2,
    end: Vec2,
    segments: usize,
    mass: f32,
    strength: f32,
) -> Result<Range<usize>, PhysicsError> {
    if segments == 0 {
        return Err(PhysicsError::InvalidConfiguration {
            reason: "rope needs at least one segment",
        });
    }
    let first = points.len();
    for k in 0..=segments {
        let t = k as f32 / segments as f32;
        points.push(VerletPoint::new(start.lerp(end, t), mass)?);
    }
    for k in first..first + segments {
        connections.push(VerletConnection::between(points, k, k + 1, strength)?);
    }
    Ok(first..points.len())
}

/// Cloth description for [`append_cloth`]
#[derive(Clone, Copy, Debug)]
pub struct ClothDesc {
    /// Top-left particle position
    pub origin: Vec2,
    pub columns: usize,
    pub rows: usize,
    pub spacing: f32,
    pub mass: f32,
    pub strength: f32,
    /// Pin every particle of the first row
    pub pin_top: bool,
    /// Add diagonal springs to resist shearing
    pub shear: bool,
}

/// Row-major grid of particles with structural (and optional shear) springs.
pub fn append_cloth(
    points: &mut Vec<VerletPoint>,
    connections: &mut Vec<VerletConnection>,
    desc: &ClothDesc,
) -> Result<Range<usize>, PhysicsError> {
    if desc.columns < 2 || desc.rows < 2 {
        return Err(PhysicsError::InvalidConfiguration {
            reason: "cloth needs at least 2 columns and 2 rows",
        });
    }
    let first = points.len();
    let at = |c: usize, r: usize| first + r * desc.columns + c;

    for r in 0..desc.rows {
        for c in 0..desc.columns {
            let pos = desc.origin + Vec2::new(c as f32 * desc.spacing, r as f32 * desc.spacing);
            let mut p = VerletPoint::new(pos, desc.mass)?;
            p.pinned = desc.pin_top && r == 0;
            points.push(p);
        }
    }

    for r in 0..desc.rows {
        for c in 0..desc.columns {
            if c + 1 < desc.columns {
                connections.push(VerletConnection::between(points, at(c, r), at(c + 1, r), desc.strength)?);
            }
            if r + 1 < desc.rows {
                connections.push(VerletConnection::between(points, at(c, r), at(c, r + 1), desc.strength)?);
            }
            if desc.shear && c + 1 < desc.columns && r + 1 < desc.rows {
                connections.push(VerletConnection::between(points, at(c, r), at(c + 1, r + 1), desc.strength)?);
                connections.push(VerletConnection::between(points, at(c + 1, r), at(c, r + 1), desc.strength)?);
            }
        }
    }
    Ok(first..points.len())
}
