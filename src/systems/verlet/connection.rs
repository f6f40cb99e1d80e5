use crate::core::PhysicsError;

use super::VerletPoint;

/// Spring between two particles, referenced by index into the particle arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerletConnection {
    ids: [usize; 2],
    /// Rest length
    pub len: f32,
    /// Fraction of the error corrected per pass, in `(0, 1]`
    pub strength: f32,
}

impl VerletConnection {
    /// Validate indices against `points` and build the connection.
    ///
    /// A negative `len` is clamped to zero and `strength` to `(0, 1]`.
    pub fn new(points: &[VerletPoint], i: usize, j: usize, len: f32, strength: f32) -> Result<Self, PhysicsError> {
        let count = points.len();
        for index in [i, j] {
            if index >= count {
                return Err(PhysicsError::InvalidConnection { index, count });
            }
        }
        if i == j {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "connection endpoints must differ",
            });
        }
        if strength.is_nan() || strength <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "connection strength must be in (0, 1]",
            });
        }
        Ok(Self {
            ids: [i, j],
            len: len.max(0.0),
            strength: strength.min(1.0),
        })
    }

    /// Rest length taken from the particles' current distance
    pub fn between(points: &[VerletPoint], i: usize, j: usize, strength: f32) -> Result<Self, PhysicsError> {
        let count = points.len();
        let (a, b) = match (points.get(i), points.get(j)) {
            (Some(a), Some(b)) => (a, b),
            (None, _) => return Err(PhysicsError::InvalidConnection { index: i, count }),
            (_, None) => return Err(PhysicsError::InvalidConnection { index: j, count }),
        };
        Self::new(points, i, j, a.pos.distance(b.pos), strength)
    }

    #[inline]
    pub fn ids(&self) -> [usize; 2] {
        self.ids
    }
}
