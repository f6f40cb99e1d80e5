//! Physics Error Types
//!
//! Construction and configuration failures. Numerically inherent edge cases
//! (no collision root, coincident points, quadtree depth cap) are not errors
//! and are reported through `Option`/`bool` return values instead.

use std::fmt;

/// Unified error type for physics operations.
#[derive(Clone, Debug, PartialEq)]
pub enum PhysicsError {
    /// A polygon needs at least three vertices.
    DegeneratePolygon {
        /// Number of vertices that was provided
        vertices: usize,
    },
    /// The polygon's vertices are collinear (area within EPSILON of zero).
    ZeroArea,
    /// Two consecutive vertices coincide.
    ZeroLengthEdge {
        /// Index of the edge's first vertex
        index: usize,
    },
    /// Rigid-body contact needs a convex outline.
    NonConvexPolygon {
        /// Vertex where the outline turns against its winding
        index: usize,
    },
    /// Density must be strictly positive.
    NonPositiveDensity,
    /// Particle mass must be strictly positive.
    NonPositiveMass,
    /// A connection references a particle that does not exist.
    InvalidConnection {
        /// The out-of-range particle index
        index: usize,
        /// Current number of particles
        count: usize,
    },
    /// A settings field is outside its documented range.
    InvalidConfiguration {
        /// Description of the offending field
        reason: &'static str,
    },
    /// Settings JSON failed to parse.
    SettingsParse {
        /// Parser message
        message: String,
    },
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegeneratePolygon { vertices } => {
                write!(f, "polygon needs at least 3 vertices (got {vertices})")
            }
            Self::ZeroArea => write!(f, "polygon has zero area"),
            Self::ZeroLengthEdge { index } => {
                write!(f, "polygon edge starting at vertex {index} has zero length")
            }
            Self::NonConvexPolygon { index } => {
                write!(f, "polygon is not convex at vertex {index}")
            }
            Self::NonPositiveDensity => write!(f, "density must be positive"),
            Self::NonPositiveMass => write!(f, "mass must be positive"),
            Self::InvalidConnection { index, count } => {
                write!(f, "connection index {index} out of range (count={count})")
            }
            Self::InvalidConfiguration { reason } => {
                write!(f, "invalid configuration: {reason}")
            }
            Self::SettingsParse { message } => write!(f, "settings parse error: {message}"),
        }
    }
}

impl std::error::Error for PhysicsError {}

impl From<serde_json::Error> for PhysicsError {
    fn from(err: serde_json::Error) -> Self {
        Self::SettingsParse { message: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_index() {
        let err = PhysicsError::InvalidConnection { index: 7, count: 3 };
        assert_eq!(err.to_string(), "connection index 7 out of range (count=3)");
    }
}
