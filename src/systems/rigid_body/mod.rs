//! RigidBody2D - polygon body that moves and rotates as a unit
//!
//! The body stores its shape in local coordinates and transforms them to
//! world coordinates from position and rotation on every update.

mod body;
mod impulse;

pub use body::RigidBody2D;
pub use impulse::{correct_positions, resolve_collision};
