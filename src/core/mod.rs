//! Core - math primitives, error type and small utilities shared by every system

pub mod math;
pub mod error;
pub mod random;

pub use error::PhysicsError;
pub use math::{Vec2, EPSILON};
