//! Physics systems: narrow-phase collision, rigid bodies, Verlet solver

pub mod collision;
pub mod rigid_body;
pub mod verlet;
