//! Verlet particles, index-based springs and the per-sub-step solver phases

mod connection;
mod point;
pub mod soft_body;
pub mod solver;

pub use connection::VerletConnection;
pub use point::VerletPoint;
pub use soft_body::{append_cloth, append_rope, ClothDesc};
pub use solver::{
    accelerate, apply_acceleration, apply_force, bound, inertia, kinetic_energy, spring_constrain,
};
