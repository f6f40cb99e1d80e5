//! Verlet Kit - 2D physics and spatial-query core for small simulations
//!
//! Architecture:
//! - core/        - Vec2 math, EPSILON, errors, RNG
//! - geometry/    - AABB, bounding circle, polygon area / inertia
//! - spatial/     - quadtree and uniform grid broad phase
//! - systems/     - narrow-phase collision, rigid bodies, Verlet solver
//! - simulation/  - worlds that run the sub-step loop + wasm facade
//!
//! The library never installs a `tracing` subscriber; hosts choose one.

pub mod core;
pub mod geometry;
pub mod spatial;
pub mod systems;
pub mod simulation;

// Convenience re-exports
pub use systems::collision;
pub use systems::rigid_body;
pub use systems::verlet;

use wasm_bindgen::prelude::*;

// Thread pool initialization for the rayon-backed phases in the browser
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    web_sys::console::log_1(&format!("verlet-kit {} initialized", version()).into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use crate::core::{PhysicsError, Vec2, EPSILON};
pub use geometry::{Aabb, BoundingCircle, Polygon};
pub use simulation::{
    Attractor, ExternalForces, ParticleSim, ParticleWorld, PerfStats, RigidSim, RigidWorld, SimSettings,
};
pub use spatial::{fixed_grid, PairPolicy, Quadtree};
pub use systems::rigid_body::RigidBody2D;
pub use systems::verlet::{VerletConnection, VerletPoint};
