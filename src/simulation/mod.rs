//! Simulation worlds - own the entity arenas and run the tick loop
//!
//! Each world only orchestrates: physics lives in `systems/`, broad phase in
//! `spatial/`. A tick splits `dt` into sub-steps and, per sub-step, runs every
//! phase for all entities before starting the next phase.
//!
//! - `ParticleWorld`: Verlet particles, springs, disk collisions, container
//! - `RigidWorld`: polygon bodies, SAT / swept contacts, impulses, walls

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/settings.rs"]
mod settings;
#[path = "init/forces.rs"]
mod forces;
#[path = "particle/particle.rs"]
mod particle;
#[path = "rigid/rigid.rs"]
mod rigid;
#[path = "step/particle_step.rs"]
mod particle_step;
#[path = "step/rigid_step.rs"]
mod rigid_step;
mod facade;

pub use facade::{ParticleSim, RigidSim};
pub use forces::{Attractor, ExternalForces};
pub use particle::ParticleWorld;
pub use perf_stats::PerfStats;
pub use rigid::RigidWorld;
pub use settings::{SimSettings, MAX_QUADTREE_DEPTH, MAX_STEPS};

/// Two distinct mutable elements; `i < j`.
#[inline]
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i < j);
    let (head, tail) = items.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
