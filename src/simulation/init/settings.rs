use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{PhysicsError, Vec2};
use crate::spatial::PairPolicy;

/// Largest sub-step count accepted per tick
pub const MAX_STEPS: u32 = 64;
/// Deepest quadtree split accepted
pub const MAX_QUADTREE_DEPTH: u32 = 24;

/// Tunable constants for one world, passed into every step.
///
/// Missing JSON fields take their default value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Acceleration applied to every non-pinned particle and every body
    pub gravity: Vec2,
    /// Sub-steps per tick, 1..=64
    pub steps: u32,
    /// Normal-velocity exchange factor for particle collisions, 0..=1
    pub collision_damping: f32,
    /// Rewrite previous positions after a particle collision so it bounces
    pub preserve_impulse: bool,
    /// Mirror velocity off the container walls instead of absorbing it.
    /// Particles keep `wall_damping` of it, rigid bodies `restitution`.
    pub wall_reflection: bool,
    /// Speed kept after a wall bounce, 0..=1
    pub wall_damping: f32,
    /// Rigid body restitution, 0..=1
    pub restitution: f32,
    /// Broad-phase grid cell edge, > 0
    pub grid_cell_size: f32,
    pub pair_policy: PairPolicy,
    /// Quadtree split limit for range queries, 1..=24
    pub quadtree_max_depth: u32,
    /// Resolve particle-particle overlaps
    pub particle_collisions: bool,
}

impl Default for SimSettings {
    fn default() -> Self {
        SimSettings {
            gravity: Vec2::new(0.0, 980.0),
            steps: 8,
            collision_damping: 0.5,
            preserve_impulse: true,
            wall_reflection: true,
            wall_damping: 0.8,
            restitution: 0.8,
            grid_cell_size: 32.0,
            pair_policy: PairPolicy::Unique,
            quadtree_max_depth: 8,
            particle_collisions: true,
        }
    }
}

#[inline]
fn unit_range(v: f32) -> bool {
    (0.0..=1.0).contains(&v)
}

impl SimSettings {
    /// Parse from JSON and validate
    pub fn from_json(json: &str) -> Result<Self, PhysicsError> {
        let settings: SimSettings = serde_json::from_str(json)?;
        settings.validate()?;
        debug!(steps = settings.steps, cell = settings.grid_cell_size, "settings loaded");
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, PhysicsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check every field against its documented range
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let fail = |reason| Err(PhysicsError::InvalidConfiguration { reason });
        if !self.gravity.is_finite() {
            return fail("gravity must be finite");
        }
        if self.steps == 0 || self.steps > MAX_STEPS {
            return fail("steps must be within 1..=64");
        }
        if !unit_range(self.collision_damping) {
            return fail("collision_damping must be within 0..=1");
        }
        if !unit_range(self.wall_damping) {
            return fail("wall_damping must be within 0..=1");
        }
        if !unit_range(self.restitution) {
            return fail("restitution must be within 0..=1");
        }
        if !self.grid_cell_size.is_finite() || self.grid_cell_size <= 0.0 {
            return fail("grid_cell_size must be positive");
        }
        if self.quadtree_max_depth == 0 || self.quadtree_max_depth > MAX_QUADTREE_DEPTH {
            return fail("quadtree_max_depth must be within 1..=24");
        }
        Ok(())
    }

    /// Wall bounce factor for the bound phase
    pub(crate) fn wall_reflect(&self) -> Option<f32> {
        self.wall_reflection.then_some(self.wall_damping)
    }
}
