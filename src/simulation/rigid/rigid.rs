use tracing::{debug, warn};

use crate::core::{PhysicsError, Vec2};
use crate::geometry::{Aabb, Polygon};
use crate::systems::rigid_body::RigidBody2D;

use super::forces::ExternalForces;
use super::perf_stats::PerfStats;
use super::rigid_step;
use super::settings::SimSettings;

/// Rigid polygons bouncing inside a rectangular container.
pub struct RigidWorld {
    pub(super) bodies: Vec<RigidBody2D>,
    pub(super) next_id: u32,
    pub(super) bounds: Aabb,
    pub(super) settings: SimSettings,
    pub(super) frame: u64,

    pub(super) perf_enabled: bool,
    pub(super) perf_stats: PerfStats,
}

impl RigidWorld {
    /// Container spanning `(0, 0)..(width, height)`
    pub fn new(width: f32, height: f32, settings: SimSettings) -> Result<Self, PhysicsError> {
        Self::with_bounds(Aabb::from_min_max(Vec2::zero(), Vec2::new(width, height)), settings)
    }

    pub fn with_bounds(bounds: Aabb, settings: SimSettings) -> Result<Self, PhysicsError> {
        settings.validate()?;
        if bounds.half_width <= 0.0 || bounds.half_height <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "world bounds must have positive size",
            });
        }
        Ok(Self {
            bodies: Vec::new(),
            next_id: 1,
            bounds,
            settings,
            frame: 0,
            perf_enabled: false,
            perf_stats: PerfStats::default(),
        })
    }

    // === Construction ===

    /// Take ownership of `body` and return its new ID.
    ///
    /// The body picks up the world restitution.
    pub fn add_body(&mut self, mut body: RigidBody2D) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        body.id = id;
        body.set_restitution(self.settings.restitution);
        if !self.bounds.intersects(body.aabb()) {
            warn!(id, x = body.pos.x, y = body.pos.y, "rigid body spawned outside the world bounds");
        }
        self.bodies.push(body);
        id
    }

    /// Spawn an axis-aligned box centered on `pos`
    pub fn spawn_rect(&mut self, pos: Vec2, width: f32, height: f32, density: f32) -> Result<u32, PhysicsError> {
        let body = RigidBody2D::new_rect(pos, width, height, density).map_err(|e| {
            debug!(error = %e, "rejected rect spawn");
            e
        })?;
        Ok(self.add_body(body))
    }

    /// Spawn a polygon whose local vertices are given relative to `pos`
    pub fn spawn_polygon(&mut self, pos: Vec2, verts: Vec<Vec2>, density: f32) -> Result<u32, PhysicsError> {
        let body = RigidBody2D::from_vertices(pos, Vec2::zero(), verts, density).map_err(|e| {
            debug!(error = %e, "rejected polygon spawn");
            e
        })?;
        Ok(self.add_body(body))
    }

    /// Spawn a regular n-gon of circumradius `radius`
    pub fn spawn_regular(&mut self, pos: Vec2, radius: f32, sides: usize, density: f32) -> Result<u32, PhysicsError> {
        let shape = Polygon::regular(radius, sides)?;
        let body = RigidBody2D::new(pos, Vec2::zero(), shape, density, 0.0, 0.0, None)?;
        Ok(self.add_body(body))
    }

    /// Remove a rigid body by ID.
    pub fn remove_body(&mut self, id: u32) -> bool {
        match self.bodies.iter().position(|b| b.id == id) {
            Some(idx) => {
                self.bodies.swap_remove(idx);
                debug!(id, remaining = self.bodies.len(), "rigid body removed");
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.next_id = 1;
        self.frame = 0;
        self.perf_stats.reset();
    }

    // === Step ===

    /// Advance by `dt` split into `steps` sub-steps.
    pub fn step(&mut self, dt: f32, steps: u32, forces: &ExternalForces) {
        rigid_step::step(self, dt, steps, forces);
    }

    /// Advance by `dt` with the configured sub-step count.
    pub fn tick(&mut self, dt: f32, forces: &ExternalForces) {
        let steps = self.settings.steps;
        self.step(dt, steps, forces);
    }

    // === Query ===

    /// IDs of bodies whose bounding box overlaps `range`
    pub fn query_range(&self, range: &Aabb) -> Vec<u32> {
        self.bodies
            .iter()
            .filter(|b| b.aabb().intersects(range))
            .map(|b| b.id)
            .collect()
    }

    // === Read accessors ===

    pub fn body(&self, id: u32) -> Option<&RigidBody2D> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn body_mut(&mut self, id: u32) -> Option<&mut RigidBody2D> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn bodies(&self) -> &[RigidBody2D] {
        &self.bodies
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Σ m·v over all bodies
    pub fn total_momentum(&self) -> Vec2 {
        self.bodies.iter().fold(Vec2::zero(), |acc, b| acc + b.momentum())
    }

    // === Settings ===

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    /// Replace the settings; bodies adopt the new restitution.
    pub fn set_settings(&mut self, settings: SimSettings) -> Result<(), PhysicsError> {
        settings.validate()?;
        for body in self.bodies.iter_mut() {
            body.set_restitution(settings.restitution);
        }
        self.settings = settings;
        Ok(())
    }

    /// Rejects non-finite components like `set_settings` does.
    pub fn set_gravity(&mut self, gravity: Vec2) -> Result<(), PhysicsError> {
        let settings = SimSettings { gravity, ..self.settings.clone() };
        self.set_settings(settings)
    }

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.perf_enabled = enabled;
        if !enabled {
            self.perf_stats.reset();
        }
    }

    /// Last step perf snapshot (zeros when perf disabled)
    pub fn perf_stats(&self) -> PerfStats {
        self.perf_stats.clone()
    }
}
