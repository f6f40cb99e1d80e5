use std::ops::Range;

use tracing::debug;

use crate::core::{PhysicsError, Vec2};
use crate::geometry::Aabb;
use crate::spatial::{Quadtree, Square};
use crate::systems::verlet::{self, append_cloth, append_rope, ClothDesc, VerletConnection, VerletPoint};

use super::forces::ExternalForces;
use super::perf_stats::PerfStats;
use super::settings::SimSettings;
use super::particle_step;

/// Verlet particles and springs inside a rectangular container.
///
/// Particles live in one arena; springs refer to them by index, so particles
/// are never removed individually (only [`ParticleWorld::clear`]).
pub struct ParticleWorld {
    pub(super) points: Vec<VerletPoint>,
    pub(super) connections: Vec<VerletConnection>,
    pub(super) bounds: Aabb,
    pub(super) settings: SimSettings,
    pub(super) frame: u64,

    // Broad-phase scratch reused across steps
    pub(super) boxes: Vec<Aabb>,

    pub(super) perf_enabled: bool,
    pub(super) perf_stats: PerfStats,
}

impl ParticleWorld {
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
            points: Vec::new(),
            connections: Vec::new(),
            bounds,
            settings,
            frame: 0,
            boxes: Vec::new(),
            perf_enabled: false,
            perf_stats: PerfStats::default(),
        })
    }

    // === Construction ===

    /// Add a particle; returns its index.
    pub fn add_point(&mut self, point: VerletPoint) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    /// Add a resting particle at `pos` whose radius is `mass`.
    pub fn spawn(&mut self, pos: Vec2, mass: f32) -> Result<usize, PhysicsError> {
        Ok(self.add_point(VerletPoint::new(pos, mass)?))
    }

    /// Spring between `i` and `j` at their current distance.
    pub fn connect(&mut self, i: usize, j: usize, strength: f32) -> Result<usize, PhysicsError> {
        let c = VerletConnection::between(&self.points, i, j, strength)?;
        self.connections.push(c);
        Ok(self.connections.len() - 1)
    }

    pub fn connect_with_length(&mut self, i: usize, j: usize, len: f32, strength: f32) -> Result<usize, PhysicsError> {
        let c = VerletConnection::new(&self.points, i, j, len, strength)?;
        self.connections.push(c);
        Ok(self.connections.len() - 1)
    }

    pub fn add_rope(
        &mut self,
        start: Vec2,
        end: Vec2,
        segments: usize,
        mass: f32,
        strength: f32,
    ) -> Result<Range<usize>, PhysicsError> {
        append_rope(&mut self.points, &mut self.connections, start, end, segments, mass, strength)
    }

    pub fn add_cloth(&mut self, desc: &ClothDesc) -> Result<Range<usize>, PhysicsError> {
        append_cloth(&mut self.points, &mut self.connections, desc)
    }

    /// Pin or release a particle. Returns `false` for an unknown index.
    pub fn set_pinned(&mut self, index: usize, pinned: bool) -> bool {
        match self.points.get_mut(index) {
            Some(p) => {
                p.pinned = pinned;
                if pinned {
                    p.prev_pos = p.pos;
                }
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.connections.clear();
        self.frame = 0;
        self.perf_stats.reset();
    }

    // === Step ===

    /// Advance by `dt` split into `steps` sub-steps.
    pub fn step(&mut self, dt: f32, steps: u32, forces: &ExternalForces) {
        particle_step::step(self, dt, steps, forces);
    }

    /// Advance by `dt` with the configured sub-step count.
    pub fn tick(&mut self, dt: f32, forces: &ExternalForces) {
        let steps = self.settings.steps;
        self.step(dt, steps, forces);
    }

    // === Query ===

    /// Indices of particles whose center lies inside `range`
    pub fn query_range(&self, range: &Aabb) -> Vec<usize> {
        let mut ids: Vec<usize> = self.quadtree().query(range).into_iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids
    }

    /// Indices of particles within `radius` of `center`
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<usize> {
        let mut ids: Vec<usize> = self
            .quadtree()
            .query_radius(center, radius)
            .into_iter()
            .map(|p| p.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Quadtree over current particle centers
    pub fn quadtree(&self) -> Quadtree {
        let positions: Vec<Vec2> = self.points.iter().map(|p| p.pos).collect();
        // One unit of slack around the particle hull
        let square = Square::enclosing(&Aabb::from_points(&positions).expand(1.0));
        let tree = Quadtree::from_points(square, self.settings.quadtree_max_depth, &positions);
        if tree.dropped() > 0 {
            debug!(dropped = tree.dropped(), "coincident particles lost from range query");
        }
        tree
    }

    // === Read accessors ===

    pub fn points(&self) -> &[VerletPoint] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [VerletPoint] {
        &mut self.points
    }

    pub fn point(&self, index: usize) -> Option<&VerletPoint> {
        self.points.get(index)
    }

    pub fn connections(&self) -> &[VerletConnection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn kinetic_energy(&self) -> f32 {
        verlet::kinetic_energy(&self.points)
    }

    // === Settings ===

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: SimSettings) -> Result<(), PhysicsError> {
        settings.validate()?;
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
