use wasm_bindgen::prelude::*;

use crate::core::{PhysicsError, Vec2};
use crate::geometry::Aabb;
use crate::systems::verlet::ClothDesc;

use super::forces::{Attractor, ExternalForces};
use super::particle::ParticleWorld;
use super::perf_stats::PerfStats;
use super::rigid::RigidWorld;
use super::settings::SimSettings;

#[inline]
fn js_err(e: PhysicsError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[inline]
fn range(x: f32, y: f32, w: f32, h: f32) -> Aabb {
    Aabb::from_min_max(Vec2::new(x, y), Vec2::new(x + w, y + h))
}

/// Interleaved `[x0, y0, x1, y1, ..]`
fn flatten(points: impl Iterator<Item = Vec2>) -> Vec<f32> {
    points.flat_map(|p| [p.x, p.y]).collect()
}

/// Browser handle for a particle world. Wind and the pointer attractor are
/// held here and passed into every step.
#[wasm_bindgen]
pub struct ParticleSim {
    core: ParticleWorld,
    forces: ExternalForces,
}

#[wasm_bindgen]
impl ParticleSim {
    /// Create a world with default settings
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<ParticleSim, JsValue> {
        let core = ParticleWorld::new(width, height, SimSettings::default()).map_err(js_err)?;
        Ok(ParticleSim { core, forces: ExternalForces::none() })
    }

    pub fn set_settings_json(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = SimSettings::from_json(json).map_err(js_err)?;
        self.core.set_settings(settings).map_err(js_err)
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.core.settings().to_json().map_err(js_err)
    }

    pub fn set_gravity(&mut self, x: f32, y: f32) -> Result<(), JsValue> {
        self.core.set_gravity(Vec2::new(x, y)).map_err(js_err)
    }

    pub fn set_wind(&mut self, x: f32, y: f32) {
        self.forces.wind = Vec2::new(x, y);
    }

    pub fn set_attractor(&mut self, x: f32, y: f32, strength: f32, radius: f32) {
        self.forces.attractor = Some(Attractor::new(Vec2::new(x, y), strength, radius));
    }

    pub fn clear_attractor(&mut self) {
        self.forces.attractor = None;
    }

    /// Add a particle; returns its index
    pub fn add_particle(&mut self, x: f32, y: f32, mass: f32) -> Result<u32, JsValue> {
        let idx = self.core.spawn(Vec2::new(x, y), mass).map_err(js_err)?;
        Ok(idx as u32)
    }

    pub fn set_pinned(&mut self, index: u32, pinned: bool) -> bool {
        self.core.set_pinned(index as usize, pinned)
    }

    /// Spring at the current distance; returns the connection index
    pub fn connect(&mut self, i: u32, j: u32, strength: f32) -> Result<u32, JsValue> {
        let idx = self.core.connect(i as usize, j as usize, strength).map_err(js_err)?;
        Ok(idx as u32)
    }

    /// Returns the index of the rope's first particle
    #[allow(clippy::too_many_arguments)]
    pub fn add_rope(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        segments: u32,
        mass: f32,
        strength: f32,
    ) -> Result<u32, JsValue> {
        let range = self
            .core
            .add_rope(Vec2::new(x1, y1), Vec2::new(x2, y2), segments as usize, mass, strength)
            .map_err(js_err)?;
        Ok(range.start as u32)
    }

    /// Returns the index of the cloth's first particle
    #[allow(clippy::too_many_arguments)]
    pub fn add_cloth(
        &mut self,
        x: f32,
        y: f32,
        columns: u32,
        rows: u32,
        spacing: f32,
        mass: f32,
        strength: f32,
        pin_top: bool,
    ) -> Result<u32, JsValue> {
        let desc = ClothDesc {
            origin: Vec2::new(x, y),
            columns: columns as usize,
            rows: rows as usize,
            spacing,
            mass,
            strength,
            pin_top,
            shear: true,
        };
        let range = self.core.add_cloth(&desc).map_err(js_err)?;
        Ok(range.start as u32)
    }

    /// Step with the configured sub-step count
    pub fn step(&mut self, dt: f32) {
        self.core.tick(dt, &self.forces);
    }

    pub fn step_with(&mut self, dt: f32, steps: u32) {
        self.core.step(dt, steps, &self.forces);
    }

    pub fn clear(&mut self) {
        self.core.clear();
    }

    /// Interleaved particle centers
    pub fn positions(&self) -> Vec<f32> {
        flatten(self.core.points().iter().map(|p| p.pos))
    }

    pub fn radii(&self) -> Vec<f32> {
        self.core.points().iter().map(|p| p.radius()).collect()
    }

    /// Render colors; particles without one report 0
    pub fn colors(&self) -> Vec<u32> {
        self.core.points().iter().map(|p| p.color.unwrap_or(0)).collect()
    }

    /// Interleaved spring endpoint indices
    pub fn connections(&self) -> Vec<u32> {
        self.core
            .connections()
            .iter()
            .flat_map(|c| c.ids().map(|i| i as u32))
            .collect()
    }

    pub fn query_range(&self, x: f32, y: f32, w: f32, h: f32) -> Vec<u32> {
        self.core.query_range(&range(x, y, w, h)).into_iter().map(|i| i as u32).collect()
    }

    pub fn particle_count(&self) -> u32 {
        self.core.len() as u32
    }

    pub fn connection_count(&self) -> u32 {
        self.core.connections().len() as u32
    }

    pub fn frame(&self) -> f64 {
        self.core.frame() as f64
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.core.kinetic_energy()
    }

    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.perf_stats()
    }
}

/// Browser handle for a rigid-body world
#[wasm_bindgen]
pub struct RigidSim {
    core: RigidWorld,
    forces: ExternalForces,
}

#[wasm_bindgen]
impl RigidSim {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<RigidSim, JsValue> {
        let core = RigidWorld::new(width, height, SimSettings::default()).map_err(js_err)?;
        Ok(RigidSim { core, forces: ExternalForces::none() })
    }

    pub fn set_settings_json(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = SimSettings::from_json(json).map_err(js_err)?;
        self.core.set_settings(settings).map_err(js_err)
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.core.settings().to_json().map_err(js_err)
    }

    pub fn set_gravity(&mut self, x: f32, y: f32) -> Result<(), JsValue> {
        self.core.set_gravity(Vec2::new(x, y)).map_err(js_err)
    }

    pub fn set_wind(&mut self, x: f32, y: f32) {
        self.forces.wind = Vec2::new(x, y);
    }

    pub fn set_attractor(&mut self, x: f32, y: f32, strength: f32, radius: f32) {
        self.forces.attractor = Some(Attractor::new(Vec2::new(x, y), strength, radius));
    }

    pub fn clear_attractor(&mut self) {
        self.forces.attractor = None;
    }

    /// Spawn a box centered on (x, y); returns the body ID
    pub fn spawn_rect(&mut self, x: f32, y: f32, w: f32, h: f32, density: f32) -> Result<u32, JsValue> {
        self.core.spawn_rect(Vec2::new(x, y), w, h, density).map_err(js_err)
    }

    /// `verts` are interleaved local coordinates
    pub fn spawn_polygon(&mut self, x: f32, y: f32, verts: Vec<f32>, density: f32) -> Result<u32, JsValue> {
        let local = verts.chunks_exact(2).map(|c| Vec2::new(c[0], c[1])).collect();
        self.core.spawn_polygon(Vec2::new(x, y), local, density).map_err(js_err)
    }

    pub fn spawn_regular(&mut self, x: f32, y: f32, radius: f32, sides: u32, density: f32) -> Result<u32, JsValue> {
        self.core
            .spawn_regular(Vec2::new(x, y), radius, sides as usize, density)
            .map_err(js_err)
    }

    pub fn remove_body(&mut self, id: u32) -> bool {
        self.core.remove_body(id)
    }

    pub fn set_velocity(&mut self, id: u32, vx: f32, vy: f32) -> bool {
        match self.core.body_mut(id) {
            Some(body) => {
                body.vel = Vec2::new(vx, vy);
                true
            }
            None => false,
        }
    }

    pub fn set_rotation_speed(&mut self, id: u32, speed: f32) -> bool {
        match self.core.body_mut(id) {
            Some(body) => {
                body.rotation_speed = speed;
                true
            }
            None => false,
        }
    }

    pub fn step(&mut self, dt: f32) {
        self.core.tick(dt, &self.forces);
    }

    pub fn step_with(&mut self, dt: f32, steps: u32) {
        self.core.step(dt, steps, &self.forces);
    }

    pub fn clear(&mut self) {
        self.core.clear();
    }

    pub fn body_count(&self) -> u32 {
        self.core.body_count() as u32
    }

    pub fn body_ids(&self) -> Vec<u32> {
        self.core.bodies().iter().map(|b| b.id).collect()
    }

    /// `[x, y, rotation]` per body, in `body_ids` order
    pub fn transforms(&self) -> Vec<f32> {
        self.core
            .bodies()
            .iter()
            .flat_map(|b| [b.pos.x, b.pos.y, b.rotation])
            .collect()
    }

    /// Interleaved world vertices of one body (empty for an unknown ID)
    pub fn body_vertices(&self, id: u32) -> Vec<f32> {
        match self.core.body(id) {
            Some(body) => flatten(body.vertices().iter().copied()),
            None => Vec::new(),
        }
    }

    pub fn body_velocity(&self, id: u32) -> Vec<f32> {
        match self.core.body(id) {
            Some(body) => vec![body.vel.x, body.vel.y, body.rotation_speed],
            None => Vec::new(),
        }
    }

    pub fn query_range(&self, x: f32, y: f32, w: f32, h: f32) -> Vec<u32> {
        self.core.query_range(&range(x, y, w, h))
    }

    pub fn frame(&self) -> f64 {
        self.core.frame() as f64
    }

    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.perf_stats()
    }
}
