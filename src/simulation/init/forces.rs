use serde::{Deserialize, Serialize};

use crate::core::{Vec2, EPSILON};

/// Point that pulls particles toward itself within `radius`.
///
/// Pull falls off linearly from `strength` at the center to zero at the rim;
/// a negative strength repels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Attractor {
    pub pos: Vec2,
    pub strength: f32,
    pub radius: f32,
}

impl Attractor {
    pub fn new(pos: Vec2, strength: f32, radius: f32) -> Self {
        Self { pos, strength, radius: radius.max(0.0) }
    }

    /// Acceleration felt at `p`
    pub fn acceleration_at(&self, p: Vec2) -> Vec2 {
        let delta = self.pos - p;
        let dist = delta.length();
        if dist <= EPSILON || dist > self.radius {
            return Vec2::zero();
        }
        delta * (self.strength * (1.0 - dist / self.radius) / dist)
    }
}

/// Per-step inputs from outside the simulation (wind, pointer attractor)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalForces {
    /// Force on every particle; lighter particles drift more
    pub wind: Vec2,
    pub attractor: Option<Attractor>,
}

impl ExternalForces {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_wind(mut self, wind: Vec2) -> Self {
        self.wind = wind;
        self
    }

    pub fn with_attractor(mut self, attractor: Attractor) -> Self {
        self.attractor = Some(attractor);
        self
    }

    pub fn is_none(&self) -> bool {
        self.wind == Vec2::zero() && self.attractor.is_none()
    }
}
