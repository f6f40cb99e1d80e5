use crate::core::{PhysicsError, Vec2};

/// Position-Verlet particle.
///
/// Velocity is implicit (`pos - prev_pos`). `acc` accumulates forces and is
/// cleared after every integration. `mass` doubles as the collision radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerletPoint {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub acc: Vec2,
    mass: f32,
    /// Pinned points ignore integration, springs and collisions
    pub pinned: bool,
    /// Render hint, untouched by the solver
    pub color: Option<u32>,
}

impl VerletPoint {
    pub fn new(pos: Vec2, mass: f32) -> Result<Self, PhysicsError> {
        if mass.is_nan() || mass <= 0.0 || mass.is_infinite() {
            return Err(PhysicsError::NonPositiveMass);
        }
        Ok(Self {
            pos,
            prev_pos: pos,
            acc: Vec2::zero(),
            mass,
            pinned: false,
            color: None,
        })
    }

    /// Start with an initial per-step displacement
    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.prev_pos = self.pos - vel;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        if self.pinned {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.mass
    }

    /// Implicit displacement per step
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.pos - self.prev_pos
    }

    /// Move to `pos` and drop all momentum
    pub fn teleport(&mut self, pos: Vec2) {
        self.pos = pos;
        self.prev_pos = pos;
    }
}
