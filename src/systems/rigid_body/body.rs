use crate::core::{PhysicsError, Vec2};
use crate::geometry::{Aabb, BoundingCircle, Polygon};

/// Rigid Body - polygon that moves and rotates as a unit
///
/// Mass and inertia come from the polygon's area and `density`. Local
/// vertices are rotated about the local origin and translated by `pos`, so
/// shapes should be centered on their centroid.
#[derive(Clone, Debug)]
pub struct RigidBody2D {
    // === Physics State ===
    /// World position of the local origin
    pub pos: Vec2,
    /// Velocity (units per second)
    pub vel: Vec2,
    /// Rotation angle (radians)
    pub rotation: f32,
    /// Angular velocity (radians per second)
    pub rotation_speed: f32,
    /// Bounciness (0.0 = no bounce, 1.0 = fully elastic)
    pub restitution: f32,
    /// Unique ID assigned by the owning system
    pub id: u32,

    // === Mass properties ===
    density: f32,
    mass: f32,
    moment_of_inertia: f32,

    // === Shape ===
    shape: Polygon,
    /// Local-space bounding circle
    local_bc: BoundingCircle,

    // === Derived world state ===
    aabb: Aabb,
    bc: BoundingCircle,
    prev_pos: Vec2,
    prev_rotation: f32,
    prev_verts: Vec<Vec2>,
    curr_verts: Vec<Vec2>,
}

impl RigidBody2D {
    /// Build a body and populate its world vertices.
    ///
    /// `bc` overrides the vertex-mean bounding circle (given in local space).
    pub fn new(
        pos: Vec2,
        vel: Vec2,
        shape: Polygon,
        density: f32,
        rotation: f32,
        rotation_speed: f32,
        bc: Option<BoundingCircle>,
    ) -> Result<Self, PhysicsError> {
        if density.is_nan() || density <= 0.0 || density.is_infinite() {
            return Err(PhysicsError::NonPositiveDensity);
        }
        // SAT contact only holds for convex outlines
        if let Some(index) = shape.reflex_vertex() {
            return Err(PhysicsError::NonConvexPolygon { index });
        }
        let mass = shape.area() * density;
        let moment_of_inertia = shape.moment_of_inertia(density);
        if mass <= 0.0 || moment_of_inertia <= 0.0 {
            return Err(PhysicsError::ZeroArea);
        }
        let local_bc = bc.unwrap_or_else(|| shape.bounding_circle());
        let curr_verts = shape.world_vertices(pos, rotation);

        let mut body = Self {
            pos,
            vel,
            rotation,
            rotation_speed,
            restitution: 1.0,
            id: 0,
            density,
            mass,
            moment_of_inertia,
            aabb: Aabb::from_points(&curr_verts),
            bc: local_bc,
            local_bc,
            prev_pos: pos,
            prev_rotation: rotation,
            prev_verts: curr_verts.clone(),
            curr_verts,
            shape,
        };
        body.update_object(0.0);
        Ok(body)
    }

    /// Convenience constructor from raw vertices
    pub fn from_vertices(pos: Vec2, vel: Vec2, verts: Vec<Vec2>, density: f32) -> Result<Self, PhysicsError> {
        Self::new(pos, vel, Polygon::new(verts)?, density, 0.0, 0.0, None)
    }

    /// Axis-aligned box centered on `pos`
    pub fn new_rect(pos: Vec2, width: f32, height: f32, density: f32) -> Result<Self, PhysicsError> {
        Self::new(pos, Vec2::zero(), Polygon::rectangle(width, height)?, density, 0.0, 0.0, None)
    }

    /// Integrate by `dt`, shift the current vertices into `prev_verts` and
    /// recompute world vertices and bounds.
    pub fn update_object(&mut self, dt: f32) {
        self.prev_pos = self.pos;
        self.prev_rotation = self.rotation;
        self.pos += self.vel * dt;
        self.rotation += self.rotation_speed * dt;
        std::mem::swap(&mut self.prev_verts, &mut self.curr_verts);
        self.refresh_world();
    }

    /// Move without touching velocity or the previous-step vertices
    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
        self.refresh_world();
    }

    /// Rewind the current transform to fraction `t` of the last step
    pub fn rewind_to(&mut self, t: f32) {
        self.pos = self.prev_pos.lerp(self.pos, t);
        self.rotation = self.prev_rotation + (self.rotation - self.prev_rotation) * t;
        self.refresh_world();
    }

    fn refresh_world(&mut self) {
        self.shape.world_vertices_into(self.pos, self.rotation, &mut self.curr_verts);
        self.aabb = Aabb::from_points(&self.curr_verts);
        self.bc = self.local_bc.at(self.pos + self.local_bc.center.rotate(self.rotation));
    }

    /// Velocity of the material point at world position `point`
    #[inline]
    pub fn velocity_at(&self, point: Vec2) -> Vec2 {
        let r = point - self.pos;
        self.vel + Vec2::new(-self.rotation_speed * r.y, self.rotation_speed * r.x)
    }

    /// Apply an impulse at world position `point`
    pub fn apply_impulse(&mut self, impulse: Vec2, point: Vec2) {
        self.vel += impulse * self.inverse_mass();
        self.rotation_speed += (point - self.pos).cross(impulse) * self.inverse_inertia();
    }

    /// Apply a force at the center for `dt`
    pub fn apply_force(&mut self, force: Vec2, dt: f32) {
        self.vel += force * (dt * self.inverse_mass());
    }

    pub fn set_restitution(&mut self, r: f32) {
        self.restitution = r.clamp(0.0, 1.0);
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inverse_mass(&self) -> f32 {
        1.0 / self.mass
    }

    pub fn moment_of_inertia(&self) -> f32 {
        self.moment_of_inertia
    }

    pub fn inverse_inertia(&self) -> f32 {
        1.0 / self.moment_of_inertia
    }

    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass
    }

    pub fn shape(&self) -> &Polygon {
        &self.shape
    }

    /// World vertices after the last update
    pub fn vertices(&self) -> &[Vec2] {
        &self.curr_verts
    }

    /// World vertices before the last update
    pub fn prev_vertices(&self) -> &[Vec2] {
        &self.prev_verts
    }

    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    pub fn bounding_circle(&self) -> &BoundingCircle {
        &self.bc
    }
}
