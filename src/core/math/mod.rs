mod vec2;

pub use vec2::Vec2;

/// Division guard shared by area, distance and collision code.
pub const EPSILON: f32 = 1e-6;

/// True when `v` is within [`EPSILON`] of zero.
#[inline]
pub fn near_zero(v: f32) -> bool {
    v.abs() <= EPSILON
}
