//! Impulse response between two rigid bodies
//!
//! `j = -(1 + e) * vn / (1/ma + 1/mb + (ra×n)²/Ia + (rb×n)²/Ib)`
//! applied as `+j·n` to B and `-j·n` to A at the contact point.

use crate::core::EPSILON;
use crate::systems::collision::Contact;

use super::RigidBody2D;

/// Share of the penetration removed per correction
const CORRECTION_PERCENT: f32 = 0.4;
/// Penetration tolerated without correction
const CORRECTION_SLOP: f32 = 0.01;

/// Apply the collision impulse for `contact` (normal from `a` to `b`).
///
/// Returns the impulse magnitude, or `None` when the bodies are already
/// separating at the contact point.
pub fn resolve_collision(a: &mut RigidBody2D, b: &mut RigidBody2D, contact: &Contact, restitution: f32) -> Option<f32> {
    let n = contact.normal;
    let ra = contact.point - a.pos;
    let rb = contact.point - b.pos;

    let relative = b.velocity_at(contact.point) - a.velocity_at(contact.point);
    let vn = relative.dot(n);
    if vn > 0.0 {
        return None;
    }

    let ra_n = ra.cross(n);
    let rb_n = rb.cross(n);
    let denom = a.inverse_mass()
        + b.inverse_mass()
        + ra_n * ra_n * a.inverse_inertia()
        + rb_n * rb_n * b.inverse_inertia();
    if denom <= EPSILON * EPSILON {
        return None;
    }

    let j = -(1.0 + restitution) * vn / denom;
    let impulse = n * j;
    a.apply_impulse(-impulse, contact.point);
    b.apply_impulse(impulse, contact.point);
    Some(j)
}

/// Push overlapping bodies apart along the contact normal, split by inverse
/// mass.
pub fn correct_positions(a: &mut RigidBody2D, b: &mut RigidBody2D, contact: &Contact) {
    let excess = contact.depth - CORRECTION_SLOP;
    if excess <= 0.0 {
        return;
    }
    let wa = a.inverse_mass();
    let wb = b.inverse_mass();
    let correction = contact.normal * (excess / (wa + wb) * CORRECTION_PERCENT);
    a.translate(-correction * wa);
    b.translate(correction * wb);
}
