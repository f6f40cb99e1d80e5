use crate::core::EPSILON;
use crate::systems::verlet::VerletPoint;

/// Push two overlapping disks apart; radius is the particle mass.
///
/// Each disk moves half the penetration along the connecting axis (a pinned
/// disk stays put and the other takes all of it). With `preserve_impulse`
/// the previous positions are rewritten so the implicit velocities exchange
/// their components along the axis, scaled by `damping`; without it the
/// overlap is removed and momentum is left to Verlet.
///
/// Returns `true` when the disks overlapped.
pub fn collide(a: &mut VerletPoint, b: &mut VerletPoint, preserve_impulse: bool, damping: f32) -> bool {
    if a.pinned && b.pinned {
        return false;
    }
    let delta = a.pos - b.pos;
    let dist_sq = delta.length_squared();
    let target = a.radius() + b.radius();
    if dist_sq >= target * target || dist_sq <= EPSILON * EPSILON {
        return false;
    }

    let dist = dist_sq.sqrt();
    // Negative: how far inside each other the disks sit, per unit of delta
    let factor = (dist - target) / dist;
    let (share_a, share_b) = match (a.pinned, b.pinned) {
        (true, false) => (0.0, 1.0),
        (false, true) => (1.0, 0.0),
        _ => (0.5, 0.5),
    };

    let mut va = a.velocity();
    let mut vb = b.velocity();

    a.pos -= delta * (factor * share_a);
    b.pos += delta * (factor * share_b);

    if preserve_impulse {
        let fa = damping * delta.dot(va) / dist_sq;
        let fb = damping * delta.dot(vb) / dist_sq;
        va += delta * (fb - fa);
        vb += delta * (fa - fb);
        if !a.pinned {
            a.prev_pos = a.pos - va;
        }
        if !b.pinned {
            b.prev_pos = b.pos - vb;
        }
    }
    true
}
