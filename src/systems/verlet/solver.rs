//! Verlet solver phases
//!
//! One sub-step runs, in this order:
//! 1. [`apply_force`] / [`apply_acceleration`] - accumulate into `acc`
//! 2. [`accelerate`] - `pos += acc * dt²`, clear `acc`
//! 3. [`spring_constrain`] - pull connected pairs toward rest length
//! 4. [`bound`] - clamp into the container
//! 5. [`inertia`] - carry implicit velocity: `pos = 2 * pos - prev_pos`
//!
//! Every phase finishes for all particles before the next one starts.
//! Single-particle phases run on rayon when the `parallel` feature is on;
//! the spring pass touches pairs and always runs sequentially.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{Vec2, EPSILON};
use crate::geometry::Aabb;

use super::{VerletConnection, VerletPoint};

#[inline]
fn for_each_point<F>(points: &mut [VerletPoint], f: F)
where
    F: Fn(&mut VerletPoint) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        points.par_iter_mut().for_each(f);
    }
    #[cfg(not(feature = "parallel"))]
    {
        points.iter_mut().for_each(f);
    }
}

/// Accumulate a force; heavier particles accelerate less.
pub fn apply_force(points: &mut [VerletPoint], force: Vec2) {
    for_each_point(points, |p| {
        let inv = p.inverse_mass();
        p.acc += force * inv;
    });
}

/// Accumulate a mass-independent acceleration (gravity).
pub fn apply_acceleration(points: &mut [VerletPoint], acc: Vec2) {
    for_each_point(points, |p| {
        if !p.pinned {
            p.acc += acc;
        }
    });
}

pub fn accelerate(points: &mut [VerletPoint], dt: f32) {
    let dt2 = dt * dt;
    for_each_point(points, |p| {
        if !p.pinned {
            p.pos += p.acc * dt2;
        }
        p.acc = Vec2::zero();
    });
}

/// Move each connected pair toward its rest length. The correction is split
/// by inverse mass and scaled by the connection's strength; pinned ends take
/// none of it. Connections naming a particle past the end of `points` are
/// skipped.
pub fn spring_constrain(points: &mut [VerletPoint], connections: &[VerletConnection]) {
    for c in connections {
        let [i, j] = c.ids();
        let (Some(&a), Some(&b)) = (points.get(i), points.get(j)) else {
            continue;
        };
        let wa = a.inverse_mass();
        let wb = b.inverse_mass();
        let w = wa + wb;
        if w <= EPSILON {
            continue;
        }
        let delta = b.pos - a.pos;
        let dist = delta.length();
        if dist <= EPSILON {
            continue;
        }
        let correction = delta * ((dist - c.len) / dist * c.strength);
        points[i].pos += correction * (wa / w);
        points[j].pos -= correction * (wb / w);
    }
}

/// Keep every particle inside `area`, inset by its radius.
///
/// With `reflect = Some(damping)` a particle that was moving outward has its
/// `prev_pos` mirrored so the next [`inertia`] carries it back in with
/// `damping` of its speed; with `None` the wall simply absorbs the motion.
pub fn bound(points: &mut [VerletPoint], area: &Aabb, reflect: Option<f32>) {
    let lo = area.min();
    let hi = area.max();
    for_each_point(points, |p| {
        let r = p.radius();
        let vel = p.velocity();
        let (min_x, max_x) = inset(lo.x, hi.x, r);
        let (min_y, max_y) = inset(lo.y, hi.y, r);

        let out_x = (p.pos.x < min_x && vel.x < 0.0) || (p.pos.x > max_x && vel.x > 0.0);
        let out_y = (p.pos.y < min_y && vel.y < 0.0) || (p.pos.y > max_y && vel.y > 0.0);
        p.pos.x = p.pos.x.clamp(min_x, max_x);
        p.pos.y = p.pos.y.clamp(min_y, max_y);
        if let Some(damping) = reflect {
            if out_x {
                p.prev_pos.x = p.pos.x + vel.x * damping;
            }
            if out_y {
                p.prev_pos.y = p.pos.y + vel.y * damping;
            }
        }
    });
}

/// Inner interval of `[lo, hi]` shrunk by `r`; collapses to the midpoint
/// when the container is narrower than the particle.
#[inline]
fn inset(lo: f32, hi: f32, r: f32) -> (f32, f32) {
    if hi - lo < 2.0 * r {
        let mid = (lo + hi) * 0.5;
        (mid, mid)
    } else {
        (lo + r, hi - r)
    }
}

pub fn inertia(points: &mut [VerletPoint]) {
    for_each_point(points, |p| {
        if p.pinned {
            p.prev_pos = p.pos;
            return;
        }
        let before = p.pos;
        p.pos = p.pos * 2.0 - p.prev_pos;
        p.prev_pos = before;
    });
}

/// Σ ½ m |v|² using the implicit per-step velocity
pub fn kinetic_energy(points: &[VerletPoint]) -> f32 {
    points
        .iter()
        .filter(|p| !p.pinned)
        .map(|p| 0.5 * p.mass() * p.velocity().length_squared())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::XorShift32;

    fn point(x: f32, y: f32, mass: f32) -> VerletPoint {
        VerletPoint::new(Vec2::new(x, y), mass).unwrap()
    }

    #[test]
    fn resting_particle_stays_put() {
        let mut pts = vec![point(4.0, 7.0, 1.0)];
        for _ in 0..100 {
            accelerate(&mut pts, 0.016);
            inertia(&mut pts);
        }
        assert_eq!(pts[0].pos, Vec2::new(4.0, 7.0));
        assert_eq!(pts[0].prev_pos, Vec2::new(4.0, 7.0));
    }

    #[test]
    fn accelerate_consumes_accumulator() {
        let mut pts = vec![point(0.0, 0.0, 2.0)];
        apply_force(&mut pts, Vec2::new(4.0, 0.0));
        assert_eq!(pts[0].acc, Vec2::new(2.0, 0.0));
        accelerate(&mut pts, 0.5);
        assert_eq!(pts[0].pos, Vec2::new(0.5, 0.0));
        assert_eq!(pts[0].acc, Vec2::zero());
    }

    #[test]
    fn inertia_carries_velocity() {
        let mut pts = vec![point(1.0, 0.0, 1.0)];
        pts[0].prev_pos = Vec2::new(0.0, 0.0);
        inertia(&mut pts);
        assert_eq!(pts[0].pos, Vec2::new(2.0, 0.0));
        assert_eq!(pts[0].prev_pos, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn pinned_points_do_not_move() {
        let mut pts = vec![point(1.0, 1.0, 1.0).pinned()];
        apply_acceleration(&mut pts, Vec2::new(0.0, 10.0));
        accelerate(&mut pts, 1.0);
        inertia(&mut pts);
        assert_eq!(pts[0].pos, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn spring_reaches_rest_length_at_full_strength() {
        let mut pts = vec![point(0.0, 0.0, 1.0), point(10.0, 0.0, 1.0)];
        let c = VerletConnection::new(&pts, 0, 1, 4.0, 1.0).unwrap();
        spring_constrain(&mut pts, &[c]);
        assert!((pts[0].pos.distance(pts[1].pos) - 4.0).abs() < 1e-5);
        // Equal masses move symmetrically
        assert!((pts[0].pos.x - 3.0).abs() < 1e-5);
        assert!((pts[1].pos.x - 7.0).abs() < 1e-5);
    }

    #[test]
    fn spring_correction_split_by_inverse_mass() {
        let mut pts = vec![point(0.0, 0.0, 1.0), point(10.0, 0.0, 3.0)];
        let c = VerletConnection::new(&pts, 0, 1, 6.0, 1.0).unwrap();
        spring_constrain(&mut pts, &[c]);
        // Light end takes 3/4 of the 4-unit error
        assert!((pts[0].pos.x - 3.0).abs() < 1e-5);
        assert!((pts[1].pos.x - 9.0).abs() < 1e-5);
    }

    #[test]
    fn spring_with_pinned_end_moves_only_the_free_end() {
        let mut pts = vec![point(0.0, 0.0, 1.0).pinned(), point(0.0, 10.0, 1.0)];
        let c = VerletConnection::new(&pts, 0, 1, 5.0, 0.5).unwrap();
        spring_constrain(&mut pts, &[c]);
        assert_eq!(pts[0].pos, Vec2::zero());
        assert!((pts[1].pos.y - 7.5).abs() < 1e-5);
    }

    #[test]
    fn spring_skips_indices_past_a_shorter_slice() {
        let pts = vec![point(0.0, 0.0, 1.0), point(10.0, 0.0, 1.0), point(20.0, 0.0, 1.0)];
        let c = VerletConnection::new(&pts, 1, 2, 4.0, 1.0).unwrap();
        let mut short = pts[..2].to_vec();
        spring_constrain(&mut short, &[c]);
        assert_eq!(short[0].pos, Vec2::new(0.0, 0.0));
        assert_eq!(short[1].pos, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn bound_contains_any_start_position() {
        let size = 100.0;
        let area = Aabb::from_min_max(Vec2::zero(), Vec2::new(size, size));
        let mut rng = XorShift32::new(99);
        let mut pts: Vec<VerletPoint> = (0..500)
            .map(|_| point(rng.range(-300.0, 400.0), rng.range(-300.0, 400.0), rng.range(0.5, 8.0)))
            .collect();
        bound(&mut pts, &area, None);
        for p in &pts {
            let r = p.radius();
            assert!(p.pos.x >= r && p.pos.x <= size - r, "{:?}", p.pos);
            assert!(p.pos.y >= r && p.pos.y <= size - r, "{:?}", p.pos);
        }
    }

    #[test]
    fn reflecting_wall_reverses_velocity() {
        let area = Aabb::from_min_max(Vec2::zero(), Vec2::new(100.0, 100.0));
        let mut pts = vec![point(103.0, 50.0, 1.0)];
        pts[0].prev_pos = Vec2::new(98.0, 50.0);
        bound(&mut pts, &area, Some(0.5));
        assert_eq!(pts[0].pos.x, 99.0);
        assert!((pts[0].velocity().x + 2.5).abs() < 1e-5);
        inertia(&mut pts);
        assert!(pts[0].pos.x < 99.0);
    }

    #[test]
    fn gravity_fall_matches_scheme() {
        // Two sub-steps of accelerate + inertia from rest
        let mut pts = vec![point(0.0, 0.0, 1.0)];
        for _ in 0..2 {
            apply_acceleration(&mut pts, Vec2::new(0.0, 1.0));
            accelerate(&mut pts, 1.0);
            inertia(&mut pts);
        }
        assert!(pts[0].pos.y > 0.0);
        assert!(kinetic_energy(&pts) > 0.0);
    }
}
