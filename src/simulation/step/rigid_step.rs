use tracing::trace;

use crate::core::Vec2;
use crate::geometry::Aabb;
use crate::spatial::fixed_grid;
use crate::systems::collision::{polygon_contact, swept_contact};
use crate::systems::rigid_body::{correct_positions, resolve_collision, RigidBody2D};

use super::forces::ExternalForces;
use super::pair_mut;
use super::perf_timer::{lap, PerfTimer};
use super::rigid::RigidWorld;
use super::settings::MAX_STEPS;

/// One tick: for each sub-step, forces, broad phase, narrow phase and
/// impulses, then integration and the container walls.
pub(super) fn step(world: &mut RigidWorld, dt: f32, steps: u32, forces: &ExternalForces) {
    let perf_on = world.perf_enabled;
    if perf_on {
        world.perf_stats.reset();
        world.perf_stats.entity_count = world.bodies.len() as u32;
    }
    world.frame += 1;
    if !dt.is_finite() || dt <= 0.0 || world.bodies.is_empty() {
        return;
    }
    let step_start = PerfTimer::start_if(perf_on);
    let steps = steps.clamp(1, MAX_STEPS);
    let sub_dt = dt / steps as f32;

    for _ in 0..steps {
        let t0 = PerfTimer::start_if(perf_on);
        apply_forces(world, forces, sub_dt);
        if perf_on {
            world.perf_stats.integrate_ms += lap(t0);
        }

        resolve_contacts(world);

        let t0 = PerfTimer::start_if(perf_on);
        for body in world.bodies.iter_mut() {
            body.update_object(sub_dt);
        }
        let reflect = world.settings.wall_reflection.then_some(world.settings.restitution);
        for body in world.bodies.iter_mut() {
            bounce_off_walls(body, &world.bounds, reflect);
        }
        if perf_on {
            world.perf_stats.integrate_ms += lap(t0);
        }
    }

    if perf_on {
        world.perf_stats.step_ms = lap(step_start);
    }
}

fn apply_forces(world: &mut RigidWorld, forces: &ExternalForces, dt: f32) {
    let gravity = world.settings.gravity;
    for body in world.bodies.iter_mut() {
        body.vel += gravity * dt;
        if forces.wind != Vec2::zero() {
            body.apply_force(forces.wind, dt);
        }
        if let Some(attractor) = forces.attractor {
            body.vel += attractor.acceleration_at(body.pos) * dt;
        }
    }
}

/// Box covering the body over its last move
#[inline]
fn swept_bounds(body: &RigidBody2D) -> Aabb {
    let prev = Aabb::from_points(body.prev_vertices());
    let curr = body.aabb();
    Aabb::from_min_max(prev.min().min(curr.min()), prev.max().max(curr.max()))
}

/// Candidate pairs from the grid, then SAT on the current pose; pairs that
/// do not overlap now but crossed during the last move get a swept contact
/// and are rewound to the time of impact.
fn resolve_contacts(world: &mut RigidWorld) {
    let perf_on = world.perf_enabled;
    let t0 = PerfTimer::start_if(perf_on);

    let boxes: Vec<Aabb> = world.bodies.iter().map(swept_bounds).collect();
    let mut pairs = Vec::new();
    let stats = fixed_grid(&boxes, world.settings.grid_cell_size, world.settings.pair_policy, |i, j| {
        if boxes[i].intersects(&boxes[j]) {
            pairs.push((i, j));
        }
    });
    // Impulses are not idempotent, so each pair resolves once per sub-step
    pairs.sort_unstable();
    pairs.dedup();
    let broad_ms = lap(t0);

    let t0 = PerfTimer::start_if(perf_on);
    let mut resolved = 0u32;
    for (i, j) in pairs {
        let (a, b) = pair_mut(&mut world.bodies, i, j);
        let restitution = a.restitution.min(b.restitution);

        if let Some(contact) = polygon_contact(a.vertices(), b.vertices()) {
            if resolve_collision(a, b, &contact, restitution).is_some() {
                resolved += 1;
            }
            correct_positions(a, b, &contact);
            continue;
        }

        let Some(contact) = swept_contact(a.prev_vertices(), a.vertices(), b.prev_vertices(), b.vertices()) else {
            continue;
        };
        // Crossings made while separating (leaving an old overlap) need no response
        let approach = (b.velocity_at(contact.point) - a.velocity_at(contact.point)).dot(contact.normal);
        if approach >= 0.0 {
            continue;
        }
        a.rewind_to(contact.toi);
        b.rewind_to(contact.toi);
        if resolve_collision(a, b, &contact, restitution).is_some() {
            trace!(a = a.id, b = b.id, toi = contact.toi, "swept contact");
            resolved += 1;
        }
    }
    trace!(candidates = stats.pairs, resolved, "rigid contacts");

    if perf_on {
        world.perf_stats.broad_phase_ms += broad_ms;
        world.perf_stats.narrow_phase_ms += lap(t0);
        world.perf_stats.candidate_pairs += stats.pairs as u32;
        world.perf_stats.contacts_resolved += resolved;
    }
}

/// Push a body back inside `bounds`. The outward velocity component is
/// reflected and scaled by `reflect`, or zeroed when `reflect` is `None`.
fn bounce_off_walls(body: &mut RigidBody2D, bounds: &Aabb, reflect: Option<f32>) {
    let lo = bounds.min();
    let hi = bounds.max();
    let bmin = body.aabb().min();
    let bmax = body.aabb().max();
    let mut shift = Vec2::zero();
    let rebound = |v: f32| reflect.map_or(0.0, |r| -v * r);

    if bmin.x < lo.x {
        shift.x = lo.x - bmin.x;
        if body.vel.x < 0.0 {
            body.vel.x = rebound(body.vel.x);
        }
    } else if bmax.x > hi.x {
        shift.x = hi.x - bmax.x;
        if body.vel.x > 0.0 {
            body.vel.x = rebound(body.vel.x);
        }
    }
    if bmin.y < lo.y {
        shift.y = lo.y - bmin.y;
        if body.vel.y < 0.0 {
            body.vel.y = rebound(body.vel.y);
        }
    } else if bmax.y > hi.y {
        shift.y = hi.y - bmax.y;
        if body.vel.y > 0.0 {
            body.vel.y = rebound(body.vel.y);
        }
    }

    if shift != Vec2::zero() {
        body.translate(shift);
    }
}
