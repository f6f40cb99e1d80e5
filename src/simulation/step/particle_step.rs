use tracing::trace;

use crate::core::{Vec2, EPSILON};
use crate::geometry::Aabb;
use crate::spatial::fixed_grid;
use crate::systems::collision::collide;
use crate::systems::verlet::{accelerate, apply_acceleration, apply_force, bound, inertia, spring_constrain};

use super::forces::{Attractor, ExternalForces};
use super::particle::ParticleWorld;
use super::perf_timer::{lap, PerfTimer};
use super::settings::MAX_STEPS;
use super::pair_mut;

/// One tick: `steps` sub-steps of `dt / steps`, each running every phase to
/// completion for all particles before the next phase starts.
pub(super) fn step(world: &mut ParticleWorld, dt: f32, steps: u32, forces: &ExternalForces) {
    let perf_on = world.perf_enabled;
    if perf_on {
        world.perf_stats.reset();
        world.perf_stats.entity_count = world.points.len() as u32;
    }
    world.frame += 1;
    if !dt.is_finite() || dt <= 0.0 || world.points.is_empty() {
        return;
    }
    let step_start = PerfTimer::start_if(perf_on);
    let steps = steps.clamp(1, MAX_STEPS);
    let sub_dt = dt / steps as f32;

    for _ in 0..steps {
        // Forces + integration
        let t0 = PerfTimer::start_if(perf_on);
        apply_acceleration(&mut world.points, world.settings.gravity);
        if forces.wind != Vec2::zero() {
            apply_force(&mut world.points, forces.wind);
        }
        if let Some(attractor) = forces.attractor {
            let dropped = apply_attractor(world, &attractor);
            if perf_on {
                world.perf_stats.quadtree_dropped += dropped as u32;
            }
        }
        accelerate(&mut world.points, sub_dt);
        if perf_on {
            world.perf_stats.integrate_ms += lap(t0);
        }

        // Springs
        let t0 = PerfTimer::start_if(perf_on);
        spring_constrain(&mut world.points, &world.connections);
        if perf_on {
            world.perf_stats.constraint_ms += lap(t0);
        }

        if world.settings.particle_collisions {
            resolve_overlaps(world);
        }

        // Container + velocity carry
        let t0 = PerfTimer::start_if(perf_on);
        bound(&mut world.points, &world.bounds, world.settings.wall_reflect());
        inertia(&mut world.points);
        if perf_on {
            world.perf_stats.integrate_ms += lap(t0);
        }
    }

    if perf_on {
        world.perf_stats.step_ms = lap(step_start);
    }
}

/// Add the attractor's pull to every particle within its radius, found
/// through a quadtree over the current positions. Returns how many
/// particles the depth cap kept out of the tree.
fn apply_attractor(world: &mut ParticleWorld, attractor: &Attractor) -> usize {
    if attractor.radius <= EPSILON || attractor.strength == 0.0 {
        return 0;
    }
    let tree = world.quadtree();
    for hit in tree.query_radius(attractor.pos, attractor.radius) {
        let p = &mut world.points[hit.id];
        if !p.pinned {
            p.acc += attractor.acceleration_at(hit.pos);
        }
    }
    tree.dropped()
}

/// Grid broad phase + disk overlap resolution
fn resolve_overlaps(world: &mut ParticleWorld) {
    let perf_on = world.perf_enabled;
    let t0 = PerfTimer::start_if(perf_on);

    let mut boxes = std::mem::take(&mut world.boxes);
    boxes.clear();
    boxes.extend(world.points.iter().map(|p| Aabb::new(p.pos, p.radius(), p.radius())));

    let mut pairs = Vec::new();
    let stats = fixed_grid(&boxes, world.settings.grid_cell_size, world.settings.pair_policy, |i, j| {
        if boxes[i].intersects(&boxes[j]) {
            pairs.push((i, j));
        }
    });
    world.boxes = boxes;
    let broad_ms = lap(t0);

    let t0 = PerfTimer::start_if(perf_on);
    let preserve = world.settings.preserve_impulse;
    let damping = world.settings.collision_damping;
    let mut resolved = 0u32;
    for (i, j) in pairs {
        let (a, b) = pair_mut(&mut world.points, i, j);
        if collide(a, b, preserve, damping) {
            resolved += 1;
        }
    }
    trace!(candidates = stats.pairs, resolved, "particle overlaps");

    if perf_on {
        world.perf_stats.broad_phase_ms += broad_ms;
        world.perf_stats.narrow_phase_ms += lap(t0);
        world.perf_stats.candidate_pairs += stats.pairs as u32;
        world.perf_stats.contacts_resolved += resolved;
    }
}
