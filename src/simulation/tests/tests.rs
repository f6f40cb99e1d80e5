use super::*;
use crate::core::{PhysicsError, Vec2};
use crate::geometry::Aabb;
use crate::spatial::PairPolicy;

fn still() -> SimSettings {
    SimSettings {
        gravity: Vec2::zero(),
        ..SimSettings::default()
    }
}

// === Settings ===

#[test]
fn default_settings_validate() {
    assert_eq!(SimSettings::default().validate(), Ok(()));
}

#[test]
fn settings_json_fills_missing_fields() {
    let s = SimSettings::from_json(r#"{ "steps": 4, "pair_policy": "every_bucket" }"#).unwrap();
    assert_eq!(s.steps, 4);
    assert_eq!(s.pair_policy, PairPolicy::EveryBucket);
    assert_eq!(s.grid_cell_size, SimSettings::default().grid_cell_size);
}

#[test]
fn settings_json_round_trip_keeps_values() {
    let s = SimSettings {
        gravity: Vec2::new(1.0, -2.0),
        preserve_impulse: false,
        ..SimSettings::default()
    };
    let back = SimSettings::from_json(&s.to_json().unwrap()).unwrap();
    assert_eq!(back, s);
}

#[test]
fn settings_out_of_range_are_rejected() {
    let err = SimSettings::from_json(r#"{ "steps": 0 }"#).unwrap_err();
    assert!(matches!(err, PhysicsError::InvalidConfiguration { .. }));
    let bad = SimSettings {
        restitution: 1.5,
        ..SimSettings::default()
    };
    assert!(bad.validate().is_err());
    let bad = SimSettings {
        grid_cell_size: 0.0,
        ..SimSettings::default()
    };
    assert!(bad.validate().is_err());
}

#[test]
fn malformed_settings_json_is_a_parse_error() {
    let err = SimSettings::from_json("{ steps: ").unwrap_err();
    assert!(matches!(err, PhysicsError::SettingsParse { .. }));
}

// === Helpers ===

#[test]
fn pair_mut_returns_both_elements() {
    let mut v = [1, 2, 3, 4];
    let (a, b) = pair_mut(&mut v, 1, 3);
    std::mem::swap(a, b);
    assert_eq!(v, [1, 4, 3, 2]);
}

#[test]
fn attractor_pull_fades_to_rim() {
    let a = Attractor::new(Vec2::zero(), 10.0, 4.0);
    assert_eq!(a.acceleration_at(Vec2::new(5.0, 0.0)), Vec2::zero());
    let near = a.acceleration_at(Vec2::new(1.0, 0.0));
    let far = a.acceleration_at(Vec2::new(3.0, 0.0));
    assert!(near.x < 0.0 && far.x < 0.0);
    assert!(near.length() > far.length());
}

// === ParticleWorld ===

#[test]
fn particle_world_rejects_empty_bounds() {
    assert!(ParticleWorld::new(0.0, 10.0, SimSettings::default()).is_err());
}

#[test]
fn particle_falls_and_stays_in_container() {
    let mut world = ParticleWorld::new(100.0, 100.0, SimSettings::default()).unwrap();
    world.spawn(Vec2::new(50.0, 10.0), 2.0).unwrap();
    world.step(0.05, 4, &ExternalForces::none());
    assert!(world.points()[0].pos.y > 10.0);

    for _ in 0..300 {
        world.tick(1.0 / 60.0, &ExternalForces::none());
    }
    // Bound runs before the final inertia carry, so allow one step of overshoot
    let p = world.points()[0];
    assert!(p.pos.y <= 100.0 && p.pos.y >= 0.0, "{:?}", p.pos);
    assert_eq!(world.frame(), 301);
}

#[test]
fn overlapping_particles_are_separated() {
    let mut world = ParticleWorld::new(100.0, 100.0, still()).unwrap();
    world.spawn(Vec2::new(50.0, 50.0), 1.0).unwrap();
    world.spawn(Vec2::new(50.5, 50.0), 1.0).unwrap();
    world.step(0.016, 1, &ExternalForces::none());
    let d = world.points()[0].pos.distance(world.points()[1].pos);
    assert!((d - 2.0).abs() < 1e-4, "distance {d}");
}

#[test]
fn collisions_can_be_disabled() {
    let settings = SimSettings {
        particle_collisions: false,
        ..still()
    };
    let mut world = ParticleWorld::new(100.0, 100.0, settings).unwrap();
    world.spawn(Vec2::new(50.0, 50.0), 1.0).unwrap();
    world.spawn(Vec2::new(50.5, 50.0), 1.0).unwrap();
    world.step(0.016, 1, &ExternalForces::none());
    assert_eq!(world.points()[1].pos, Vec2::new(50.5, 50.0));
}

#[test]
fn every_bucket_policy_gives_same_separation() {
    let settings = SimSettings {
        pair_policy: PairPolicy::EveryBucket,
        grid_cell_size: 1.0,
        ..still()
    };
    let mut world = ParticleWorld::new(100.0, 100.0, settings).unwrap();
    world.spawn(Vec2::new(50.0, 50.0), 1.0).unwrap();
    world.spawn(Vec2::new(50.5, 50.0), 1.0).unwrap();
    world.step(0.016, 1, &ExternalForces::none());
    let d = world.points()[0].pos.distance(world.points()[1].pos);
    assert!((d - 2.0).abs() < 1e-4, "distance {d}");
}

#[test]
fn attractor_pulls_particles_in_range() {
    let mut world = ParticleWorld::new(100.0, 100.0, still()).unwrap();
    world.spawn(Vec2::new(60.0, 50.0), 1.0).unwrap();
    world.spawn(Vec2::new(95.0, 50.0), 1.0).unwrap();
    let forces = ExternalForces::none().with_attractor(Attractor::new(Vec2::new(50.0, 50.0), 100.0, 30.0));
    world.step(0.1, 1, &forces);
    assert!(world.points()[0].pos.x < 60.0);
    // Outside the radius
    assert_eq!(world.points()[1].pos.x, 95.0);
}

#[test]
fn wind_pushes_light_particles_further() {
    let mut world = ParticleWorld::new(1000.0, 1000.0, still()).unwrap();
    world.spawn(Vec2::new(100.0, 100.0), 1.0).unwrap();
    world.spawn(Vec2::new(100.0, 300.0), 4.0).unwrap();
    let forces = ExternalForces::none().with_wind(Vec2::new(50.0, 0.0));
    world.step(0.1, 1, &forces);
    let light = world.points()[0].pos.x - 100.0;
    let heavy = world.points()[1].pos.x - 100.0;
    assert!(light > heavy && heavy > 0.0);
}

#[test]
fn pinned_rope_end_holds() {
    let mut world = ParticleWorld::new(100.0, 100.0, SimSettings::default()).unwrap();
    let range = world
        .add_rope(Vec2::new(20.0, 10.0), Vec2::new(80.0, 10.0), 6, 1.0, 1.0)
        .unwrap();
    assert!(world.set_pinned(range.start, true));
    assert!(!world.set_pinned(999, true));
    for _ in 0..120 {
        world.tick(1.0 / 60.0, &ExternalForces::none());
    }
    assert_eq!(world.points()[range.start].pos, Vec2::new(20.0, 10.0));
    assert!(world.points()[range.end - 1].pos.y > 10.0);
}

#[test]
fn zero_dt_changes_nothing() {
    let mut world = ParticleWorld::new(100.0, 100.0, SimSettings::default()).unwrap();
    world.spawn(Vec2::new(10.0, 10.0), 1.0).unwrap();
    world.step(0.0, 8, &ExternalForces::none());
    assert_eq!(world.points()[0].pos, Vec2::new(10.0, 10.0));
    assert_eq!(world.frame(), 1);
}

#[test]
fn particle_query_range_returns_indices() {
    let mut world = ParticleWorld::new(100.0, 100.0, SimSettings::default()).unwrap();
    world.spawn(Vec2::new(10.0, 10.0), 1.0).unwrap();
    world.spawn(Vec2::new(90.0, 90.0), 1.0).unwrap();
    world.spawn(Vec2::new(20.0, 15.0), 1.0).unwrap();
    let hits = world.query_range(&Aabb::from_min_max(Vec2::zero(), Vec2::new(30.0, 30.0)));
    assert_eq!(hits, vec![0, 2]);
    assert_eq!(world.query_radius(Vec2::new(90.0, 90.0), 1.0), vec![1]);
}

#[test]
fn query_range_finds_particles_in_a_row() {
    let (x0, d, y) = (200.17291, 18.5682, 895.62164);
    let mut world = ParticleWorld::new(1000.0, 1000.0, still()).unwrap();
    for k in 0..3 {
        world.spawn(Vec2::new(x0 + d * k as f32, y), 1.0).unwrap();
    }
    assert_eq!(world.query_range(world.bounds()), vec![0, 1, 2]);
    let tree = world.quadtree();
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.dropped(), 0);
    assert_eq!(world.query_radius(Vec2::new(x0 + d, y), d * 0.5), vec![1]);
}

#[test]
fn resting_floor_row_stays_queryable() {
    let mut world = ParticleWorld::new(100.0, 100.0, SimSettings::default()).unwrap();
    for k in 0..9 {
        world.spawn(Vec2::new(10.0 + 10.0 * k as f32, 99.0), 1.0).unwrap();
    }
    world.step(0.016, 8, &ExternalForces::none());
    let everyone: Vec<usize> = (0..world.len()).collect();
    assert_eq!(world.query_range(world.bounds()), everyone);
}

#[test]
fn attractor_reaches_particles_on_split_lines() {
    let mut world = ParticleWorld::new(100.0, 100.0, still()).unwrap();
    // Bounding box centered on (50, 50): the middle particle sits on both split lines
    world.spawn(Vec2::new(40.0, 50.0), 1.0).unwrap();
    world.spawn(Vec2::new(50.0, 50.0), 1.0).unwrap();
    world.spawn(Vec2::new(60.0, 50.0), 1.0).unwrap();
    let forces = ExternalForces::none().with_attractor(Attractor::new(Vec2::new(50.0, 40.0), 500.0, 30.0));
    world.step(0.016, 1, &forces);
    for p in world.points() {
        assert!(p.pos.y < 50.0, "{:?} was not pulled", p.pos);
    }
}

#[test]
fn set_gravity_rejects_non_finite_values() {
    let mut world = ParticleWorld::new(100.0, 100.0, SimSettings::default()).unwrap();
    assert!(world.set_gravity(Vec2::new(f32::NAN, 0.0)).is_err());
    assert_eq!(world.settings().gravity, SimSettings::default().gravity);
    assert!(world.set_gravity(Vec2::new(0.0, 10.0)).is_ok());
    assert_eq!(world.settings().gravity, Vec2::new(0.0, 10.0));

    let mut rigid = RigidWorld::new(100.0, 100.0, SimSettings::default()).unwrap();
    assert!(rigid.set_gravity(Vec2::new(0.0, f32::INFINITY)).is_err());
    assert_eq!(rigid.settings().gravity, SimSettings::default().gravity);
}

#[test]
fn invalid_settings_are_not_applied() {
    let mut world = ParticleWorld::new(100.0, 100.0, SimSettings::default()).unwrap();
    let bad = SimSettings {
        steps: 1000,
        ..SimSettings::default()
    };
    assert!(world.set_settings(bad).is_err());
    assert_eq!(world.settings().steps, SimSettings::default().steps);
}

#[test]
fn particle_perf_stats_fill_when_enabled() {
    let mut world = ParticleWorld::new(100.0, 100.0, still()).unwrap();
    world.spawn(Vec2::new(50.0, 50.0), 1.0).unwrap();
    world.spawn(Vec2::new(50.5, 50.0), 1.0).unwrap();

    world.step(0.016, 1, &ExternalForces::none());
    assert_eq!(world.perf_stats().entity_count, 0);

    world.enable_perf_metrics(true);
    world.points_mut()[1].teleport(Vec2::new(50.5, 50.0));
    world.step(0.016, 2, &ExternalForces::none());
    let stats = world.perf_stats();
    assert_eq!(stats.entity_count, 2);
    assert!(stats.candidate_pairs >= 1);
    assert!(stats.contacts_resolved >= 1);
    assert!(stats.step_ms >= 0.0);
}

// === RigidWorld ===

fn open_rigid(settings: SimSettings) -> RigidWorld {
    RigidWorld::with_bounds(Aabb::new(Vec2::zero(), 500.0, 500.0), settings).unwrap()
}

#[test]
fn rigid_spawn_assigns_ids_and_removes() {
    let mut world = open_rigid(still());
    let a = world.spawn_rect(Vec2::zero(), 10.0, 10.0, 1.0).unwrap();
    let b = world.spawn_regular(Vec2::new(100.0, 0.0), 5.0, 6, 1.0).unwrap();
    assert_ne!(a, b);
    assert_eq!(world.body_count(), 2);
    assert!(world.remove_body(a));
    assert!(!world.remove_body(a));
    assert!(world.body(b).is_some());
}

#[test]
fn rigid_spawn_rejects_degenerate_input() {
    let mut world = open_rigid(still());
    let line = vec![Vec2::zero(), Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)];
    assert_eq!(world.spawn_polygon(Vec2::zero(), line, 1.0), Err(PhysicsError::ZeroArea));
    assert_eq!(
        world.spawn_rect(Vec2::zero(), 1.0, 1.0, -1.0),
        Err(PhysicsError::NonPositiveDensity)
    );
    assert_eq!(world.body_count(), 0);
}

#[test]
fn rigid_body_bounces_off_wall() {
    let mut world = RigidWorld::new(100.0, 100.0, still()).unwrap();
    let id = world.spawn_rect(Vec2::new(90.0, 50.0), 10.0, 10.0, 1.0).unwrap();
    world.body_mut(id).unwrap().vel = Vec2::new(100.0, 0.0);
    world.step(0.1, 1, &ExternalForces::none());
    let body = world.body(id).unwrap();
    let restitution = SimSettings::default().restitution;
    assert!((body.vel.x + 100.0 * restitution).abs() < 1e-3);
    assert!(body.aabb().max().x <= 100.0 + 1e-3);
}

#[test]
fn rigid_wall_absorbs_without_reflection() {
    let settings = SimSettings {
        wall_reflection: false,
        ..still()
    };
    let mut world = RigidWorld::new(100.0, 100.0, settings).unwrap();
    let id = world.spawn_rect(Vec2::new(90.0, 50.0), 10.0, 10.0, 1.0).unwrap();
    world.body_mut(id).unwrap().vel = Vec2::new(100.0, 0.0);
    world.step(0.1, 1, &ExternalForces::none());
    let body = world.body(id).unwrap();
    assert_eq!(body.vel, Vec2::zero());
    assert!(body.aabb().max().x <= 100.0 + 1e-3);
}

#[test]
fn rigid_spawn_rejects_concave_outline() {
    let mut world = open_rigid(still());
    let l_shape = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(20.0, 0.0),
        Vec2::new(20.0, 10.0),
        Vec2::new(10.0, 10.0),
        Vec2::new(10.0, 20.0),
        Vec2::new(0.0, 20.0),
    ];
    assert_eq!(
        world.spawn_polygon(Vec2::zero(), l_shape, 1.0),
        Err(PhysicsError::NonConvexPolygon { index: 3 })
    );
    assert_eq!(world.body_count(), 0);
}

#[test]
fn rigid_gravity_accelerates_bodies() {
    let mut world = open_rigid(SimSettings::default());
    let id = world.spawn_rect(Vec2::zero(), 10.0, 10.0, 1.0).unwrap();
    world.step(0.1, 2, &ExternalForces::none());
    let body = world.body(id).unwrap();
    assert!(body.vel.y > 0.0);
    assert!(body.pos.y > 0.0);
}

#[test]
fn fast_body_does_not_tunnel_through_wall() {
    let settings = SimSettings {
        restitution: 1.0,
        ..still()
    };
    let mut world = open_rigid(settings);
    let bullet = world.spawn_rect(Vec2::zero(), 4.0, 4.0, 1.0).unwrap();
    let wall = world.spawn_rect(Vec2::new(30.0, 0.0), 4.0, 40.0, 10.0).unwrap();
    world.body_mut(bullet).unwrap().vel = Vec2::new(100.0, 0.0);

    // First step moves the bullet clean past the wall; the second finds the crossing
    world.step(1.0, 1, &ExternalForces::none());
    world.step(1.0, 1, &ExternalForces::none());

    let b = world.body(bullet).unwrap();
    assert!(b.vel.x < 0.0, "{:?}", b.vel);
    assert!(b.pos.x < 30.0, "{:?}", b.pos);
    assert!(world.body(wall).unwrap().vel.x > 0.0);
}

#[test]
fn rigid_query_range_uses_bounding_boxes() {
    let mut world = open_rigid(still());
    let a = world.spawn_rect(Vec2::zero(), 10.0, 10.0, 1.0).unwrap();
    world.spawn_rect(Vec2::new(200.0, 0.0), 10.0, 10.0, 1.0).unwrap();
    let hits = world.query_range(&Aabb::new(Vec2::new(8.0, 0.0), 4.0, 4.0));
    assert_eq!(hits, vec![a]);
}

#[test]
fn rigid_perf_stats_count_contacts() {
    let settings = SimSettings {
        restitution: 1.0,
        ..still()
    };
    let mut world = open_rigid(settings);
    world.enable_perf_metrics(true);
    let a = world.spawn_rect(Vec2::new(8.0, 0.0), 20.0, 20.0, 1.0).unwrap();
    let b = world.spawn_rect(Vec2::new(27.0, 0.0), 20.0, 20.0, 1.0).unwrap();
    world.body_mut(a).unwrap().vel = Vec2::new(1.0, 0.0);
    world.body_mut(b).unwrap().vel = Vec2::new(-1.0, 0.0);
    world.step(1.0, 1, &ExternalForces::none());
    let stats = world.perf_stats();
    assert_eq!(stats.entity_count, 2);
    assert_eq!(stats.candidate_pairs, 1);
    assert_eq!(stats.contacts_resolved, 1);
}
