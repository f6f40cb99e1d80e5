use verlet_kit::{Aabb, ExternalForces, RigidWorld, SimSettings, Vec2};

fn elastic_world() -> RigidWorld {
    let settings = SimSettings {
        gravity: Vec2::zero(),
        restitution: 1.0,
        steps: 1,
        ..SimSettings::default()
    };
    RigidWorld::with_bounds(Aabb::new(Vec2::zero(), 1000.0, 1000.0), settings).unwrap()
}

/// Two side-20 squares 15 units apart, closing at `va` and `vb`; steps until
/// their boxes overlap, then runs the step that resolves the contact.
fn collide_squares(va: f32, vb: f32) -> (RigidWorld, u32, u32, Vec2) {
    let mut world = elastic_world();
    let a = world.spawn_rect(Vec2::new(0.0, 0.0), 20.0, 20.0, 1.0).unwrap();
    let b = world.spawn_rect(Vec2::new(35.0, 0.0), 20.0, 20.0, 1.0).unwrap();
    world.body_mut(a).unwrap().vel = Vec2::new(va, 0.0);
    world.body_mut(b).unwrap().vel = Vec2::new(vb, 0.0);
    let before = world.total_momentum();

    let mut steps = 0;
    while !world.body(a).unwrap().aabb().intersects(world.body(b).unwrap().aabb()) {
        world.step(1.0, 1, &ExternalForces::none());
        steps += 1;
        assert!(steps < 100, "squares never met");
    }
    world.step(1.0, 1, &ExternalForces::none());
    (world, a, b, before)
}

#[test]
fn head_on_squares_bounce_apart() {
    let (world, a, b, before) = collide_squares(1.0, -1.0);
    let (ba, bb) = (world.body(a).unwrap(), world.body(b).unwrap());

    assert!(ba.vel.x < 0.0, "a kept moving right: {:?}", ba.vel);
    assert!(bb.vel.x > 0.0, "b kept moving left: {:?}", bb.vel);
    assert!((ba.vel.x + 1.0).abs() < 1e-3);
    assert!((bb.vel.x - 1.0).abs() < 1e-3);
    // Face-on hit: no spin
    assert!(ba.rotation_speed.abs() < 1e-5 && bb.rotation_speed.abs() < 1e-5);

    let after = world.total_momentum();
    // Total is zero here, so compare against the momentum magnitude in play
    let scale = ba.mass() * 1.0 + bb.mass() * 1.0;
    assert!((after - before).length() <= 0.01 * scale);
}

#[test]
fn unequal_speeds_conserve_momentum() {
    let (world, a, b, before) = collide_squares(1.5, -0.5);
    let after = world.total_momentum();
    assert!(before.x.abs() > 0.0);
    assert!((after.x - before.x).abs() <= 0.01 * before.x.abs());

    // Equal masses, elastic: velocities swap
    assert!((world.body(a).unwrap().vel.x + 0.5).abs() < 1e-3);
    assert!((world.body(b).unwrap().vel.x - 1.5).abs() < 1e-3);
}

#[test]
fn heavy_body_barely_moves() {
    let mut world = elastic_world();
    let light = world.spawn_rect(Vec2::new(0.0, 0.0), 20.0, 20.0, 1.0).unwrap();
    let heavy = world.spawn_rect(Vec2::new(25.0, 0.0), 20.0, 200.0, 100.0).unwrap();
    world.body_mut(light).unwrap().vel = Vec2::new(2.0, 0.0);
    for _ in 0..10 {
        world.step(1.0, 1, &ExternalForces::none());
    }
    assert!(world.body(light).unwrap().vel.x < 0.0);
    assert!(world.body(heavy).unwrap().vel.x.abs() < 0.05);
}
