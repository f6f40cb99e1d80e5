//! Browser smoke tests for the exported classes
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use verlet_kit::{version, ParticleSim, RigidSim};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn version_is_exported() {
    assert!(!version().is_empty());
}

#[wasm_bindgen_test]
fn particle_sim_steps_and_exports_positions() {
    let mut sim = ParticleSim::new(100.0, 100.0).unwrap();
    sim.add_particle(50.0, 10.0, 1.0).unwrap();
    sim.step(1.0 / 60.0);
    let pos = sim.positions();
    assert_eq!(pos.len(), 2);
    assert!(pos[1] > 10.0);
}

#[wasm_bindgen_test]
fn bad_input_surfaces_as_js_error() {
    let mut sim = ParticleSim::new(100.0, 100.0).unwrap();
    assert!(sim.add_particle(1.0, 1.0, -1.0).is_err());
    assert!(sim.set_settings_json("{ \"steps\": 0 }").is_err());
    assert!(sim.set_gravity(f32::NAN, 0.0).is_err());

    let mut rigid = RigidSim::new(100.0, 100.0).unwrap();
    assert!(rigid.spawn_polygon(0.0, 0.0, vec![0.0, 0.0, 1.0, 0.0], 1.0).is_err());
}
