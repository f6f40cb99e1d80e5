use wasm_bindgen::prelude::*;

/// Timings and counters for the last step; zeros while perf is disabled.
#[wasm_bindgen]
#[derive(Clone, Debug)]
pub struct PerfStats {
    pub(super) step_ms: f64,
    pub(super) broad_phase_ms: f64,
    pub(super) narrow_phase_ms: f64,
    pub(super) integrate_ms: f64,
    pub(super) constraint_ms: f64,
    pub(super) candidate_pairs: u32,
    pub(super) contacts_resolved: u32,
    pub(super) quadtree_dropped: u32,
    pub(super) entity_count: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

impl Default for PerfStats {
    fn default() -> Self {
        PerfStats {
            step_ms: 0.0,
            broad_phase_ms: 0.0,
            narrow_phase_ms: 0.0,
            integrate_ms: 0.0,
            constraint_ms: 0.0,
            candidate_pairs: 0,
            contacts_resolved: 0,
            quadtree_dropped: 0,
            entity_count: 0,
        }
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn broad_phase_ms(&self) -> f64 { self.broad_phase_ms }
    #[wasm_bindgen(getter)]
    pub fn narrow_phase_ms(&self) -> f64 { self.narrow_phase_ms }
    #[wasm_bindgen(getter)]
    pub fn integrate_ms(&self) -> f64 { self.integrate_ms }
    #[wasm_bindgen(getter)]
    pub fn constraint_ms(&self) -> f64 { self.constraint_ms }
    #[wasm_bindgen(getter)]
    pub fn candidate_pairs(&self) -> u32 { self.candidate_pairs }
    #[wasm_bindgen(getter)]
    pub fn contacts_resolved(&self) -> u32 { self.contacts_resolved }
    #[wasm_bindgen(getter)]
    pub fn quadtree_dropped(&self) -> u32 { self.quadtree_dropped }
    #[wasm_bindgen(getter)]
    pub fn entity_count(&self) -> u32 { self.entity_count }
}
