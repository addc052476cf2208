//! Typed configuration surfaces. `SearchConfig` is passed per-call and is
//! cheaply `Clone`; `EngineConfig` is constructor-time only and immutable
//! for the engine's lifetime.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub narrative_id: String,
    pub folder_path: String,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub k1: f64,
    pub b: f64,
    pub field_weights: HashMap<String, f64>,
    pub coverage_lambda: f64,
    pub coverage_epsilon: f64,
    pub phrase_hard: bool,
    pub proximity_alpha: f64,
    pub proximity_decay: f64,
    pub max_segments: u32,
    pub scope: Option<Scope>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            k1: 1.2,
            b: 0.75,
            field_weights: HashMap::new(),
            coverage_lambda: 3.0,
            coverage_epsilon: 0.1,
            phrase_hard: true,
            proximity_alpha: 0.5,
            proximity_decay: 0.1,
            max_segments: 32,
            scope: None,
        }
    }
}

impl SearchConfig {
    pub fn field_weight(&self, field: &str) -> f64 {
        self.field_weights.get(field).copied().unwrap_or(1.0)
    }
}

/// Constructor-time engine configuration. Changing `q` requires a fresh
/// engine and a full re-index, since every posting and segment offset is
/// computed against a fixed gram length.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub q: usize,
    pub max_candidates_for_adaptive_selection: u64,
    /// Document-frequency threshold above which a gram's posting list is
    /// promoted from a sorted slice to a roaring bitmap. One-way: a posting
    /// never demotes back to a slice once promoted.
    pub t_promote: usize,
    /// Enables `trace!`-level per-candidate/per-gram logging in the hot
    /// inner loops. Only has an effect when the crate is built with the
    /// `trace-inner-loops` feature; otherwise the call sites it would gate
    /// are not compiled in at all.
    pub trace_inner_loops: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            q: quill_core::DEFAULT_Q,
            max_candidates_for_adaptive_selection: 50_000,
            t_promote: quill_core::T_PROMOTE,
            trace_inner_loops: false,
        }
    }
}
