//! Shared scalar types used across the engine, store, and query-lane crates:
//! the dense internal doc id, the workspace scope tuple, and an injectable
//! clock so temporal-store tests don't depend on wall-clock resolution.

pub mod arc_str;
pub mod clock;
pub mod ids;
pub mod scope;

pub use arc_str::ArcStr;
pub use clock::{Clock, StepClock, SystemClock};
pub use ids::DocId;
pub use scope::Scope;

/// Gram length used throughout indexing/query/verification. Fixed at engine
/// construction time; changing it requires a fresh engine and a full
/// re-index (see `EngineConfig`).
pub const DEFAULT_Q: usize = 3;

/// Document-frequency threshold above which a gram's posting list is
/// promoted from a sorted slice to a roaring bitmap, and never demoted.
pub const T_PROMOTE: usize = 2000;
