//! Constructor-time store configuration.

use std::sync::Arc;

use quill_core::{Clock, SystemClock};

/// Constructor-time only; immutable for the store's lifetime.
#[derive(Clone)]
pub struct StoreConfig {
    /// Depth cap recommended for recursive folder-ancestor walks, since
    /// cycles in `Folder.parent_id` are a caller responsibility, not one the
    /// store detects.
    pub folder_cycle_guard_depth: usize,
    pub now: Arc<dyn Clock>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            folder_cycle_guard_depth: 20,
            now: Arc::new(SystemClock),
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("folder_cycle_guard_depth", &self.folder_cycle_guard_depth)
            .finish_non_exhaustive()
    }
}
