//! Executor seam and the wire-shaped result the runner returns.

use std::collections::HashMap;

use quill_error::Result as QResult;

/// Implemented by the host's actual script-execution backend. The runner
/// itself only validates lanes and enforces caps; it has no opinion on what
/// `script` means.
pub trait QueryExecutor {
    fn execute(&self, script: &str, params: &HashMap<String, String>) -> QResult<RawRows>;
}

#[derive(Debug, Clone, Default)]
pub struct RawRows {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub ok: bool,
    pub rows: Option<Vec<Vec<String>>>,
    pub headers: Option<Vec<String>>,
    pub truncated: bool,
    pub lat_ms: u64,
    pub error: Option<String>,
}

impl QueryResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}
