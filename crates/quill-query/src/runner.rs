//! The query runner (C13): validates a lane, delegates execution to the
//! host's [`QueryExecutor`], enforces resource caps by truncating rather
//! than failing, and logs one [`Episode`] per call into the store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use quill_core::{Clock, SystemClock};
use quill_error::Result;
use quill_store::{Episode, Store};

use crate::caps::ResourceCaps;
use crate::lane::Lane;
use crate::result::{QueryExecutor, QueryResult};
use crate::validator::LaneValidator;

pub struct QueryRunner<E: QueryExecutor> {
    executor: E,
    validator: LaneValidator,
    caps: ResourceCaps,
    now: Arc<dyn Clock>,
}

impl<E: QueryExecutor> QueryRunner<E> {
    pub fn new(executor: E, validator: LaneValidator, caps: ResourceCaps) -> Self {
        Self {
            executor,
            validator,
            caps,
            now: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.now = clock;
        self
    }

    #[tracing::instrument(level = "debug", skip(self, store, params))]
    pub fn run_ro(
        &self,
        store: &mut Store,
        scope_id: &str,
        script: &str,
        params: &HashMap<String, String>,
    ) -> QueryResult {
        self.run(store, Lane::ReadOnly, scope_id, script, params)
    }

    #[tracing::instrument(level = "debug", skip(self, store, params))]
    pub fn run_ws(
        &self,
        store: &mut Store,
        scope_id: &str,
        script: &str,
        params: &HashMap<String, String>,
    ) -> QueryResult {
        self.run(store, Lane::WorkspaceWrite, scope_id, script, params)
    }

    /// Attempts the read-only lane first; only escalates to workspace-write
    /// if the script fails RO validation for containing a mutating verb.
    #[tracing::instrument(level = "debug", skip(self, store, params))]
    pub fn run_auto(
        &self,
        store: &mut Store,
        scope_id: &str,
        script: &str,
        params: &HashMap<String, String>,
    ) -> QueryResult {
        if self.validator.validate(Lane::ReadOnly, script).is_ok() {
            self.run(store, Lane::ReadOnly, scope_id, script, params)
        } else {
            self.run(store, Lane::WorkspaceWrite, scope_id, script, params)
        }
    }

    fn run(
        &self,
        store: &mut Store,
        lane: Lane,
        scope_id: &str,
        script: &str,
        params: &HashMap<String, String>,
    ) -> QueryResult {
        let started = Instant::now();
        let result = self.run_inner(lane, script, params, started);
        self.log_episode(store, scope_id, lane, script, &result);
        result
    }

    fn run_inner(
        &self,
        lane: Lane,
        script: &str,
        params: &HashMap<String, String>,
        started: Instant,
    ) -> QueryResult {
        if let Err(e) = self.validator.validate(lane, script) {
            tracing::warn!(lane = lane.as_str(), "query rejected by lane validator");
            return QueryResult::failure(e.to_string());
        }

        let raw = match self.executor.execute(script, params) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(lane = lane.as_str(), "query execution failed");
                return QueryResult::failure(e.to_string());
            }
        };

        let mut truncated = false;
        let mut rows = raw.rows;
        if rows.len() > self.caps.max_rows {
            rows.truncate(self.caps.max_rows);
            truncated = true;
        }

        let mut byte_budget = self.caps.max_output_bytes;
        let mut kept = Vec::with_capacity(rows.len());
        for row in rows {
            let row_bytes: usize = row.iter().map(String::len).sum();
            if row_bytes > byte_budget {
                truncated = true;
                break;
            }
            byte_budget -= row_bytes;
            kept.push(row);
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        if elapsed_ms > self.caps.timeout_ms {
            truncated = true;
            tracing::warn!(lane = lane.as_str(), elapsed_ms, "query exceeded timeout cap");
        }

        QueryResult {
            ok: true,
            rows: Some(kept),
            headers: Some(raw.headers),
            truncated,
            lat_ms: elapsed_ms,
            error: None,
        }
    }

    fn log_episode(
        &self,
        store: &mut Store,
        scope_id: &str,
        lane: Lane,
        script: &str,
        result: &QueryResult,
    ) {
        store.log_episode(Episode {
            scope_id: scope_id.to_string(),
            note_id: None,
            ts: self.now.now_ms(),
            action_type: lane.as_str().to_string(),
            target_id: None,
            target_kind: Some("query".to_string()),
            payload: script.to_string(),
            narrative_id: None,
        });
        let _ = result;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_store::StoreConfig;

    struct EchoExecutor;
    impl QueryExecutor for EchoExecutor {
        fn execute(&self, _script: &str, _params: &HashMap<String, String>) -> Result<crate::result::RawRows> {
            Ok(crate::result::RawRows {
                headers: vec!["id".to_string()],
                rows: (0..10).map(|i| vec![i.to_string()]).collect(),
            })
        }
    }

    fn runner() -> QueryRunner<EchoExecutor> {
        QueryRunner::new(
            EchoExecutor,
            LaneValidator::new(["workspace_artifacts".to_string()]),
            ResourceCaps::default(),
        )
    }

    #[test]
    fn run_ro_executes_and_logs_one_episode() {
        let mut store = Store::new(StoreConfig::default());
        let r = runner();
        let result = r.run_ro(&mut store, "scope-1", "?[x] := *notes {id}", &HashMap::new());
        assert!(result.ok);
        assert_eq!(result.rows.unwrap().len(), 10);
        assert_eq!(store.episodes_for_scope("scope-1").len(), 1);
    }

    #[test]
    fn run_ro_rejects_mutating_script_without_executing() {
        let mut store = Store::new(StoreConfig::default());
        let r = runner();
        let result = r.run_ro(&mut store, "scope-1", "insert *notes {id: 1}", &HashMap::new());
        assert!(!result.ok);
        assert!(result.error.is_some());
    }

    #[test]
    fn row_cap_truncates_rather_than_errors() {
        let mut store = Store::new(StoreConfig::default());
        let r = QueryRunner::new(
            EchoExecutor,
            LaneValidator::new(["workspace_artifacts".to_string()]),
            ResourceCaps {
                max_rows: 3,
                ..ResourceCaps::default()
            },
        );
        let result = r.run_ro(&mut store, "scope-1", "?[x] := *notes {id}", &HashMap::new());
        assert!(result.ok);
        assert!(result.truncated);
        assert_eq!(result.rows.unwrap().len(), 3);
    }

    #[test]
    fn run_auto_escalates_to_workspace_write_for_mutating_scripts() {
        let mut store = Store::new(StoreConfig::default());
        let r = runner();
        let result = r.run_auto(
            &mut store,
            "scope-1",
            "insert *workspace_artifacts {key: 1}",
            &HashMap::new(),
        );
        assert!(result.ok);
        let episodes = store.episodes_for_scope("scope-1");
        assert_eq!(episodes[0].action_type, "ws");
    }
}
