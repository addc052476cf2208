//! `quill` — the embedded retrieval facade: a bitemporal note store wired to
//! a q-gram/BM25/WAND search engine through a change-event queue, plus a
//! lane-validated query runner.
//!
//! Highlights
//! - [`Quill`] composes [`quill_store::Store`], [`quill_engine::Engine`], and
//!   [`quill_query::QueryRunner`] and keeps the index in sync with the store:
//!   every note mutation drains the store's pending [`quill_store::ChangeEvent`]s
//!   and applies them against the engine immediately.
//! - The store and engine crates do not depend on each other; this crate owns
//!   that wiring so neither lower crate needs to know the other exists.
//! - [`actor`] provides an optional `tokio`-actor wrapper ([`actor::QuillHandle`])
//!   for callers that want a cloneable async handle instead of a `&mut Quill`.
//!   The synchronous [`Quill`] type is fully usable on its own; nothing here
//!   requires the actor.
//!
//! Quickstart
//! ```no_run
//! use std::collections::HashMap;
//! use quill::Quill;
//! use quill_engine::{EngineConfig, SearchConfig};
//! use quill_query::{LaneValidator, QueryRunner, QueryExecutor, QueryResult, RawRows};
//! use quill_store::{NoteFields, StoreConfig};
//!
//! struct NoOpExecutor;
//! impl QueryExecutor for NoOpExecutor {
//!     fn execute(&self, _script: &str, _params: &HashMap<String, String>) -> quill_error::Result<RawRows> {
//!         Ok(RawRows::default())
//!     }
//! }
//!
//! let runner = QueryRunner::new(
//!     NoOpExecutor,
//!     LaneValidator::new(["workspace_artifacts".to_string()]),
//!     Default::default(),
//! );
//! let mut quill = Quill::new(EngineConfig::default(), StoreConfig::default(), runner);
//! quill.create_note("n1", NoteFields {
//!     world_id: "w1".into(),
//!     title: "First note".into(),
//!     content: "hello world".into(),
//!     markdown_content: String::new(),
//!     folder_id: None,
//!     entity_kind: None,
//!     entity_subtype: None,
//!     is_entity: false,
//!     is_pinned: false,
//!     favorite: false,
//!     owner_id: None,
//!     narrative_id: None,
//!     order: 0,
//! });
//! let found = quill.search_notes("hello", &SearchConfig::default(), 10);
//! assert_eq!(found.results.len(), 1);
//! ```

pub mod actor;

use std::collections::HashMap;

use quill_engine::{Engine, EngineConfig, SearchConfig, SearchOutcome};
use quill_query::{QueryExecutor, QueryResult, QueryRunner};
use quill_store::{ChangeKind, NoteFields, NoteRow, Store, StoreConfig};

pub use actor::{QuillCmd, QuillHandle};

/// Ties a [`quill_store::Store`] to a [`quill_engine::Engine`]: every note
/// mutation on this type re-applies the store's change events to the engine
/// before returning, so a search immediately after a write sees it.
pub struct Quill<E: QueryExecutor> {
    engine: Engine,
    store: Store,
    runner: QueryRunner<E>,
}

impl<E: QueryExecutor> Quill<E> {
    pub fn new(engine_config: EngineConfig, store_config: StoreConfig, runner: QueryRunner<E>) -> Self {
        Self {
            engine: Engine::new(engine_config),
            store: Store::new(store_config),
            runner,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn create_note(&mut self, id: impl Into<String>, fields: NoteFields) -> NoteRow {
        let row = self.store.create_note(id, fields);
        self.reindex_pending();
        row
    }

    pub fn update_note(
        &mut self,
        id: &str,
        fields: NoteFields,
        reason: impl Into<String>,
    ) -> quill_error::Result<NoteRow> {
        let row = self.store.update_note(id, fields, reason)?;
        self.reindex_pending();
        Ok(row)
    }

    pub fn upsert_note(
        &mut self,
        id: impl Into<String>,
        fields: NoteFields,
        reason: impl Into<String>,
    ) -> NoteRow {
        let row = self.store.upsert_note(id, fields, reason);
        self.reindex_pending();
        row
    }

    /// Removes every version of the note and lazy-deletes its gram postings.
    pub fn delete_note(&mut self, id: &str) -> bool {
        let existed = self.store.delete_note(id);
        self.reindex_pending();
        existed
    }

    fn reindex_pending(&mut self) {
        for event in self.store.drain_events() {
            match event.kind {
                ChangeKind::Created => {
                    self.engine
                        .index_document(&event.doc_id, &event.fields, &event.narrative_id, &event.folder_path);
                }
                ChangeKind::Updated => {
                    // The previous version's grams must be purged before the new
                    // text is indexed, or stale postings keep the old content
                    // surfacing this document as a candidate forever.
                    self.engine.remove_document_hard(&event.doc_id);
                    self.engine
                        .index_document(&event.doc_id, &event.fields, &event.narrative_id, &event.folder_path);
                }
                ChangeKind::Deleted => {
                    self.engine.remove_document(&event.doc_id);
                }
            }
        }
    }

    /// Reclaims posting-list space for documents removed since the last
    /// compaction. Safe to call on a schedule; a no-op when nothing is dirty.
    pub fn compact(&mut self) {
        self.engine.compact();
    }

    /// An empty query returns an empty result list without touching the index.
    pub fn search_notes(&self, query: &str, cfg: &SearchConfig, limit: usize) -> SearchOutcome {
        if query.trim().is_empty() {
            return SearchOutcome::default();
        }
        self.engine.search(query, cfg, limit, || false)
    }

    pub fn run_ro(&mut self, scope_id: &str, script: &str, params: &HashMap<String, String>) -> QueryResult {
        self.runner.run_ro(&mut self.store, scope_id, script, params)
    }

    pub fn run_ws(&mut self, scope_id: &str, script: &str, params: &HashMap<String, String>) -> QueryResult {
        self.runner.run_ws(&mut self.store, scope_id, script, params)
    }

    pub fn run_auto(&mut self, scope_id: &str, script: &str, params: &HashMap<String, String>) -> QueryResult {
        self.runner.run_auto(&mut self.store, scope_id, script, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_query::{LaneValidator, RawRows, ResourceCaps};

    struct EchoExecutor;
    impl QueryExecutor for EchoExecutor {
        fn execute(&self, _script: &str, _params: &HashMap<String, String>) -> quill_error::Result<RawRows> {
            Ok(RawRows::default())
        }
    }

    fn note_fields(title: &str, content: &str) -> NoteFields {
        NoteFields {
            world_id: "w1".to_string(),
            title: title.to_string(),
            content: content.to_string(),
            markdown_content: String::new(),
            folder_id: None,
            entity_kind: None,
            entity_subtype: None,
            is_entity: false,
            is_pinned: false,
            favorite: false,
            owner_id: None,
            narrative_id: None,
            order: 0,
        }
    }

    fn quill() -> Quill<EchoExecutor> {
        Quill::new(
            EngineConfig::default(),
            StoreConfig::default(),
            QueryRunner::new(
                EchoExecutor,
                LaneValidator::new(["workspace_artifacts".to_string()]),
                ResourceCaps::default(),
            ),
        )
    }

    #[test]
    fn creating_a_note_makes_it_searchable_immediately() {
        let mut q = quill();
        q.create_note("n1", note_fields("First", "banana bread recipe"));
        let out = q.search_notes("banana", &SearchConfig::default(), 10);
        assert_eq!(out.results.len(), 1);
        assert_eq!(out.results[0].doc_id, "n1");
    }

    #[test]
    fn deleting_a_note_removes_it_from_search() {
        let mut q = quill();
        q.create_note("n1", note_fields("First", "banana bread recipe"));
        q.delete_note("n1");
        let out = q.search_notes("banana", &SearchConfig::default(), 10);
        assert!(out.results.is_empty());
    }

    #[test]
    fn updating_a_note_reindexes_the_new_content() {
        let mut q = quill();
        q.create_note("n1", note_fields("First", "banana bread"));
        q.update_note("n1", note_fields("First", "carrot cake"), "edit").unwrap();
        let stale = q.search_notes("banana", &SearchConfig::default(), 10);
        assert!(stale.results.is_empty());
        let fresh = q.search_notes("carrot", &SearchConfig::default(), 10);
        assert_eq!(fresh.results.len(), 1);
    }

    #[test]
    fn empty_query_returns_empty_without_touching_the_index() {
        let mut q = quill();
        q.create_note("n1", note_fields("First", "banana bread"));
        let out = q.search_notes("   ", &SearchConfig::default(), 10);
        assert!(out.results.is_empty());
    }

    #[test]
    fn run_ro_through_the_facade_logs_an_episode_in_the_store() {
        let mut q = quill();
        q.run_ro("scope-1", "?[x] := *notes {id}", &HashMap::new());
        assert_eq!(q.store().episodes_for_scope("scope-1").len(), 1);
    }
}
