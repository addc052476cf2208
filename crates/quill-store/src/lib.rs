//! The bitemporal document store (C11), workspace artifact layer (C12), and
//! snapshot codec (C14). Owns notes, entities, edges, folders, the
//! straightforward row tables (threads, messages, memories, model-call
//! bookkeeping, blocks), workspace artifacts, and the episode log.
//!
//! This crate does not depend on `quill-engine`: note mutations push
//! [`ChangeEvent`]s onto a drainable queue instead of calling the engine
//! directly, so the facade crate owns the wiring between the two.

pub mod artifact;
pub mod change_event;
pub mod config;
pub mod edge;
pub mod entity;
pub mod episode;
pub mod folder;
pub mod note;
pub mod rows;
pub mod snapshot;

use std::collections::VecDeque;

use quill_core::Clock;
use quill_error::{DomainError, Result};

pub use artifact::{ArtifactKind, ArtifactStore, WorkspaceArtifact};
pub use change_event::{ChangeEvent, ChangeKind};
pub use config::StoreConfig;
pub use edge::{Edge, EdgeStore};
pub use entity::{CreatedBy, Entity, EntityStore};
pub use episode::{Episode, EpisodeLog};
pub use folder::{Folder, FolderStore};
pub use note::{NoteFields, NoteRow, NoteStore};
pub use quill_core::Scope;
pub use rows::{Block, Memory, MemoryThread, OmGeneration, OmRecord, RowTable, Thread, ThreadMessage};
pub use snapshot::Snapshot;

pub struct Store {
    config: StoreConfig,
    notes: NoteStore,
    entities: EntityStore,
    edges: EdgeStore,
    folders: FolderStore,
    threads: RowTable<Thread>,
    thread_messages: RowTable<ThreadMessage>,
    memories: RowTable<Memory>,
    memory_threads: RowTable<MemoryThread>,
    om_records: RowTable<OmRecord>,
    om_generations: RowTable<OmGeneration>,
    blocks: RowTable<Block>,
    artifacts: ArtifactStore,
    episodes: EpisodeLog,
    pending_events: VecDeque<ChangeEvent>,
    closed: bool,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            notes: NoteStore::new(),
            entities: EntityStore::new(),
            edges: EdgeStore::new(),
            folders: FolderStore::new(),
            threads: RowTable::new(),
            thread_messages: RowTable::new(),
            memories: RowTable::new(),
            memory_threads: RowTable::new(),
            om_records: RowTable::new(),
            om_generations: RowTable::new(),
            blocks: RowTable::new(),
            artifacts: ArtifactStore::new(),
            episodes: EpisodeLog::new(),
            pending_events: VecDeque::new(),
            closed: false,
        }
    }

    fn now(&self) -> i64 {
        self.config.now.now_ms()
    }

    fn folder_path_of(&self, folder_id: Option<&str>) -> String {
        match folder_id {
            Some(id) => self
                .folders
                .path_of(id, self.config.folder_cycle_guard_depth),
            None => String::new(),
        }
    }

    #[tracing::instrument(level = "info", skip(self, fields))]
    pub fn create_note(&mut self, id: impl Into<String>, fields: NoteFields) -> NoteRow {
        let now = self.now();
        let row = self.notes.create(id.into(), fields, now);
        self.queue_index_event(ChangeKind::Created, &row);
        row
    }

    #[tracing::instrument(level = "info", skip(self, fields))]
    pub fn update_note(
        &mut self,
        id: &str,
        fields: NoteFields,
        reason: impl Into<String>,
    ) -> Result<NoteRow> {
        let now = self.now();
        let row = self.notes.update(id, fields, reason, now)?;
        self.queue_index_event(ChangeKind::Updated, &row);
        Ok(row)
    }

    pub fn upsert_note(
        &mut self,
        id: impl Into<String>,
        fields: NoteFields,
        reason: impl Into<String>,
    ) -> NoteRow {
        let now = self.now();
        let row = self.notes.upsert(id.into(), fields, reason, now);
        self.queue_index_event(ChangeKind::Updated, &row);
        row
    }

    pub fn get_note(&self, id: &str) -> Option<&NoteRow> {
        self.notes.get(id)
    }

    pub fn get_note_version(&self, id: &str, version: u32) -> Option<&NoteRow> {
        self.notes.get_version(id, version)
    }

    pub fn get_note_at_time(&self, id: &str, t: i64) -> Option<&NoteRow> {
        self.notes.get_at_time(id, t)
    }

    pub fn list_note_versions(&self, id: &str) -> Vec<NoteRow> {
        self.notes.list_versions(id)
    }

    #[tracing::instrument(level = "info", skip(self))]
    pub fn restore_note_version(&mut self, id: &str, version: u32) -> Result<NoteRow> {
        let now = self.now();
        let row = self.notes.restore_version(id, version, now)?;
        self.queue_index_event(ChangeKind::Updated, &row);
        Ok(row)
    }

    #[tracing::instrument(level = "info", skip(self))]
    pub fn delete_note(&mut self, id: &str) -> bool {
        let folder_path = self
            .notes
            .get(id)
            .map(|r| self.folder_path_of(r.fields.folder_id.as_deref()))
            .unwrap_or_default();
        let narrative_id = self
            .notes
            .get(id)
            .and_then(|r| r.fields.narrative_id.clone())
            .unwrap_or_default();
        let existed = self.notes.delete(id);
        if existed {
            self.pending_events.push_back(ChangeEvent {
                kind: ChangeKind::Deleted,
                doc_id: id.to_string(),
                fields: std::collections::HashMap::new(),
                narrative_id,
                folder_path,
            });
        }
        existed
    }

    pub fn count_notes(&self) -> usize {
        self.notes.count()
    }

    fn queue_index_event(&mut self, kind: ChangeKind, row: &NoteRow) {
        let folder_path = self.folder_path_of(row.fields.folder_id.as_deref());
        self.pending_events.push_back(ChangeEvent {
            kind,
            doc_id: row.id.clone(),
            fields: row.fields.indexable(),
            narrative_id: row.fields.narrative_id.clone().unwrap_or_default(),
            folder_path,
        });
    }

    /// Drains every change event queued since the last drain. The facade
    /// layer applies these against the engine's indexing surface.
    pub fn drain_events(&mut self) -> Vec<ChangeEvent> {
        self.pending_events.drain(..).collect()
    }

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityStore {
        &mut self.entities
    }

    pub fn edges(&self) -> &EdgeStore {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut EdgeStore {
        &mut self.edges
    }

    pub fn folders(&self) -> &FolderStore {
        &self.folders
    }

    pub fn folders_mut(&mut self) -> &mut FolderStore {
        &mut self.folders
    }

    pub fn threads_mut(&mut self) -> &mut RowTable<Thread> {
        &mut self.threads
    }

    pub fn thread_messages_mut(&mut self) -> &mut RowTable<ThreadMessage> {
        &mut self.thread_messages
    }

    pub fn memories_mut(&mut self) -> &mut RowTable<Memory> {
        &mut self.memories
    }

    pub fn memory_threads_mut(&mut self) -> &mut RowTable<MemoryThread> {
        &mut self.memory_threads
    }

    pub fn om_records_mut(&mut self) -> &mut RowTable<OmRecord> {
        &mut self.om_records
    }

    pub fn om_generations_mut(&mut self) -> &mut RowTable<OmGeneration> {
        &mut self.om_generations
    }

    pub fn blocks_mut(&mut self) -> &mut RowTable<Block> {
        &mut self.blocks
    }

    pub fn put_artifact(&mut self, artifact: WorkspaceArtifact) {
        self.artifacts.put(artifact);
    }

    pub fn get_artifact(&self, scope: &Scope, key: &str) -> Option<&WorkspaceArtifact> {
        self.artifacts.get(scope, key)
    }

    pub fn list_artifacts(&self, scope: &Scope) -> Vec<&WorkspaceArtifact> {
        self.artifacts.list(scope)
    }

    pub fn delete_artifact(&mut self, scope: &Scope, key: &str) -> bool {
        self.artifacts.delete(scope, key)
    }

    pub fn log_episode(&mut self, episode: Episode) {
        self.episodes.append(episode);
    }

    pub fn episodes_for_scope(&self, scope_id: &str) -> Vec<&Episode> {
        self.episodes.list_for_scope(scope_id)
    }

    #[tracing::instrument(level = "info", skip(self))]
    pub fn export(&self) -> Result<Vec<u8>> {
        let snapshot = Snapshot {
            notes: self.notes.clone(),
            entities: self.entities.clone(),
            edges: self.edges.clone(),
            folders: self.folders.clone(),
            threads: self.threads.clone(),
            thread_messages: self.thread_messages.clone(),
            memories: self.memories.clone(),
            memory_threads: self.memory_threads.clone(),
            om_records: self.om_records.clone(),
            om_generations: self.om_generations.clone(),
            blocks: self.blocks.clone(),
            artifacts: self.artifacts.clone(),
            episodes: self.episodes.clone(),
        };
        snapshot.export()
    }

    #[tracing::instrument(level = "info", skip(self, bytes))]
    pub fn import(&mut self, bytes: &[u8]) -> Result<()> {
        let snapshot = Snapshot::import(bytes)?;
        self.notes = snapshot.notes;
        self.entities = snapshot.entities;
        self.edges = snapshot.edges;
        self.folders = snapshot.folders;
        self.threads = snapshot.threads;
        self.thread_messages = snapshot.thread_messages;
        self.memories = snapshot.memories;
        self.memory_threads = snapshot.memory_threads;
        self.om_records = snapshot.om_records;
        self.om_generations = snapshot.om_generations;
        self.blocks = snapshot.blocks;
        self.artifacts = snapshot.artifacts;
        self.episodes = snapshot.episodes;
        self.pending_events.clear();
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(DomainError::Store {
                message: "store already closed".to_string(),
            }
            .into());
        }
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str) -> NoteFields {
        NoteFields {
            world_id: "w1".to_string(),
            title: title.to_string(),
            content: "body text".to_string(),
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

    #[test]
    fn creating_a_note_queues_a_created_change_event() {
        let mut store = Store::new(StoreConfig::default());
        store.create_note("n1", fields("First"));
        let events = store.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ChangeKind::Created);
        assert_eq!(events[0].doc_id, "n1");
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn export_then_import_round_trips_note_state() {
        let mut store = Store::new(StoreConfig::default());
        store.create_note("n1", fields("First"));
        store.update_note("n1", fields("Second"), "edit").unwrap();
        let bytes = store.export().unwrap();

        let mut restored = Store::new(StoreConfig::default());
        restored.import(&bytes).unwrap();
        assert_eq!(restored.count_notes(), 1);
        assert_eq!(restored.get_note("n1").unwrap().fields.title, "Second");
        assert_eq!(restored.list_note_versions("n1").len(), 2);
    }

    #[test]
    fn artifact_scope_matching_respects_wildcards() {
        let mut store = Store::new(StoreConfig::default());
        store.put_artifact(WorkspaceArtifact {
            scope: Scope::new("t1", "n1", "f1"),
            key: "k1".to_string(),
            kind: ArtifactKind::Snippet,
            payload: "{}".to_string(),
            pinned: false,
            produced_by: "tool".to_string(),
            created_at: 0,
            updated_at: 0,
        });
        assert!(store.list_artifacts(&Scope::new("t2", "n1", "f1")).is_empty());
        assert_eq!(store.list_artifacts(&Scope::new("t1", "n1", "f1")).len(), 1);
    }

    #[test]
    fn close_is_not_idempotent() {
        let mut store = Store::new(StoreConfig::default());
        store.close().unwrap();
        assert!(store.close().is_err());
    }
}
