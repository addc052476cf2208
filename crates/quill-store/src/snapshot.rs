//! Opaque export/import blob (C14): a single serialized snapshot of every
//! row table in the store, import of which into a fresh store must
//! round-trip every previously-visible operation.

use quill_error::{FatalError, Result};
use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactStore;
use crate::edge::EdgeStore;
use crate::entity::EntityStore;
use crate::episode::EpisodeLog;
use crate::folder::FolderStore;
use crate::note::NoteStore;
use crate::rows::{Block, Memory, MemoryThread, OmGeneration, OmRecord, RowTable, Thread, ThreadMessage};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub notes: NoteStore,
    pub entities: EntityStore,
    pub edges: EdgeStore,
    pub folders: FolderStore,
    pub threads: RowTable<Thread>,
    pub thread_messages: RowTable<ThreadMessage>,
    pub memories: RowTable<Memory>,
    pub memory_threads: RowTable<MemoryThread>,
    pub om_records: RowTable<OmRecord>,
    pub om_generations: RowTable<OmGeneration>,
    pub blocks: RowTable<Block>,
    pub artifacts: ArtifactStore,
    pub episodes: EpisodeLog,
}

impl Snapshot {
    pub fn export(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| FatalError::SerializationFailure(e.to_string()).into())
    }

    pub fn import(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| FatalError::SerializationFailure(e.to_string()).into())
    }
}
