//! Straightforward row storage for the entities the data model marks as
//! "present, treat as straightforward row storage": threads, messages,
//! memories, and the other/model-generation bookkeeping rows, plus `Block`
//! (the one row type among these that the engine interface touches, via its
//! `note_id`/`text` fields during re-indexing of a note's blocks).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub trait RowId {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Serialize + for<'a> Deserialize<'a>")]
pub struct RowTable<T: RowId + Clone> {
    rows: HashMap<String, T>,
}

impl<T: RowId + Clone> Default for RowTable<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }
}

impl<T: RowId + Clone> RowTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, row: T) {
        self.rows.insert(row.id().to_string(), row);
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.rows.get(id)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.rows.remove(id).is_some()
    }

    pub fn list(&self) -> Vec<&T> {
        self.rows.values().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

macro_rules! row_id_impl {
    ($ty:ty) => {
        impl RowId for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub world_id: String,
    pub title: String,
    pub created_at: i64,
    pub updated_at: i64,
}
row_id_impl!(Thread);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub thread_id: String,
    pub role: String,
    pub content: String,
    pub created_at: i64,
}
row_id_impl!(ThreadMessage);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id: String,
    pub world_id: String,
    pub summary: String,
    pub created_at: i64,
    pub updated_at: i64,
}
row_id_impl!(Memory);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryThread {
    pub id: String,
    pub memory_id: String,
    pub thread_id: String,
    pub created_at: i64,
}
row_id_impl!(MemoryThread);

/// A single recorded call to an outside model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmRecord {
    pub id: String,
    pub provider: String,
    pub model: String,
    pub prompt: String,
    pub created_at: i64,
}
row_id_impl!(OmRecord);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmGeneration {
    pub id: String,
    pub record_id: String,
    pub output: String,
    pub created_at: i64,
}
row_id_impl!(OmGeneration);

/// A chunk of a note's content, optionally carrying a dense embedding that
/// is opaque to the q-gram engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub note_id: String,
    pub ordinal: u32,
    pub text: String,
    pub vec: Option<Vec<f32>>,
    pub narrative_id: Option<String>,
    pub created_at: i64,
}
row_id_impl!(Block);
