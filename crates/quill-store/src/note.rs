//! Bitemporal versioned notes (C11). Every mutation appends a new version
//! row to that note's chain rather than overwriting in place; exactly one
//! row per chain has `is_current = true, valid_to = None`.

use std::collections::HashMap;

use quill_error::{DomainError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteFields {
    pub world_id: String,
    pub title: String,
    pub content: String,
    pub markdown_content: String,
    pub folder_id: Option<String>,
    pub entity_kind: Option<String>,
    pub entity_subtype: Option<String>,
    pub is_entity: bool,
    pub is_pinned: bool,
    pub favorite: bool,
    pub owner_id: Option<String>,
    pub narrative_id: Option<String>,
    pub order: i64,
}

impl NoteFields {
    /// The subset of fields the engine should index, keyed by field name.
    pub fn indexable(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("title".to_string(), self.title.clone());
        map.insert("content".to_string(), self.content.clone());
        map.insert(
            "markdown_content".to_string(),
            self.markdown_content.clone(),
        );
        map
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRow {
    pub id: String,
    pub version: u32,
    pub fields: NoteFields,
    pub created_at: i64,
    pub updated_at: i64,
    pub valid_from: i64,
    pub valid_to: Option<i64>,
    pub is_current: bool,
    pub change_reason: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct NoteStore {
    /// Each chain is ordered ascending by version; the last element is
    /// always the current one.
    chains: HashMap<String, Vec<NoteRow>>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, id: String, fields: NoteFields, now: i64) -> NoteRow {
        let row = NoteRow {
            id: id.clone(),
            version: 1,
            fields,
            created_at: now,
            updated_at: now,
            valid_from: now,
            valid_to: None,
            is_current: true,
            change_reason: None,
        };
        self.chains.insert(id, vec![row.clone()]);
        row
    }

    /// Fails with `NotFound` if the chain does not exist.
    pub fn update(
        &mut self,
        id: &str,
        fields: NoteFields,
        reason: impl Into<String>,
        now: i64,
    ) -> Result<NoteRow> {
        let chain = self
            .chains
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound {
                what: "note",
                id: id.to_string(),
            })?;
        Ok(Self::append_version(chain, fields, Some(reason.into()), now))
    }

    /// Creates the note if absent, otherwise behaves like `update`.
    pub fn upsert(
        &mut self,
        id: String,
        fields: NoteFields,
        reason: impl Into<String>,
        now: i64,
    ) -> NoteRow {
        if self.chains.contains_key(&id) {
            self.update(&id, fields, reason, now)
                .expect("chain presence was just checked")
        } else {
            self.create(id, fields, now)
        }
    }

    fn append_version(
        chain: &mut Vec<NoteRow>,
        fields: NoteFields,
        reason: Option<String>,
        now: i64,
    ) -> NoteRow {
        let prev = chain.last_mut().expect("chain is never empty");
        prev.is_current = false;
        prev.valid_to = Some(now);
        let created_at = chain.first().map(|r| r.created_at).unwrap_or(now);
        let next = NoteRow {
            id: chain[0].id.clone(),
            version: chain.len() as u32 + 1,
            fields,
            created_at,
            updated_at: now,
            valid_from: now,
            valid_to: None,
            is_current: true,
            change_reason: reason,
        };
        chain.push(next.clone());
        next
    }

    pub fn get(&self, id: &str) -> Option<&NoteRow> {
        self.chains.get(id)?.last()
    }

    pub fn get_version(&self, id: &str, version: u32) -> Option<&NoteRow> {
        self.chains
            .get(id)?
            .iter()
            .find(|r| r.version == version)
    }

    pub fn get_at_time(&self, id: &str, t: i64) -> Option<&NoteRow> {
        self.chains.get(id)?.iter().find(|r| {
            r.valid_from <= t && r.valid_to.map(|vt| t < vt).unwrap_or(true)
        })
    }

    /// Descending by version.
    pub fn list_versions(&self, id: &str) -> Vec<NoteRow> {
        let mut versions: Vec<NoteRow> = self
            .chains
            .get(id)
            .map(|c| c.clone())
            .unwrap_or_default();
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        versions
    }

    pub fn restore_version(&mut self, id: &str, version: u32, now: i64) -> Result<NoteRow> {
        let fields = self
            .get_version(id, version)
            .ok_or_else(|| DomainError::NotFound {
                what: "note version",
                id: format!("{id}@v{version}"),
            })?
            .fields
            .clone();
        self.update(id, fields, "restore", now)
    }

    /// Removes every version. Returns `true` if the chain existed.
    pub fn delete(&mut self, id: &str) -> bool {
        self.chains.remove(id).is_some()
    }

    pub fn count(&self) -> usize {
        self.chains.len()
    }
}
