//! Extracted entities (people, places, things) and their aliases.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatedBy {
    User,
    Extraction,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub label: String,
    pub kind: String,
    pub subtype: Option<String>,
    pub aliases: Vec<String>,
    pub first_note: Option<String>,
    pub total_mentions: u64,
    pub narrative_id: Option<String>,
    pub created_by: CreatedBy,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    rows: HashMap<String, Entity>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, entity: Entity) {
        self.rows.insert(entity.id.clone(), entity);
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.rows.get(id)
    }

    /// Case-insensitive lookup by `label`.
    pub fn get_by_label(&self, label: &str) -> Option<&Entity> {
        let needle = label.to_ascii_lowercase();
        self.rows
            .values()
            .find(|e| e.label.to_ascii_lowercase() == needle)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.rows.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: &str, label: &str) -> Entity {
        Entity {
            id: id.to_string(),
            label: label.to_string(),
            kind: "character".to_string(),
            subtype: None,
            aliases: vec![],
            first_note: None,
            total_mentions: 0,
            narrative_id: None,
            created_by: CreatedBy::User,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn label_lookup_is_case_insensitive() {
        let mut store = EntityStore::new();
        store.put(entity("e1", "Gandalf"));
        assert!(store.get_by_label("gandalf").is_some());
        assert!(store.get_by_label("GANDALF").is_some());
        assert!(store.get_by_label("frodo").is_none());
    }
}
