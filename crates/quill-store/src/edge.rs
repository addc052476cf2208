//! Relationships between entities. No referential integrity: a dangling
//! `source_id`/`target_id` is permitted and the caller's responsibility.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub rel_type: String,
    pub confidence: f64,
    pub bidirectional: bool,
    pub source_note: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EdgeStore {
    rows: HashMap<String, Edge>,
}

impl EdgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `confidence` outside `[0, 1]` is clamped rather than rejected; edges
    /// carry no referential-integrity check on either endpoint.
    pub fn put(&mut self, mut edge: Edge) {
        edge.confidence = edge.confidence.clamp(0.0, 1.0);
        self.rows.insert(edge.id.clone(), edge);
    }

    pub fn get(&self, id: &str) -> Option<&Edge> {
        self.rows.get(id)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.rows.remove(id).is_some()
    }

    pub fn list_for_note(&self, source_note: &str) -> Vec<&Edge> {
        self.rows
            .values()
            .filter(|e| e.source_note.as_deref() == Some(source_note))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_endpoints_are_permitted() {
        let mut store = EdgeStore::new();
        store.put(Edge {
            id: "e1".to_string(),
            source_id: "missing-a".to_string(),
            target_id: "missing-b".to_string(),
            rel_type: "knows".to_string(),
            confidence: 0.9,
            bidirectional: true,
            source_note: None,
            created_at: 0,
        });
        assert!(store.get("e1").is_some());
    }

    #[test]
    fn confidence_is_clamped_to_unit_interval() {
        let mut store = EdgeStore::new();
        store.put(Edge {
            id: "e1".to_string(),
            source_id: "a".to_string(),
            target_id: "b".to_string(),
            rel_type: "knows".to_string(),
            confidence: 5.0,
            bidirectional: false,
            source_note: None,
            created_at: 0,
        });
        assert_eq!(store.get("e1").unwrap().confidence, 1.0);
    }
}
