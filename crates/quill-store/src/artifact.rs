//! Scoped workspace artifacts (C12): ephemeral, opaque-payload rows keyed on
//! a `(scope, key)` pair, produced by tool calls and read back by later ones
//! within the same workspace scope.

use quill_core::Scope;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    Hits,
    SpanSet,
    Snippet,
    Table,
    Summary,
    DraftAnswer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceArtifact {
    pub scope: Scope,
    pub key: String,
    pub kind: ArtifactKind,
    pub payload: String,
    pub pinned: bool,
    pub produced_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ArtifactStore {
    rows: Vec<WorkspaceArtifact>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert on `(scope, key)`.
    pub fn put(&mut self, artifact: WorkspaceArtifact) {
        if let Some(existing) = self
            .rows
            .iter_mut()
            .find(|a| a.scope == artifact.scope && a.key == artifact.key)
        {
            let created_at = existing.created_at;
            *existing = artifact;
            existing.created_at = created_at;
        } else {
            self.rows.push(artifact);
        }
    }

    /// Shares `list`'s wildcard scope semantics: an empty field on either
    /// side of [`Scope::matches`] matches anything.
    pub fn get(&self, scope: &Scope, key: &str) -> Option<&WorkspaceArtifact> {
        self.rows
            .iter()
            .find(|a| scope.matches(&a.scope) && a.key == key)
    }

    /// Rows whose stored scope matches `query_scope` (wildcard rule from
    /// [`Scope::matches`]), ordered by `created_at` ascending.
    pub fn list(&self, query_scope: &Scope) -> Vec<&WorkspaceArtifact> {
        let mut matched: Vec<&WorkspaceArtifact> = self
            .rows
            .iter()
            .filter(|a| query_scope.matches(&a.scope))
            .collect();
        matched.sort_by_key(|a| a.created_at);
        matched
    }

    /// Shares `list`'s wildcard scope semantics; a wildcard query scope
    /// deletes every matching row with the given key, not just an exact
    /// scope match.
    pub fn delete(&mut self, scope: &Scope, key: &str) -> bool {
        let before = self.rows.len();
        self.rows
            .retain(|a| !(scope.matches(&a.scope) && a.key == key));
        self.rows.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(scope: Scope, key: &str, created_at: i64) -> WorkspaceArtifact {
        WorkspaceArtifact {
            scope,
            key: key.to_string(),
            kind: ArtifactKind::Snippet,
            payload: "{}".to_string(),
            pinned: false,
            produced_by: "tool".to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn list_only_returns_matching_scope() {
        let mut store = ArtifactStore::new();
        let scope1 = Scope::new("t1", "n1", "f1");
        store.put(artifact(scope1.clone(), "k1", 100));

        let scope2 = Scope::new("t2", "n1", "f1");
        assert!(store.list(&scope2).is_empty());
        assert_eq!(store.list(&scope1).len(), 1);
    }

    #[test]
    fn put_is_upsert_on_scope_and_key() {
        let mut store = ArtifactStore::new();
        let scope = Scope::new("t1", "n1", "f1");
        store.put(artifact(scope.clone(), "k1", 100));
        let mut updated = artifact(scope.clone(), "k1", 200);
        updated.payload = "{\"v\":2}".to_string();
        store.put(updated);

        let rows = store.list(&scope);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].payload, "{\"v\":2}");
        assert_eq!(rows[0].created_at, 100);
    }

    #[test]
    fn get_and_delete_honor_wildcard_scope_fields() {
        let mut store = ArtifactStore::new();
        let scope = Scope::new("t1", "n1", "f1");
        store.put(artifact(scope.clone(), "k1", 100));

        let wildcard = Scope::new("t1", "", "");
        assert!(store.get(&wildcard, "k1").is_some());
        assert!(store.delete(&wildcard, "k1"));
        assert!(store.get(&scope, "k1").is_none());
    }

    #[test]
    fn list_is_ordered_by_created_at_ascending() {
        let mut store = ArtifactStore::new();
        let scope = Scope::new("t1", "n1", "f1");
        store.put(artifact(scope.clone(), "later", 200));
        store.put(artifact(scope.clone(), "earlier", 100));
        let rows = store.list(&scope);
        assert_eq!(rows[0].key, "earlier");
        assert_eq!(rows[1].key, "later");
    }
}
