use serde::{Deserialize, Serialize};

use crate::ArcStr;

/// Namespaces ephemeral workspace artifacts and scoped note search.
///
/// The empty string in any field means "any" (a wildcard), matching the
/// canonicalisation rule from the data model: scope tuples are compared
/// field-by-field, with an empty stored or queried value matching anything.
///
/// Fields are [`ArcStr`] rather than `String`: a tool call producing several
/// workspace-artifact rows in the same scope clones that scope once per row,
/// so a cheap `Arc` bump beats re-allocating the same three strings each time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub thread_id: ArcStr,
    pub narrative_id: ArcStr,
    pub folder_id: ArcStr,
}

impl Scope {
    pub fn new(
        thread_id: impl Into<ArcStr>,
        narrative_id: impl Into<ArcStr>,
        folder_id: impl Into<ArcStr>,
    ) -> Self {
        Self {
            thread_id: thread_id.into(),
            narrative_id: narrative_id.into(),
            folder_id: folder_id.into(),
        }
    }

    pub fn any() -> Self {
        Self::default()
    }

    /// True if `self` (a query scope) matches `other` (a stored scope), where
    /// an empty field on either side is a wildcard for that field.
    pub fn matches(&self, other: &Scope) -> bool {
        Self::field_matches(&self.thread_id, &other.thread_id)
            && Self::field_matches(&self.narrative_id, &other.narrative_id)
            && Self::field_matches(&self.folder_id, &other.folder_id)
    }

    fn field_matches(query: &str, stored: &str) -> bool {
        query.is_empty() || stored.is_empty() || query == stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_are_wildcards() {
        let stored = Scope::new("t1", "n1", "f1");
        assert!(Scope::new("", "n1", "f1").matches(&stored));
        assert!(Scope::new("t1", "", "").matches(&stored));
        assert!(Scope::any().matches(&stored));
    }

    #[test]
    fn mismatched_concrete_field_does_not_match() {
        let stored = Scope::new("t1", "n1", "f1");
        assert!(!Scope::new("t2", "n1", "f1").matches(&stored));
    }
}
