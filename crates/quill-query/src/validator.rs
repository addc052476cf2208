//! Syntactic lane validation: RO rejects mutating verbs, WS rejects
//! references outside the workspace-owned relation set. This is a purely
//! lexical scan, not a real parser — it is deliberately conservative and
//! should reject rather than silently admit an ambiguous script.

use std::collections::HashSet;

use quill_error::{DomainError, Result};

use crate::lane::Lane;

const MUTATING_VERBS: &[&str] = &[
    "insert", "update", "delete", "put", "remove", "drop", "create", "alter", "truncate",
];

#[derive(Debug, Clone)]
pub struct LaneValidator {
    workspace_relations: HashSet<String>,
}

impl LaneValidator {
    pub fn new(workspace_relations: impl IntoIterator<Item = String>) -> Self {
        Self {
            workspace_relations: workspace_relations.into_iter().collect(),
        }
    }

    pub fn validate(&self, lane: Lane, script: &str) -> Result<()> {
        let normalized = script.to_ascii_lowercase();
        match lane {
            Lane::ReadOnly => {
                for verb in MUTATING_VERBS {
                    if contains_word(&normalized, verb) {
                        return Err(DomainError::ValidationRejected {
                            reason: format!("read-only lane cannot execute mutating verb '{verb}'"),
                        }
                        .into());
                    }
                }
                Ok(())
            }
            Lane::WorkspaceWrite => {
                for relation in referenced_relations(script) {
                    if !self.workspace_relations.contains(&relation) {
                        return Err(DomainError::ValidationRejected {
                            reason: format!(
                                "workspace-write lane cannot touch non-workspace relation '{relation}'"
                            ),
                        }
                        .into());
                    }
                }
                Ok(())
            }
        }
    }
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .any(|tok| tok == word)
}

/// Relation names are identifiers immediately preceded by `*` or `@`, the
/// convention this query family's scripts use to mark a relation reference.
fn referenced_relations(script: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut chars = script.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '*' || c == '@' {
            let rest = &script[i + c.len_utf8()..];
            let name: String = rest
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect();
            if !name.is_empty() {
                names.push(name);
            }
        }
    }
    names
}
