//! Append-only episode log: one record per lane-query execution, fed by the
//! query runner (C13).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub scope_id: String,
    pub note_id: Option<String>,
    pub ts: i64,
    pub action_type: String,
    pub target_id: Option<String>,
    pub target_kind: Option<String>,
    pub payload: String,
    pub narrative_id: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EpisodeLog {
    rows: Vec<Episode>,
}

impl EpisodeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, episode: Episode) {
        self.rows.push(episode);
    }

    pub fn list_for_scope(&self, scope_id: &str) -> Vec<&Episode> {
        self.rows.iter().filter(|e| e.scope_id == scope_id).collect()
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

    #[test]
    fn append_and_filter_by_scope() {
        let mut log = EpisodeLog::new();
        log.append(Episode {
            scope_id: "s1".to_string(),
            note_id: None,
            ts: 1,
            action_type: "run_ro".to_string(),
            target_id: None,
            target_kind: None,
            payload: "{}".to_string(),
            narrative_id: None,
        });
        log.append(Episode {
            scope_id: "s2".to_string(),
            note_id: None,
            ts: 2,
            action_type: "run_ws".to_string(),
            target_id: None,
            target_kind: None,
            payload: "{}".to_string(),
            narrative_id: None,
        });
        assert_eq!(log.list_for_scope("s1").len(), 1);
        assert_eq!(log.len(), 2);
    }
}
