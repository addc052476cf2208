//! Folder hierarchy. A forest; cycles are a caller error the store does not
//! detect, so ancestor walks are capped at a configured depth rather than
//! looping forever.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub world_id: String,
    pub narrative_id: Option<String>,
    pub folder_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FolderStore {
    rows: HashMap<String, Folder>,
}

impl FolderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, folder: Folder) {
        self.rows.insert(folder.id.clone(), folder);
    }

    pub fn get(&self, id: &str) -> Option<&Folder> {
        self.rows.get(id)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.rows.remove(id).is_some()
    }

    /// Walks `parent_id` up to `guard_depth` hops, joining names with `/`.
    /// A cycle simply truncates the path at the guard depth rather than
    /// hanging; it does not surface as an error.
    pub fn path_of(&self, id: &str, guard_depth: usize) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id.to_string());
        let mut hops = 0;
        while let Some(cur_id) = current {
            if hops >= guard_depth {
                break;
            }
            let Some(folder) = self.rows.get(&cur_id) else {
                break;
            };
            segments.push(folder.name.clone());
            current = folder.parent_id.clone();
            hops += 1;
        }
        segments.reverse();
        segments.join("/")
    }
}
