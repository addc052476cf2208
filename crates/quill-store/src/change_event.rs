//! Change events the store emits on note mutation, drained by the facade
//! layer and applied against the engine's `index_document`/`remove_document*`
//! surface. The store does not depend on the engine crate; this is the
//! decoupling seam described by the ownership section of the data model.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub doc_id: String,
    pub fields: HashMap<String, String>,
    pub narrative_id: String,
    pub folder_path: String,
}
