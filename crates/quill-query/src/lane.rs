//! Query lanes: read-only vs workspace-write. Every call declares one.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    /// No mutation permitted; rejects scripts containing mutating verbs.
    ReadOnly,
    /// May mutate workspace-owned relations only.
    WorkspaceWrite,
}

impl Lane {
    pub fn as_str(self) -> &'static str {
        match self {
            Lane::ReadOnly => "ro",
            Lane::WorkspaceWrite => "ws",
        }
    }
}
