use serde::{Deserialize, Serialize};

/// Dense internal document id. `0` is reserved for "absent"; ids are issued
/// starting at 1 and are never reused once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub u32);

impl DocId {
    pub const ABSENT: DocId = DocId(0);

    pub fn is_absent(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for DocId {
    fn from(v: u32) -> Self {
        DocId(v)
    }
}

impl From<DocId> for u32 {
    fn from(id: DocId) -> Self {
        id.0
    }
}
