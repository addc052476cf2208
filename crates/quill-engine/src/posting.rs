//! Dual-mode posting list: a sorted slice for low-document-frequency grams,
//! promoted to a roaring bitmap once its cardinality crosses `T_PROMOTE`.
//! Promotion is one-way; a posting never demotes back to a slice.
//!
//! Cross-mode set algebra converts the smaller representation into the
//! larger one's kind before combining, so AND/OR/AND-NOT give the same
//! answer regardless of which side is which mode.

use quill_core::DocId;
use roaring::RoaringBitmap;

#[derive(Debug, Clone)]
pub enum PostingList {
    Small(Vec<u32>),
    Large(RoaringBitmap),
}

impl Default for PostingList {
    fn default() -> Self {
        PostingList::Small(Vec::new())
    }
}

impl PostingList {
    pub fn cardinality(&self) -> u64 {
        match self {
            PostingList::Small(v) => v.len() as u64,
            PostingList::Large(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cardinality() == 0
    }

    pub fn contains(&self, id: DocId) -> bool {
        match self {
            PostingList::Small(v) => v.binary_search(&id.0).is_ok(),
            PostingList::Large(b) => b.contains(id.0),
        }
    }

    /// Idempotent insert. Promotes to `Large` once cardinality exceeds
    /// `t_promote`; never demotes afterward.
    pub fn add(&mut self, id: DocId, t_promote: usize) {
        match self {
            PostingList::Small(v) => {
                if let Err(pos) = v.binary_search(&id.0) {
                    v.insert(pos, id.0);
                }
                if v.len() > t_promote {
                    let bitmap: RoaringBitmap = v.iter().copied().collect();
                    *self = PostingList::Large(bitmap);
                }
            }
            PostingList::Large(b) => {
                b.insert(id.0);
            }
        }
    }

    fn as_bitmap(&self) -> RoaringBitmap {
        match self {
            PostingList::Small(v) => v.iter().copied().collect(),
            PostingList::Large(b) => b.clone(),
        }
    }

    pub fn to_bitmap(&self) -> RoaringBitmap {
        self.as_bitmap()
    }

    pub fn and(&self, other: &PostingList) -> PostingList {
        PostingList::Large(self.as_bitmap() & other.as_bitmap())
    }

    pub fn or(&self, other: &PostingList) -> PostingList {
        PostingList::Large(self.as_bitmap() | other.as_bitmap())
    }

    pub fn and_not(&self, other: &PostingList) -> PostingList {
        PostingList::Large(self.as_bitmap() - other.as_bitmap())
    }

    pub fn and_not_bitmap(&self, other: &RoaringBitmap) -> RoaringBitmap {
        self.as_bitmap() - other
    }

    pub fn iter_sorted(&self) -> Vec<u32> {
        match self {
            PostingList::Small(v) => v.clone(),
            PostingList::Large(b) => b.iter().collect(),
        }
    }
}

/// Intersects postings for several grams, smallest-cardinality first, early
/// terminating once the running intersection becomes empty. A caller-side
/// "missing posting" (a gram absent from the index entirely) is distinct
/// from "empty posting" and must be checked before calling this: an absent
/// gram means the whole pattern cannot match, short-circuiting to empty.
pub fn intersect_many(postings: &[&PostingList]) -> RoaringBitmap {
    if postings.is_empty() {
        return RoaringBitmap::new();
    }
    let mut ordered: Vec<&&PostingList> = postings.iter().collect();
    ordered.sort_by_key(|p| p.cardinality());

    let mut acc = ordered[0].as_bitmap();
    for p in &ordered[1..] {
        if acc.is_empty() {
            break;
        }
        acc &= p.as_bitmap();
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent_and_sorted() {
        let mut p = PostingList::default();
        p.add(DocId(5), quill_core::T_PROMOTE);
        p.add(DocId(2), quill_core::T_PROMOTE);
        p.add(DocId(5), quill_core::T_PROMOTE);
        assert_eq!(p.iter_sorted(), vec![2, 5]);
    }

    #[test]
    fn promotes_past_threshold() {
        let mut p = PostingList::default();
        for i in 1..=(quill_core::T_PROMOTE as u32 + 5) {
            p.add(DocId(i), quill_core::T_PROMOTE);
        }
        assert!(matches!(p, PostingList::Large(_)));
        assert_eq!(p.cardinality(), quill_core::T_PROMOTE as u64 + 5);
    }

    #[test]
    fn cross_mode_and_matches_same_mode_and() {
        let mut small = PostingList::default();
        for i in [1, 2, 3] {
            small.add(DocId(i), quill_core::T_PROMOTE);
        }
        let mut large = PostingList::Large(RoaringBitmap::new());
        for i in [2, 3, 4] {
            large.add(DocId(i), quill_core::T_PROMOTE);
        }
        let result = small.and(&large);
        assert_eq!(result.iter_sorted(), vec![2, 3]);
    }

    #[test]
    fn intersect_many_short_circuits_on_empty() {
        let a = {
            let mut p = PostingList::default();
            p.add(DocId(1), quill_core::T_PROMOTE);
            p
        };
        let b = {
            let mut p = PostingList::default();
            p.add(DocId(2), quill_core::T_PROMOTE);
            p
        };
        let result = intersect_many(&[&a, &b]);
        assert!(result.is_empty());
    }

    #[test]
    fn intersect_many_ascending_cardinality_order_does_not_affect_result() {
        let small = {
            let mut p = PostingList::default();
            p.add(DocId(3), quill_core::T_PROMOTE);
            p
        };
        let mut big = PostingList::default();
        for i in 1..=10 {
            big.add(DocId(i), quill_core::T_PROMOTE);
        }
        let result = intersect_many(&[&big, &small]);
        assert_eq!(result.iter().collect::<Vec<_>>(), vec![3]);
    }
}
