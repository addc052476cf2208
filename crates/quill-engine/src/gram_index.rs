//! The Gram Index (C5): owns posting lists, per-gram stats, the DocID
//! mapper, the lazy-delete bitmap, corpus-level length sums, and the raw
//! per-document field text needed by the verifier. This is the engine's
//! single point of exclusive-lock-worthy mutable state (see the
//! concurrency model): every mutation here happens under one writer.

use std::collections::HashMap;

use quill_core::DocId;
use roaring::RoaringBitmap;

use crate::normalize::{extract_grams, normalize};
use crate::posting::PostingList;

#[derive(Debug, Clone, Default)]
pub struct GramStat {
    pub max_tf: u32,
    pub min_field_len: usize,
}

/// Raw per-document bookkeeping the engine needs independent of the store:
/// the fields as last indexed, and the scope-filter fields (narrative id,
/// folder path) supplied at `index_document` time.
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub fields: HashMap<String, String>,
    pub narrative_id: String,
    pub folder_path: String,
    pub total_len: usize,
}

#[derive(Debug, Default)]
pub struct GramIndex {
    pub q: usize,
    pub(crate) t_promote: usize,
    pub(crate) trace_inner_loops: bool,
    pub(crate) mapper: crate::docid::DocIdMapper,
    pub(crate) postings: HashMap<Vec<u8>, PostingList>,
    pub(crate) stats: HashMap<Vec<u8>, GramStat>,
    pub(crate) deleted: RoaringBitmap,
    pub(crate) documents: HashMap<DocId, DocumentInfo>,
    pub total_docs: u64,
    pub total_doc_len: u64,
    pub total_field_len: HashMap<String, u64>,
}

impl GramIndex {
    pub fn new(q: usize) -> Self {
        Self::with_config(q, quill_core::T_PROMOTE, false)
    }

    pub fn with_config(q: usize, t_promote: usize, trace_inner_loops: bool) -> Self {
        Self {
            q,
            t_promote,
            trace_inner_loops,
            mapper: crate::docid::DocIdMapper::new(),
            ..Default::default()
        }
    }

    pub fn doc_id_of(&self, doc_id: &str) -> Option<DocId> {
        self.mapper.get(doc_id)
    }

    pub fn resolve(&self, id: DocId) -> Option<&str> {
        self.mapper.resolve(id)
    }

    pub fn posting(&self, gram: &[u8]) -> Option<&PostingList> {
        self.postings.get(gram)
    }

    pub fn stat(&self, gram: &[u8]) -> Option<&GramStat> {
        self.stats.get(gram)
    }

    pub fn is_deleted(&self, id: DocId) -> bool {
        self.deleted.contains(id.0)
    }

    pub fn document(&self, id: DocId) -> Option<&DocumentInfo> {
        self.documents.get(&id)
    }

    /// All currently-live document ids (neither lazily nor hard deleted).
    pub fn live_doc_ids(&self) -> RoaringBitmap {
        self.documents.keys().map(|id| id.0).collect()
    }

    pub fn avg_doc_len(&self) -> f64 {
        if self.total_docs == 0 {
            100.0
        } else {
            self.total_doc_len as f64 / self.total_docs as f64
        }
    }

    pub fn idf(&self, gram: &[u8]) -> f64 {
        let n = self.total_docs as f64;
        let df = self
            .postings
            .get(gram)
            .map(|p| p.cardinality() as f64)
            .unwrap_or(0.0);
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    #[tracing::instrument(level = "debug", skip(self, fields))]
    pub fn index_document(
        &mut self,
        doc_id: &str,
        fields: &HashMap<String, String>,
        narrative_id: &str,
        folder_path: &str,
    ) {
        let id = self.mapper.get_or_assign(doc_id);
        // A re-index (update) must undo the previous contribution to corpus
        // sums before accounting for the new one.
        if let Some(prev) = self.documents.get(&id) {
            self.total_doc_len = self.total_doc_len.saturating_sub(prev.total_len as u64);
            for (f, len) in field_lens(&prev.fields) {
                if let Some(sum) = self.total_field_len.get_mut(&f) {
                    *sum = sum.saturating_sub(len as u64);
                }
            }
        } else {
            self.total_docs += 1;
        }

        let mut total_len = 0usize;
        for (field_name, raw_text) in fields {
            let normalized = normalize(raw_text);
            let field_len = normalized.len();
            total_len += field_len;
            *self
                .total_field_len
                .entry(field_name.clone())
                .or_insert(0) += field_len as u64;

            if field_len < self.q {
                continue;
            }

            let mut tf_in_field: HashMap<&[u8], u32> = HashMap::new();
            let mut seg_masks: HashMap<&[u8], u32> = HashMap::new();
            for (i, gram) in extract_grams(&normalized, self.q).into_iter().enumerate() {
                *tf_in_field.entry(gram).or_insert(0) += 1;
                let seg_idx = std::cmp::min(31, (i * 32) / field_len);
                *seg_masks.entry(gram).or_insert(0) |= 1u32 << seg_idx;
            }

            for (gram, tf) in tf_in_field {
                #[cfg(feature = "trace-inner-loops")]
                if self.trace_inner_loops {
                    tracing::trace!(
                        gram = %String::from_utf8_lossy(gram),
                        tf,
                        field = %field_name,
                        "indexing gram"
                    );
                }
                self.postings
                    .entry(gram.to_vec())
                    .or_default()
                    .add(id, self.t_promote);
                let stat = self.stats.entry(gram.to_vec()).or_insert(GramStat {
                    max_tf: 0,
                    min_field_len: field_len,
                });
                stat.max_tf = stat.max_tf.max(tf);
                stat.min_field_len = stat.min_field_len.min(field_len);
            }
            let _ = seg_masks; // segment masks flow through the payload store (C4), optional here.
        }

        self.total_doc_len += total_len as u64;
        self.documents.insert(
            id,
            DocumentInfo {
                fields: fields.clone(),
                narrative_id: narrative_id.to_string(),
                folder_path: folder_path.to_string(),
                total_len,
            },
        );
        self.deleted.remove(id.0);
    }

    /// Lazy delete: marks `id` deleted, removes its document info, and
    /// decrements `total_docs`. Posting lists are untouched until `compact`.
    /// `total_doc_len`/per-field sums are intentionally *not* adjusted here
    /// (see the lazy-delete stats-drift design note) — this matches the
    /// reference source exactly rather than fixing the drift.
    #[tracing::instrument(level = "info", skip(self))]
    pub fn remove_document(&mut self, doc_id: &str) -> bool {
        let Some(id) = self.mapper.get(doc_id) else {
            return false;
        };
        if self.deleted.contains(id.0) {
            return true;
        }
        self.deleted.insert(id.0);
        self.documents.remove(&id);
        self.total_docs = self.total_docs.saturating_sub(1);
        true
    }

    /// Synchronous hard delete: purges `id` from every posting list it
    /// appears in immediately and adjusts length sums exactly.
    #[tracing::instrument(level = "info", skip(self))]
    pub fn remove_document_hard(&mut self, doc_id: &str) -> bool {
        let Some(id) = self.mapper.get(doc_id) else {
            return false;
        };
        let was_lazily_deleted = self.deleted.contains(id.0);
        if let Some(info) = self.documents.remove(&id) {
            self.total_doc_len = self.total_doc_len.saturating_sub(info.total_len as u64);
            for (f, len) in field_lens(&info.fields) {
                if let Some(sum) = self.total_field_len.get_mut(&f) {
                    *sum = sum.saturating_sub(len as u64);
                }
            }
            if !was_lazily_deleted {
                self.total_docs = self.total_docs.saturating_sub(1);
            }
        }
        // total_docs was already decremented at lazy-delete time if it applies.

        let mut removed_bitmap = RoaringBitmap::new();
        removed_bitmap.insert(id.0);
        for posting in self.postings.values_mut() {
            if posting.contains(id) {
                *posting = posting.and_not(&PostingList::Large(removed_bitmap.clone()));
            }
        }
        self.deleted.remove(id.0);
        self.postings.retain(|_, p| !p.is_empty());
        true
    }

    /// Applies `posting.and_not(deleted)` to every gram, drops emptied
    /// postings, then clears the deleted bitmap.
    #[tracing::instrument(level = "info", skip(self))]
    pub fn compact(&mut self) {
        if self.deleted.is_empty() {
            return;
        }
        let deleted = PostingList::Large(self.deleted.clone());
        for posting in self.postings.values_mut() {
            *posting = posting.and_not(&deleted);
        }
        self.postings.retain(|_, p| !p.is_empty());
        self.deleted.clear();
    }
}

fn field_lens(fields: &HashMap<String, String>) -> Vec<(String, usize)> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), normalize(v).len()))
        .collect()
}
