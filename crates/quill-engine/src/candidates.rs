//! Candidate generation (C7): turns parsed clauses into per-clause
//! candidate doc-id bitmaps via gram intersection, then unions them across
//! clauses. The soft-AND behaviour lives entirely in the scorer — a
//! document missing some clauses remains a candidate here.

use roaring::RoaringBitmap;

use crate::gram_index::GramIndex;
use crate::normalize::extract_grams;
use crate::posting::{intersect_many, PostingList};
use crate::query_parser::Clause;

/// Candidates for a single clause.
///
/// - `len(pattern) < q`: short-pattern fallback, returns every live document.
/// - Any gram of the pattern missing from the index: the pattern cannot
///   match anything live, so this returns empty (distinct from an empty
///   posting for a gram that *is* indexed).
/// - Otherwise: intersect postings in ascending-cardinality order, then
///   subtract the lazily-deleted bitmap.
pub fn candidates_for_clause(index: &GramIndex, pattern: &str, max_candidates: u64) -> RoaringBitmap {
    if pattern.len() < index.q {
        return index.live_doc_ids();
    }

    let grams = adaptive_gram_selection(index, pattern, max_candidates);
    if grams.is_empty() {
        return RoaringBitmap::new();
    }

    let mut postings: Vec<&PostingList> = Vec::with_capacity(grams.len());
    for gram in &grams {
        #[cfg(feature = "trace-inner-loops")]
        if index.trace_inner_loops {
            tracing::trace!(gram = %String::from_utf8_lossy(gram), "candidate gram lookup");
        }
        match index.posting(gram) {
            Some(p) => postings.push(p),
            None => return RoaringBitmap::new(),
        }
    }

    let mut result = intersect_many(&postings);
    result -= &index.deleted;
    result
}

/// If, after sorting grams by posting cardinality, even the smallest one
/// already exceeds `max_candidates`, defer discrimination to the verifier
/// by returning just that single most-selective gram — this caps
/// intersection cost for very common gram sets.
fn adaptive_gram_selection(index: &GramIndex, pattern: &str, max_candidates: u64) -> Vec<Vec<u8>> {
    let mut grams: Vec<Vec<u8>> = extract_grams(pattern, index.q)
        .into_iter()
        .map(<[u8]>::to_vec)
        .collect();
    grams.sort();
    grams.dedup();

    let mut by_cardinality: Vec<(Vec<u8>, u64)> = grams
        .into_iter()
        .map(|g| {
            let card = index.posting(&g).map(|p| p.cardinality()).unwrap_or(0);
            (g, card)
        })
        .collect();
    by_cardinality.sort_by_key(|(_, card)| *card);

    if let Some((gram, card)) = by_cardinality.first() {
        if *card > max_candidates {
            return vec![gram.clone()];
        }
    }

    by_cardinality.into_iter().map(|(g, _)| g).collect()
}

/// Union of per-clause candidates across the whole query.
pub fn generate_candidates(
    index: &GramIndex,
    clauses: &[Clause],
    max_candidates: u64,
) -> RoaringBitmap {
    let mut union = RoaringBitmap::new();
    for clause in clauses {
        union |= candidates_for_clause(index, &clause.pattern, max_candidates);
    }
    union
}
