//! WAND-style dynamic pruning (C8): per-clause upper-bound scores merged
//! over sorted candidate iterators, yielding per-document upper bounds the
//! scorer can use to short-circuit verification.

use crate::gram_index::GramIndex;
use crate::normalize::extract_grams;
use crate::query_parser::Clause;

#[derive(Debug, Clone, Copy)]
pub struct WandCandidate {
    pub doc_id: u32,
    pub upper_bound: f64,
}

/// `idf_ub * max_g impact_ub(g)`, falling back to `k1+1` if the clause has
/// no gram with recorded stats (e.g. a short-pattern clause).
fn clause_max_score(index: &GramIndex, pattern: &str, k1: f64, b: f64) -> f64 {
    let n = index.total_docs as f64;
    let idf_ub = (1.0 + n).ln();
    let avg_doc_len = index.avg_doc_len();

    let grams = extract_grams(pattern, index.q);
    let mut best_impact: Option<f64> = None;
    for gram in grams {
        #[cfg(feature = "trace-inner-loops")]
        if index.trace_inner_loops {
            tracing::trace!(gram = %String::from_utf8_lossy(gram), "wand impact gram");
        }
        if let Some(stat) = index.stat(gram) {
            let max_tf = stat.max_tf as f64;
            let min_field_len = stat.min_field_len as f64;
            let impact = (k1 + 1.0) * max_tf
                / (k1 * (1.0 - b + b * min_field_len / avg_doc_len) + max_tf);
            best_impact = Some(best_impact.map_or(impact, |cur: f64| cur.max(impact)));
        }
    }

    match best_impact {
        Some(impact) => idf_ub * impact,
        None => k1 + 1.0,
    }
}

struct ClauseIter {
    sorted_docs: Vec<u32>,
    pos: usize,
    max_score: f64,
}

impl ClauseIter {
    fn current(&self) -> Option<u32> {
        self.sorted_docs.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn exhausted(&self) -> bool {
        self.pos >= self.sorted_docs.len()
    }
}

/// Runs the merge loop over every clause's candidate bitmap, emitting a
/// per-document summed upper bound. `cancelled` is checked at least once
/// per pivot, per the cancellation contract.
pub fn wand_merge(
    index: &GramIndex,
    clauses: &[Clause],
    candidates_per_clause: &[roaring::RoaringBitmap],
    k1: f64,
    b: f64,
    mut cancelled: impl FnMut() -> bool,
) -> Vec<WandCandidate> {
    let mut iters: Vec<ClauseIter> = clauses
        .iter()
        .zip(candidates_per_clause)
        .map(|(clause, bitmap)| ClauseIter {
            sorted_docs: bitmap.iter().collect(),
            pos: 0,
            max_score: clause_max_score(index, &clause.pattern, k1, b),
        })
        .collect();

    let mut out = Vec::new();
    loop {
        if cancelled() {
            break;
        }
        let Some(pivot) = iters.iter().filter(|it| !it.exhausted()).map(|it| it.current().unwrap()).min() else {
            break;
        };

        let mut sum = 0.0;
        for it in iters.iter_mut() {
            if it.current() == Some(pivot) {
                sum += it.max_score;
                it.advance();
            }
        }
        out.push(WandCandidate {
            doc_id: pivot,
            upper_bound: sum,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_parser::parse_query;
    use roaring::RoaringBitmap;
    use std::collections::HashMap;

    fn idx_with(docs: &[(&str, &str)]) -> GramIndex {
        let mut idx = GramIndex::new(3);
        for (id, body) in docs {
            let mut fields = HashMap::new();
            fields.insert("body".to_string(), body.to_string());
            idx.index_document(id, &fields, "", "");
        }
        idx
    }

    #[test]
    fn merge_loop_emits_one_candidate_per_pivot() {
        let idx = idx_with(&[("d1", "alpha bravo"), ("d2", "alpha")]);
        let clauses = parse_query("alpha bravo");
        let mut bitmaps = Vec::new();
        for clause in &clauses {
            bitmaps.push(crate::candidates::candidates_for_clause(
                &idx,
                &clause.pattern,
                1_000_000,
            ));
        }
        let out = wand_merge(&idx, &clauses, &bitmaps, 1.2, 0.75, || false);
        let doc_ids: Vec<u32> = out.iter().map(|c| c.doc_id).collect();
        assert_eq!(doc_ids.len(), 2);
    }

    #[test]
    fn cancellation_stops_the_scan() {
        let idx = idx_with(&[("d1", "alpha"), ("d2", "alpha")]);
        let clauses = parse_query("alpha");
        let bitmaps: Vec<RoaringBitmap> = clauses
            .iter()
            .map(|c| crate::candidates::candidates_for_clause(&idx, &c.pattern, 1_000_000))
            .collect();
        let out = wand_merge(&idx, &clauses, &bitmaps, 1.2, 0.75, || true);
        assert!(out.is_empty());
    }
}
