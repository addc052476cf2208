//! The top-level engine surface: `index_document`, `remove_document(_hard)`,
//! `compact`, and `search`, wiring together C1–C10.

use std::collections::HashMap;

use quill_core::DocId;

use crate::candidates::generate_candidates;
use crate::config::{EngineConfig, SearchConfig};
use crate::gram_index::GramIndex;
use crate::query_parser::parse_query;
use crate::scorer::{clause_idf, score_document};
use crate::verifier::QueryVerifier;
use crate::wand::wand_merge;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub doc_id: String,
    pub score: f64,
    pub coverage: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub partial: bool,
}

pub struct Engine {
    index: GramIndex,
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let index = GramIndex::with_config(config.q, config.t_promote, config.trace_inner_loops);
        Self { index, config }
    }

    #[tracing::instrument(level = "debug", skip(self, fields))]
    pub fn index_document(
        &mut self,
        doc_id: &str,
        fields: &HashMap<String, String>,
        narrative_id: &str,
        folder_path: &str,
    ) {
        self.index
            .index_document(doc_id, fields, narrative_id, folder_path);
    }

    pub fn remove_document(&mut self, doc_id: &str) -> bool {
        self.index.remove_document(doc_id)
    }

    pub fn remove_document_hard(&mut self, doc_id: &str) -> bool {
        self.index.remove_document_hard(doc_id)
    }

    pub fn compact(&mut self) {
        self.index.compact();
    }

    pub fn doc_count(&self) -> u64 {
        self.index.total_docs
    }

    #[tracing::instrument(level = "debug", skip(self, cfg, cancelled))]
    pub fn search(
        &self,
        input: &str,
        cfg: &SearchConfig,
        limit: usize,
        mut cancelled: impl FnMut() -> bool,
    ) -> SearchOutcome {
        let clauses = parse_query(input);
        if clauses.is_empty() {
            return SearchOutcome::default();
        }

        let candidates_per_clause: Vec<roaring::RoaringBitmap> = clauses
            .iter()
            .map(|c| {
                crate::candidates::candidates_for_clause(
                    &self.index,
                    &c.pattern,
                    self.config.max_candidates_for_adaptive_selection,
                )
            })
            .collect();
        let union = generate_candidates(
            &self.index,
            &clauses,
            self.config.max_candidates_for_adaptive_selection,
        );
        if union.is_empty() {
            return SearchOutcome::default();
        }

        let idfs: Vec<f64> = clauses
            .iter()
            .map(|c| clause_idf(&self.index, &c.pattern))
            .collect();

        let verifier = match QueryVerifier::build(&clauses) {
            Some(v) => v,
            None => return SearchOutcome::default(),
        };

        let wand_candidates = wand_merge(
            &self.index,
            &clauses,
            &candidates_per_clause,
            cfg.k1,
            cfg.b,
            &mut cancelled,
        );

        let avg_field_len = self.avg_field_len();

        let mut window: Vec<(f64, u32, f64)> = Vec::with_capacity(limit.max(1));
        let mut partial = false;
        let scope_filter = ScopeFilter::from(cfg);
        let total_clauses = clauses.len().max(1) as f64;

        for cand in wand_candidates {
            if cancelled() {
                partial = true;
                break;
            }
            let threshold = if limit > 0 && window.len() >= limit {
                window.first().map(|(s, _)| *s)
            } else {
                None
            };
            if let Some(t) = threshold {
                if cand.upper_bound <= t {
                    continue;
                }
            }

            let doc_id = DocId(cand.doc_id);
            let Some(doc) = self.index.document(doc_id) else {
                continue;
            };
            if !scope_filter.matches(doc) {
                continue;
            }

            let (matches, matched_count) = verifier.verify(doc, cfg.max_segments);
            let Some(score) = score_document(
                &self.index,
                doc,
                &clauses,
                &matches,
                &idfs,
                &avg_field_len,
                cfg,
            ) else {
                continue;
            };
            let coverage = matched_count as f64 / total_clauses;

            if limit == 0 {
                window.push((score, cand.doc_id, coverage));
                continue;
            }
            if window.len() < limit {
                let pos = window.partition_point(|(s, _, _)| *s < score);
                window.insert(pos, (score, cand.doc_id, coverage));
            } else if let Some((min_score, _, _)) = window.first().copied() {
                if score > min_score {
                    window.remove(0);
                    let pos = window.partition_point(|(s, _, _)| *s < score);
                    window.insert(pos, (score, cand.doc_id, coverage));
                }
            }
        }

        window.sort_by(|(s1, d1, _), (s2, d2, _)| {
            s2.partial_cmp(s1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    if (s1 - s2).abs() < 1e-9 {
                        d1.cmp(d2)
                    } else {
                        std::cmp::Ordering::Equal
                    }
                })
        });

        let results = window
            .into_iter()
            .filter_map(|(score, doc_id_u32, coverage)| {
                let doc_id = DocId(doc_id_u32);
                let resolved = self.index.resolve(doc_id)?.to_string();
                Some(SearchResult {
                    doc_id: resolved,
                    score,
                    coverage,
                })
            })
            .collect();

        SearchOutcome { results, partial }
    }

    fn avg_field_len(&self) -> HashMap<String, f64> {
        self.index
            .total_field_len
            .iter()
            .map(|(field, total)| {
                let avg = if self.index.total_docs == 0 {
                    100.0
                } else {
                    *total as f64 / self.index.total_docs as f64
                };
                (field.clone(), avg)
            })
            .collect()
    }
}

struct ScopeFilter {
    narrative_id: Option<String>,
    folder_path: Option<String>,
}

impl From<&SearchConfig> for ScopeFilter {
    fn from(cfg: &SearchConfig) -> Self {
        match &cfg.scope {
            Some(scope) => Self {
                narrative_id: (!scope.narrative_id.is_empty()).then(|| scope.narrative_id.clone()),
                folder_path: (!scope.folder_path.is_empty()).then(|| scope.folder_path.clone()),
            },
            None => Self {
                narrative_id: None,
                folder_path: None,
            },
        }
    }
}

impl ScopeFilter {
    fn matches(&self, doc: &crate::gram_index::DocumentInfo) -> bool {
        if let Some(n) = &self.narrative_id {
            if &doc.narrative_id != n {
                return false;
            }
        }
        if let Some(f) = &self.folder_path {
            if !doc.folder_path.starts_with(f.as_str()) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn engine() -> Engine {
        Engine::new(EngineConfig::default())
    }

    #[test]
    fn scenario_shorter_field_ranks_first_for_equal_term_frequency() {
        let mut e = engine();
        e.index_document("doc1", &fields(&[("body", "banana band")]), "", "");
        e.index_document("doc2", &fields(&[("body", "apple banana")]), "", "");
        let out = e.search("banana", &SearchConfig::default(), 10, || false);
        assert_eq!(out.results.len(), 2);
        assert_eq!(out.results[0].doc_id, "doc1");
    }

    #[test]
    fn scenario_phrase_hard_rejects_non_matching_doc() {
        let mut e = engine();
        e.index_document("doc1", &fields(&[("body", "the quick brown fox")]), "", "");
        e.index_document("doc2", &fields(&[("body", "the quick red fox")]), "", "");
        let mut cfg = SearchConfig::default();
        cfg.phrase_hard = true;
        let out = e.search("\"quick brown\"", &cfg, 10, || false);
        assert_eq!(out.results.len(), 1);
        assert_eq!(out.results[0].doc_id, "doc1");
    }

    #[test]
    fn scenario_coverage_lambda_penalizes_partial_match() {
        let mut e = engine();
        e.index_document("doc1", &fields(&[("body", "alpha bravo charlie")]), "", "");
        e.index_document("doc2", &fields(&[("body", "alpha delta echo")]), "", "");
        let mut cfg = SearchConfig::default();
        cfg.coverage_lambda = 3.0;
        let out = e.search("alpha bravo", &cfg, 10, || false);
        let d1 = out.results.iter().find(|r| r.doc_id == "doc1").unwrap();
        let d2 = out.results.iter().find(|r| r.doc_id == "doc2").unwrap();
        assert!(d1.score > 3.0 * d2.score);
    }

    #[test]
    fn coverage_lambda_zero_ignores_coverage() {
        let mut e = engine();
        e.index_document("doc1", &fields(&[("body", "alpha bravo")]), "", "");
        e.index_document("doc2", &fields(&[("body", "alpha only here")]), "", "");
        let mut cfg = SearchConfig::default();
        cfg.coverage_lambda = 0.0;
        let out = e.search("alpha bravo", &cfg, 10, || false);
        assert_eq!(out.results.len(), 2);
    }

    #[test]
    fn insertion_order_does_not_affect_result_set_or_scores() {
        let mut e1 = engine();
        e1.index_document("a", &fields(&[("body", "banana band")]), "", "");
        e1.index_document("b", &fields(&[("body", "apple banana")]), "", "");

        let mut e2 = engine();
        e2.index_document("b", &fields(&[("body", "apple banana")]), "", "");
        e2.index_document("a", &fields(&[("body", "banana band")]), "", "");

        let out1 = e1.search("banana", &SearchConfig::default(), 10, || false);
        let out2 = e2.search("banana", &SearchConfig::default(), 10, || false);

        let mut ids1: Vec<_> = out1.results.iter().map(|r| (&r.doc_id, r.score)).collect();
        let mut ids2: Vec<_> = out2.results.iter().map(|r| (&r.doc_id, r.score)).collect();
        ids1.sort_by(|a, b| a.0.cmp(b.0));
        ids2.sort_by(|a, b| a.0.cmp(b.0));
        assert_eq!(ids1, ids2);
    }

    #[test]
    fn removed_document_is_excluded_after_lazy_delete_and_compact() {
        let mut e = engine();
        e.index_document("doc1", &fields(&[("body", "banana one")]), "", "");
        e.index_document("doc2", &fields(&[("body", "banana two")]), "", "");
        e.index_document("doc3", &fields(&[("body", "banana three")]), "", "");
        e.remove_document("doc1");
        let out = e.search("banana", &SearchConfig::default(), 10, || false);
        assert!(out.results.iter().all(|r| r.doc_id != "doc1"));
        e.compact();
        let out2 = e.search("banana", &SearchConfig::default(), 10, || false);
        assert!(out2.results.iter().all(|r| r.doc_id != "doc1"));
    }
}
