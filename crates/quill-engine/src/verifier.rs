//! Multi-pattern verification (C9): a single Aho-Corasick automaton built
//! from the query's clause patterns, run once per field of a candidate
//! document, yielding per-clause occurrence counts, positions, and a
//! segment-locality mask.
//!
//! The automaton is per-query and short-lived: it borrows nothing past the
//! `verify` call and must be rebuilt for each query, per the ownership
//! design note.

use std::collections::HashMap;

use aho_corasick::{AhoCorasick, MatchKind};

use crate::gram_index::DocumentInfo;
use crate::normalize::normalize;
use crate::query_parser::Clause;

#[derive(Debug, Clone, Default)]
pub struct FieldMatch {
    pub count: u32,
    pub field_length: usize,
    pub positions: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct PatternMatch {
    pub field_matches: HashMap<String, FieldMatch>,
    pub segment_mask: u32,
    pub total_occurrences: u32,
}

pub struct QueryVerifier {
    automaton: AhoCorasick,
    clause_count: usize,
}

impl QueryVerifier {
    pub fn build(clauses: &[Clause]) -> Option<Self> {
        if clauses.is_empty() {
            return None;
        }
        let patterns: Vec<&str> = clauses.iter().map(|c| c.pattern.as_str()).collect();
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .ok()?;
        Some(Self {
            automaton,
            clause_count: clauses.len(),
        })
    }

    /// Runs every field of `doc` through the automaton and accumulates
    /// per-clause matches. Returns one optional `PatternMatch` per clause
    /// (`None` means that clause did not match anywhere in this document)
    /// plus the count of clauses that did match.
    pub fn verify(&self, doc: &DocumentInfo, max_segments: u32) -> (Vec<Option<PatternMatch>>, usize) {
        let mut matches: Vec<Option<PatternMatch>> = vec![None; self.clause_count];

        for (field_name, raw_text) in &doc.fields {
            let normalized = normalize(raw_text);
            let field_len = normalized.len();
            if field_len == 0 {
                continue;
            }
            for hit in self.automaton.find_overlapping_iter(&normalized) {
                let clause_idx = hit.pattern().as_usize();
                let start = hit.start();
                let seg_idx = std::cmp::min(max_segments.saturating_sub(1), ((start * max_segments as usize) / field_len) as u32);

                let slot = matches[clause_idx].get_or_insert_with(PatternMatch::default);
                slot.total_occurrences += 1;
                slot.segment_mask |= 1u32 << seg_idx;
                let fm = slot
                    .field_matches
                    .entry(field_name.clone())
                    .or_insert_with(|| FieldMatch {
                        count: 0,
                        field_length: field_len,
                        positions: Vec::new(),
                    });
                fm.count += 1;
                fm.positions.push(start);
            }
        }

        let matched_clause_count = matches.iter().filter(|m| m.is_some()).count();
        (matches, matched_clause_count)
    }
}
