//! BM25 + coverage + proximity scoring (C10).

use crate::config::SearchConfig;
use crate::gram_index::{DocumentInfo, GramIndex};
use crate::query_parser::{Clause, ClauseKind};
use crate::verifier::PatternMatch;

/// `idf(clause)` is the max IDF across the clause's grams, or 1.0 if the
/// clause is empty of indexed grams (e.g. the short-pattern fallback case).
pub fn clause_idf(index: &GramIndex, pattern: &str) -> f64 {
    let grams = crate::normalize::extract_grams(pattern, index.q);
    grams
        .iter()
        .map(|g| index.idf(g))
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .unwrap_or(1.0)
}

fn ntf(tf: f64, field_len: f64, avg_field_len: f64, b: f64) -> f64 {
    if avg_field_len <= 0.0 {
        return tf;
    }
    tf / (1.0 - b + b * field_len / avg_field_len)
}

fn sat(tf_star: f64, k1: f64) -> f64 {
    (k1 + 1.0) * tf_star / (k1 + tf_star)
}

/// Returns `None` if the document must be rejected outright (phrase_hard
/// policy), otherwise `Some(score)`.
pub fn score_document(
    index: &GramIndex,
    doc: &DocumentInfo,
    clauses: &[Clause],
    matches: &[Option<PatternMatch>],
    idfs: &[f64],
    avg_field_len: &std::collections::HashMap<String, f64>,
    cfg: &SearchConfig,
) -> Option<f64> {
    if cfg.phrase_hard {
        for (clause, m) in clauses.iter().zip(matches) {
            if clause.kind == ClauseKind::Phrase && m.is_none() {
                return None;
            }
        }
    }

    let total_clauses = clauses.len().max(1) as f64;
    let matched_count = matches.iter().filter(|m| m.is_some()).count();

    let mut base_sum = 0.0;
    for ((_clause, m), idf) in clauses.iter().zip(matches).zip(idfs) {
        let Some(pm) = m else { continue };
        let mut tf_star = 0.0;
        for (field, fm) in &pm.field_matches {
            let w = cfg.field_weight(field);
            let avg_len = avg_field_len.get(field).copied().unwrap_or(100.0);
            tf_star += w * ntf(fm.count as f64, fm.field_length as f64, avg_len, cfg.b);
        }
        base_sum += idf * sat(tf_star, cfg.k1);
    }

    let coverage = matched_count as f64 / total_clauses;
    let m_cov = (cfg.coverage_epsilon + coverage).powf(cfg.coverage_lambda);

    let m_prox = if matched_count >= 2 {
        let mut common: Option<u32> = None;
        for m in matches.iter().flatten() {
            common = Some(common.map_or(m.segment_mask, |c| c & m.segment_mask));
        }
        let common = common.unwrap_or(0);
        let overlap = common.count_ones() as f64;
        let denom = (matched_count as u32).min(32).max(1) as f64;
        let avg_doc_len = index.avg_doc_len();
        let len_ratio = if avg_doc_len > 0.0 {
            doc.total_len as f64 / avg_doc_len
        } else {
            1.0
        };
        1.0 + cfg.proximity_alpha * (overlap / denom) * (-cfg.proximity_decay * len_ratio).exp()
    } else {
        1.0
    };

    Some(base_sum * m_cov * m_prox)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ntf_scales_down_for_longer_fields() {
        let short = ntf(3.0, 10.0, 20.0, 0.75);
        let long = ntf(3.0, 40.0, 20.0, 0.75);
        assert!(short > long);
    }

    #[test]
    fn sat_saturates_towards_k1_plus_one() {
        let low = sat(1.0, 1.2);
        let high = sat(1000.0, 1.2);
        assert!(high > low);
        assert!(high < 2.3);
    }
}
