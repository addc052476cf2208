//! Tokenises a user query string into an ordered sequence of term/phrase
//! clauses. Double quotes toggle phrase mode; an unclosed quote flushes the
//! remainder as a term clause, not a phrase.

use crate::normalize::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    Term,
    Phrase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub pattern: String,
    pub kind: ClauseKind,
    pub raw_input: String,
}

pub fn parse_query(input: &str) -> Vec<Clause> {
    let mut clauses = Vec::new();
    let mut chars = input.chars().peekable();
    let mut buf = String::new();
    let mut in_quotes = false;

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    push_clause(&mut clauses, &buf, ClauseKind::Phrase);
                    buf.clear();
                    in_quotes = false;
                } else {
                    if !buf.is_empty() {
                        push_clause(&mut clauses, &buf, ClauseKind::Term);
                        buf.clear();
                    }
                    in_quotes = true;
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if !buf.is_empty() {
                    push_clause(&mut clauses, &buf, ClauseKind::Term);
                    buf.clear();
                }
            }
            c => buf.push(c),
        }
    }

    if !buf.is_empty() {
        // An unclosed quote flushes its remainder as a term clause.
        push_clause(&mut clauses, &buf, ClauseKind::Term);
    }

    clauses
}

fn push_clause(clauses: &mut Vec<Clause>, raw: &str, kind: ClauseKind) {
    let pattern = normalize(raw);
    if pattern.is_empty() {
        return;
    }
    clauses.push(Clause {
        pattern,
        kind,
        raw_input: raw.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_terms_on_whitespace() {
        let clauses = parse_query("alpha bravo");
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].pattern, "alpha");
        assert_eq!(clauses[1].pattern, "bravo");
        assert!(clauses.iter().all(|c| c.kind == ClauseKind::Term));
    }

    #[test]
    fn quoted_text_becomes_a_phrase_clause() {
        let clauses = parse_query(r#""quick brown" fox"#);
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].kind, ClauseKind::Phrase);
        assert_eq!(clauses[0].pattern, "quick brown");
        assert_eq!(clauses[1].kind, ClauseKind::Term);
    }

    #[test]
    fn unclosed_quote_flushes_as_term() {
        let clauses = parse_query(r#""unterminated"#);
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].kind, ClauseKind::Term);
        assert_eq!(clauses[0].pattern, "unterminated");
    }

    #[test]
    fn consecutive_whitespace_collapses_and_empty_clauses_are_dropped() {
        let clauses = parse_query("  alpha    bravo  ");
        assert_eq!(clauses.len(), 2);
    }
}
