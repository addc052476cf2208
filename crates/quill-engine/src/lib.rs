//! The retrieval engine core: normalization and gram extraction, posting
//! lists, the gram index, query parsing, candidate generation, WAND
//! pruning, multi-pattern verification, and BM25 + coverage + proximity
//! scoring — composed into a single [`Engine`] facade.
//!
//! This crate is synchronous and single-threaded by design; the actor
//! wrapper that gives it a concurrent, cancellable surface lives one layer
//! up, in the top-level facade crate.

mod candidates;
mod config;
mod docid;
mod engine;
mod gram_index;
mod normalize;
mod payload;
mod posting;
mod query_parser;
mod scorer;
mod verifier;
mod wand;

pub use config::{EngineConfig, Scope as SearchScope, SearchConfig};
pub use engine::{Engine, SearchOutcome, SearchResult};
pub use gram_index::{DocumentInfo, GramIndex, GramStat};
pub use posting::PostingList;
pub use query_parser::{parse_query, Clause, ClauseKind};
