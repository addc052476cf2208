//! Two-lane query runner (C13): syntactic lane validation, resource-capped
//! execution delegated to a host-supplied [`QueryExecutor`], and episode
//! logging into the temporal store.

mod caps;
mod lane;
mod result;
mod runner;
mod validator;

pub use caps::ResourceCaps;
pub use lane::Lane;
pub use result::{QueryExecutor, QueryResult, RawRows};
pub use runner::QueryRunner;
pub use validator::LaneValidator;
