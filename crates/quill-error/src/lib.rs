#![doc = r#"
quill-error — workspace-wide error types, severity, and policy-driven emission.

Overview
- A single `Error` enum shared across the `quill-*` crates.
- `Severity` classification for coarse, programmatic handling.
- `DomainError` for structured, non-fatal domain failures (not found, cap exceeded, ...).
- `Result` alias for ergonomic propagation.
- `ContextExt` and `ResultExt` to reduce boilerplate at call sites.
- Policy-driven emission via `ErrorPolicy` so library code stays side-effect free.

Quickstart
- Library code (quill-engine, quill-store, quill-query) should:
  - return `quill_error::Result<T>`
  - construct structured errors (`Fatal`/`Domain`/`Cancelled`/`Context`)
  - use `ContextExt`/`ResultExt` where it clarifies a call site
- Application code should:
  - choose an `ErrorPolicy` (`NoopPolicy` or `TracingPolicy`)
  - emit at the boundary rather than inline deep in the call stack

```rust,ignore
use quill_error::{DomainError, Result};

fn find_note(id: &str) -> Result<String> {
    Err(DomainError::NotFound { what: "note", id: id.to_string() }.into())
}
```

Feature flags
- `tracing`: enables `TracingPolicy`.
- `serde`: enables `Serialize`/`Deserialize` on `Severity`.
"#]

pub mod context;
pub mod domain;
pub mod fatal;
pub mod policy;
pub mod result_ext;
pub mod severity;

pub use context::{ContextExt, ContextualError, ErrorContext};
pub use domain::DomainError;
pub use fatal::FatalError;
#[cfg(feature = "tracing")]
pub use policy::TracingPolicy;
pub use policy::{ErrorPolicy, NoopPolicy};
pub use result_ext::ResultExt;
pub use severity::Severity;

/// Workspace-wide result alias. Use throughout library code and propagate with `?`.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type shared across the quill workspace.
///
/// Variants group failures into the coarse classes named by the retrieval
/// engine's error taxonomy: `Fatal` covers `Invariant`/`SerializationFailure`,
/// `Domain` covers `NotFound`/`ValidationRejected`/`CapExceeded` plus generic
/// engine/store failures, `Cancelled` is its own variant since it is neither
/// a domain failure nor fatal, and `Context` wraps any of the above with
/// call-site detail and a captured backtrace.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fatal(#[from] FatalError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("operation cancelled")]
    Cancelled,
    #[error(transparent)]
    Context(#[from] ContextualError),
}

impl Error {
    /// Returns true if this error is a `NotFound`/`CapExceeded`/`Cancelled`-class
    /// non-fatal condition a caller can treat as "nothing happened".
    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }

    /// Coarse severity classification for programmatic handling.
    pub fn severity(&self) -> Severity {
        match self {
            Error::Fatal(_) => Severity::Fatal,
            Error::Cancelled => Severity::Warning,
            Error::Domain(DomainError::NotFound { .. } | DomainError::CapExceeded { .. }) => {
                Severity::Warning
            }
            Error::Domain(_) => Severity::Error,
            Error::Context(ContextualError::WithContext { source, .. }) => source.severity(),
        }
    }

    pub fn not_found(what: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            what,
            id: id.into(),
        }
        .into()
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        FatalError::Invariant(message.into()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_warning_severity() {
        let err = Error::not_found("note", "abc");
        assert_eq!(err.severity(), Severity::Warning);
        assert!(err.is_warning());
    }

    #[test]
    fn invariant_is_fatal_severity() {
        let err = Error::invariant("version chain gap");
        assert_eq!(err.severity(), Severity::Fatal);
        assert!(!err.is_warning());
    }

    #[test]
    fn cancelled_is_warning_severity() {
        assert_eq!(Error::Cancelled.severity(), Severity::Warning);
    }

    #[test]
    fn noop_policy_has_no_observable_effect() {
        let policy = NoopPolicy;
        let err = Error::not_found("note", "x");
        // Only checking this doesn't panic; NoopPolicy has no state to assert on.
        policy.emit(&err);
    }

    #[test]
    fn context_preserves_inner_severity() {
        use context::ContextExt;
        let res: Result<(), DomainError> = Err(DomainError::CapExceeded {
            cap: "max_rows",
            limit: 100,
        });
        let wrapped = res.context("run_ro").unwrap_err();
        assert_eq!(wrapped.severity(), Severity::Warning);
    }
}
