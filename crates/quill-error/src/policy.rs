use super::{Error, Severity};

/// A policy for classifying and emitting errors.
///
/// Library code (quill-engine, quill-store, quill-query) never logs or
/// otherwise performs side effects on error paths directly; it returns
/// `Result<T, Error>` and lets the host pick a policy at the boundary.
pub trait ErrorPolicy: Send + Sync {
    /// Classify the error's severity.
    fn classify(&self, error: &Error) -> Severity;

    /// Emit the error according to the policy (log, send to UI, no-op, ...).
    fn emit(&self, error: &Error);
}

/// A no-operation policy that does nothing. Default choice for library tests.
#[derive(Debug, Clone, Default)]
pub struct NoopPolicy;

impl ErrorPolicy for NoopPolicy {
    fn classify(&self, error: &Error) -> Severity {
        error.severity()
    }

    fn emit(&self, _error: &Error) {}
}

/// Emits via `tracing`, at a level matching the error's severity.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Default)]
pub struct TracingPolicy;

#[cfg(feature = "tracing")]
impl ErrorPolicy for TracingPolicy {
    fn classify(&self, error: &Error) -> Severity {
        error.severity()
    }

    fn emit(&self, error: &Error) {
        use tracing::{event, Level};

        match error.severity() {
            Severity::Warning => event!(Level::WARN, error = %error),
            Severity::Error => event!(Level::ERROR, error = %error),
            Severity::Fatal => event!(Level::ERROR, fatal = true, error = %error),
        }
    }
}
