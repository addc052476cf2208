use super::{Error, ErrorPolicy, Severity};

/// Extension trait for `Result<T, Error>` enabling policy-driven emission
/// without breaking `?`-based propagation.
pub trait ResultExt<T> {
    fn emit_event(self, policy: &impl ErrorPolicy) -> Self;
    fn emit_warning(self, policy: &impl ErrorPolicy) -> Self;
    fn emit_error(self, policy: &impl ErrorPolicy) -> Self;
    fn emit_fatal(self, policy: &impl ErrorPolicy) -> Self;
}

impl<T> ResultExt<T> for Result<T, Error> {
    fn emit_event(self, policy: &impl ErrorPolicy) -> Self {
        if let Err(ref e) = self {
            policy.emit(e);
        }
        self
    }

    fn emit_warning(self, policy: &impl ErrorPolicy) -> Self {
        if let Err(ref e) = self {
            if policy.classify(e) == Severity::Warning {
                policy.emit(e);
            }
        }
        self
    }

    fn emit_error(self, policy: &impl ErrorPolicy) -> Self {
        if let Err(ref e) = self {
            if policy.classify(e) == Severity::Error {
                policy.emit(e);
            }
        }
        self
    }

    fn emit_fatal(self, policy: &impl ErrorPolicy) -> Self {
        if let Err(ref e) = self {
            if policy.classify(e) == Severity::Fatal {
                policy.emit(e);
            }
        }
        self
    }
}
