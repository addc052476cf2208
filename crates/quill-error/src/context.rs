use std::backtrace::Backtrace;

use super::Error;

#[derive(Debug)]
pub struct ErrorContext {
    pub operation: &'static str,
    pub detail: Option<String>,
    pub backtrace: Option<Backtrace>,
}

impl ErrorContext {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            detail: None,
            backtrace: Some(Backtrace::capture()),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContextualError {
    #[error("{source} (during {context:?})")]
    WithContext {
        #[source]
        source: Box<Error>,
        context: ErrorContext,
    },
}

/// Attaches operation context to any error convertible into [`Error`].
///
/// Mirrors the blanket `From` impl pattern used elsewhere in this family:
/// call sites wrap fallible calls with `.context("compact")` rather than
/// constructing `ContextualError` by hand.
pub trait ContextExt<T> {
    fn context(self, operation: &'static str) -> Result<T, Error>;
}

impl<T, E: Into<Error>> ContextExt<T> for Result<T, E> {
    fn context(self, operation: &'static str) -> Result<T, Error> {
        self.map_err(|e| {
            Error::Context(ContextualError::WithContext {
                source: Box::new(e.into()),
                context: ErrorContext::new(operation),
            })
        })
    }
}
