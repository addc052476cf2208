#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    #[error("not found: {what} {id}")]
    NotFound { what: &'static str, id: String },

    #[error("query rejected by lane validator: {reason}")]
    ValidationRejected { reason: String },

    #[error("resource cap exceeded: {cap} (limit {limit})")]
    CapExceeded { cap: &'static str, limit: u64 },

    #[error("engine error: {message}")]
    Engine { message: String },

    #[error("store error: {message}")]
    Store { message: String },
}
