#[derive(Debug, Clone, thiserror::Error)]
pub enum FatalError {
    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("snapshot blob is malformed: {0}")]
    SerializationFailure(String),
}
