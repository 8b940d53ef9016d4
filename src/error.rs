use thiserror::Error;

/// Engine-level error taxonomy. Storage failures propagate as-is; the
/// engine never retries and never masks them.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Operation referenced a language code absent from the directory.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// The external translation capability failed or returned unusable
    /// output. Terminal for the whole backfill call; nothing is persisted.
    #[error("translation capability: {0}")]
    Capability(anyhow::Error),

    /// A storage collaborator failed.
    #[error("storage: {0}")]
    Storage(anyhow::Error),
}

impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(err)
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
