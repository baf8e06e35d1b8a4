//! Generation backend errors

/// Failures of the external text-generation service.
///
/// None of these reach the caller of the cascade; the producer turns them
/// into "no candidate".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Backend failed to load or is not configured. Permanent for the process.
    #[error("generator unavailable: {0}")]
    Unavailable(String),

    /// Transport or backend failure for one call
    #[error("generation request failed: {0}")]
    Request(String),

    /// Backend answered but the output was unusable
    #[error("malformed generator output: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        GenerationError::Request(e.to_string())
    }
}
