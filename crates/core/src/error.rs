/// Domain errors raised while assessing a leaf batch or building a
/// recommendation. Every variant is terminal for the request that raised it.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Empty batch, undecodable image bytes, or an out-of-domain number.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The advisory table is incomplete or malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The classifier failed to load or failed during inference.
    #[error("Classifier unavailable: {0}")]
    ClassifierUnavailable(String),
}
