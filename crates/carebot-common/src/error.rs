/// Error types shared across the CareBot crates.
///
/// These errors represent failures in infrastructure components that the assistant
/// cannot answer without. Application-specific errors are defined in the `carebot`
/// crate and wrap `CommonError` via `#[from]`.
///
/// Redis failures never surface here: the cache degrades to a no-op instead.
/// Translation failures stay inside the localization adapter, see
/// [`crate::translate::TranslationFailure`].

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("embedding error: {0}")]
    Embedding(String),
}
