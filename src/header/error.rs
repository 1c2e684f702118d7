use thiserror::Error;

/// Errors that may occur while parsing a [`JwsHeaders`](super::JwsHeaders)
/// set from its wire representation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HeaderError {
    /// The header is valid JSON but not a JSON object
    #[error("the header is not a JSON object")]
    NotAnObject,
    /// A JSON deserialization error, see [`serde_json::Error`] for details.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
