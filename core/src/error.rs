//! Error types for the character API client.
//!
//! # Design
//! Two failure kinds come out of a fetch: the network call itself did not
//! complete (`Transport`) or the server answered with a non-success status
//! (`Remote`). `Decode` covers a 200 body that is not JSON at all. The page
//! controller treats every variant the same way; the distinction exists for
//! logging and for callers of the client that want it.

/// A network failure reported by the host that executed the request
/// (DNS, refused connection, broken pipe). Carried unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors returned by `CharacterClient` parse methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The HTTP round-trip could not complete.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned a status outside `200..=299`.
    #[error("API error: {status}")]
    Remote { status: u16, body: String },

    /// The response body is not valid JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status of a `Remote` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
