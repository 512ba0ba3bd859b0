//! Error types for creature lookups.

use thiserror::Error;

/// Errors surfaced by [`PokeClient`](crate::PokeClient) lookups.
///
/// A failed resource stores the lookup error verbatim, so every consumer
/// that peeks the same resource observes the same value.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API has no creature under the requested name.
    #[error("no creature named `{name}`")]
    NotFound {
        /// Normalized name that missed.
        name: String,
    },

    /// The API answered with a non-success status other than 404.
    #[error("lookup failed with status {status}")]
    Status {
        /// HTTP status returned by the API.
        status: reqwest::StatusCode,
    },

    /// The request failed before producing a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
