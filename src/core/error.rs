//! Error types for scrobble queue components.

use thiserror::Error;

/// Errors produced while configuring or driving the scrobble queue.
///
/// Response classification never produces one of these: a bad reply degrades
/// to [`Outcome::MalformedError`](crate::core::Outcome::MalformedError) so the
/// backlog keeps flowing.
#[derive(Debug, Error)]
pub enum ScrobbleError {
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// The configured server URL cannot be used to build request URLs.
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
    /// The HTTP client could not be constructed.
    #[error("http client error: {0}")]
    Client(String),
    /// The background service is no longer running.
    #[error("scrobble service stopped")]
    ServiceStopped,
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
