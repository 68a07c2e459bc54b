//! Error types for the sync engine.
//!
//! Every error here is `Clone`: underlying library errors are kept behind an
//! [`Arc`] so that a single token acquisition result can be handed to every
//! caller that waited on it.

use std::sync::Arc;

use thiserror::Error;

/// Failure of a single call through the rate-limited client.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, timeout, broken body) after all
    /// attempts were used up. Carries the last underlying error.
    #[error("network error: {0}")]
    Network(#[source] Arc<reqwest::Error>),

    /// The server kept answering 429 past the retry ceiling.
    #[error("rate limited by remote api")]
    RateLimited,

    #[error("unauthorized")]
    Unauthorized,

    /// Any other non-2xx status, surfaced verbatim.
    #[error("server responded with status {0}")]
    ServerError(u16),

    /// The caller cancelled while the request was still waiting for a slot.
    #[error("request cancelled")]
    Cancelled,

    #[error("cannot decode response: {0}")]
    Decode(#[source] Arc<serde_json::Error>),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(Arc::new(err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(Arc::new(err))
    }
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[source] Arc<std::io::Error>),

    #[error("store data is malformed: {0}")]
    Serde(#[source] Arc<serde_json::Error>),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(Arc::new(err))
    }
}

#[derive(Debug, Clone, Error)]
pub enum TokenError {
    /// Client id or secret is empty. A configuration problem, never retried
    /// by the engine itself.
    #[error("missing spotify client id or client secret")]
    MissingCredentials,

    #[error("token acquisition failed: {0}")]
    AcquisitionFailed(#[source] ClientError),

    #[error("cannot read credentials: {0}")]
    Store(#[source] StoreError),
}

#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    #[error("cannot start notification command: {0}")]
    Spawn(#[source] Arc<std::io::Error>),

    #[error("notification command exited with {0}")]
    Failed(String),
}

/// Reasons a whole poll pass is aborted before any entity is evaluated.
#[derive(Debug, Clone, Error)]
pub enum PollError {
    #[error("cannot load tracked artists: {0}")]
    Store(#[source] StoreError),

    #[error("no access token for this pass: {0}")]
    Token(#[source] TokenError),
}
