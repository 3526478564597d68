use thiserror::Error;

/// Errors surfaced to the user by the subscription manager.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid profile url: {0:?}")]
    InvalidFormat(String),
    #[error("profile not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to retrieve the content, status code: {0}")]
    Status(u16),
}

/// A single failed attempt to hand a message to the chat transport.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SendError(pub String);

#[derive(Debug, Error)]
#[error("failed to deliver message after {attempts} attempts: {source}")]
pub struct DeliveryFailed {
    pub attempts: u32,
    pub source: SendError,
}
