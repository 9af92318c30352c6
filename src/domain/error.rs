use thiserror::Error;

use super::models::cache_policy::MAX_TTL_SECONDS;

/// A constraint violated by an entity cache configuration.
///
/// Reported through validation, never raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("TTL must be positive (got {0})")]
    NonPositiveTtl(i64),

    #[error("TTL should not exceed 24 hours ({MAX_TTL_SECONDS}s), got {0}")]
    TtlTooLong(i64),

    #[error("max_entries_per_user must be positive (got {0})")]
    NonPositiveMaxEntries(i64),
}

/// Errors building or encoding a message envelope
#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("Message type cannot be empty")]
    EmptyType,

    #[error("Failed to serialize message: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by a message publisher
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Errors from the notification dispatcher
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Invalid channel name: {0}")]
    InvalidChannel(String),

    #[error("Envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
