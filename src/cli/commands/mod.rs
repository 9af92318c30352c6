//! CLI command implementations.

pub mod cache;
pub mod channel;
pub mod envelope;
