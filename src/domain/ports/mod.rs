//! Port trait definitions (Hexagonal Architecture)
//!
//! - MessagePublisher: hands envelopes to the pub/sub transport

pub mod publisher;

pub use publisher::MessagePublisher;
