//! In-process adapters for local runs and tests.

pub mod in_memory_publisher;

pub use in_memory_publisher::{ChannelSubscription, InMemoryPublisher, PublishedMessage};
