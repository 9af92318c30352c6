//! Publisher port - boundary to the pub/sub transport.

use async_trait::async_trait;

use crate::domain::error::PublishError;

/// Sink for wire messages addressed to a channel.
///
/// Implementations own connection management, retries and delivery; the
/// caller hands over a fully built wire string.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publisher name for logs.
    fn name(&self) -> &'static str;

    /// Publish `message` on `channel`, returning how many subscribers received it.
    async fn publish(&self, channel: &str, message: String) -> Result<usize, PublishError>;
}
