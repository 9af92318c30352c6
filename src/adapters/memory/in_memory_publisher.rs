//! In-process publisher backed by tokio broadcast channels.
//!
//! One broadcast sender per subscribed pattern, so `publish` can report
//! how many subscribers actually matched. Pattern semantics follow
//! [`matches_pattern`]: exact names or a trailing `*`.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, trace};

use crate::domain::error::PublishError;
use crate::domain::models::channel::matches_pattern;
use crate::domain::ports::MessagePublisher;

/// Default per-pattern buffer.
const DEFAULT_CAPACITY: usize = 256;

/// A message as delivered to a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub channel: String,
    pub message: String,
}

/// Receiving side of a pattern subscription.
pub struct ChannelSubscription {
    pattern: String,
    receiver: broadcast::Receiver<PublishedMessage>,
}

impl ChannelSubscription {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Next message, or `None` once the publisher is gone.
    ///
    /// Lagged messages are skipped.
    pub async fn recv(&mut self) -> Option<PublishedMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Some(message),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(pattern = %self.pattern, skipped, "Subscription lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking receive.
    pub fn try_recv(&mut self) -> Option<PublishedMessage> {
        self.receiver.try_recv().ok()
    }
}

/// Pub/sub bus living in the current process.
pub struct InMemoryPublisher {
    topics: RwLock<HashMap<String, broadcast::Sender<PublishedMessage>>>,
    capacity: usize,
}

impl Default for InMemoryPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to an exact channel or a trailing-`*` pattern.
    pub async fn subscribe(&self, pattern: &str) -> ChannelSubscription {
        let mut topics = self.topics.write().await;
        let sender = topics
            .entry(pattern.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);

        ChannelSubscription {
            pattern: pattern.to_string(),
            receiver: sender.subscribe(),
        }
    }

    /// Live subscriber count across all patterns.
    pub async fn subscriber_count(&self) -> usize {
        self.topics
            .read()
            .await
            .values()
            .map(broadcast::Sender::receiver_count)
            .sum()
    }
}

#[async_trait]
impl MessagePublisher for InMemoryPublisher {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    async fn publish(&self, channel: &str, message: String) -> Result<usize, PublishError> {
        let mut delivered = 0;
        let mut stale = Vec::new();

        {
            let topics = self.topics.read().await;
            for (pattern, sender) in topics.iter() {
                if !matches_pattern(pattern, channel) {
                    continue;
                }
                let published = PublishedMessage {
                    channel: channel.to_string(),
                    message: message.clone(),
                };
                match sender.send(published) {
                    Ok(receivers) => delivered += receivers,
                    Err(_) => stale.push(pattern.clone()),
                }
            }
        }

        if !stale.is_empty() {
            let mut topics = self.topics.write().await;
            for pattern in stale {
                if topics.get(&pattern).is_some_and(|s| s.receiver_count() == 0) {
                    topics.remove(&pattern);
                }
            }
        }

        trace!(channel, delivered, "Published message");
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exact_subscription_receives() {
        let bus = InMemoryPublisher::new();
        let mut sub = bus.subscribe("system:events").await;

        let delivered = bus.publish("system:events", "hello".to_string()).await.unwrap();

        assert_eq!(delivered, 1);
        let msg = sub.recv().await.unwrap();
        assert_eq!(msg.channel, "system:events");
        assert_eq!(msg.message, "hello");
    }

    #[tokio::test]
    async fn test_pattern_subscription_filters() {
        let bus = InMemoryPublisher::new();
        let mut users = bus.subscribe("notifications:user:*").await;

        assert_eq!(bus.publish("notifications:org:1", "org".into()).await.unwrap(), 0);
        assert_eq!(bus.publish("notifications:user:1", "user".into()).await.unwrap(), 1);

        assert_eq!(users.recv().await.unwrap().message, "user");
        assert!(users.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_no_subscribers_is_not_an_error() {
        let bus = InMemoryPublisher::new();
        assert_eq!(bus.publish("broadcast:all", "x".into()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_dropped_subscriptions_are_pruned() {
        let bus = InMemoryPublisher::new();
        let sub = bus.subscribe("chat:room:1").await;
        assert_eq!(bus.subscriber_count().await, 1);
        drop(sub);

        assert_eq!(bus.publish("chat:room:1", "x".into()).await.unwrap(), 0);
        assert!(bus.topics.read().await.is_empty());
    }
}
