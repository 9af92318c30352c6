//! Notification dispatch.
//!
//! Composes channel addressing and the message codec: picks the channel,
//! wraps the payload in an envelope and hands the wire string to a
//! [`MessagePublisher`].

use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::domain::error::{DispatchError, DispatchResult};
use crate::domain::models::channel::{
    self, is_valid_channel, BROADCAST_ADMINS, SYSTEM_EVENTS,
};
use crate::domain::ports::MessagePublisher;
use crate::services::message_codec::MessageCodec;

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReceipt {
    pub channel: String,
    pub message_id: String,
    pub receivers: usize,
}

/// Publishes enveloped notifications on TenantFlow channels.
pub struct NotificationDispatcher<P: MessagePublisher> {
    publisher: Arc<P>,
    codec: MessageCodec,
}

impl<P: MessagePublisher> NotificationDispatcher<P> {
    pub fn new(publisher: Arc<P>, codec: MessageCodec) -> Self {
        Self { publisher, codec }
    }

    pub const fn codec(&self) -> &MessageCodec {
        &self.codec
    }

    /// Publish `payload` on `channel` inside an envelope of `message_type`.
    ///
    /// Oversized messages are logged and still published; the size limit
    /// is advisory.
    #[instrument(
        level = "debug",
        skip(self, payload, metadata),
        fields(publisher = self.publisher.name())
    )]
    pub async fn publish(
        &self,
        channel: &str,
        message_type: &str,
        payload: Value,
        metadata: Option<Map<String, Value>>,
    ) -> DispatchResult<DispatchReceipt> {
        if !is_valid_channel(channel) {
            warn!(channel, "Refusing to publish on unknown channel");
            return Err(DispatchError::InvalidChannel(channel.to_string()));
        }

        let envelope = self.codec.build_envelope(message_type, payload, metadata)?;
        let wire = self.codec.serialize_message(&envelope)?;

        if !self.codec.validate_size(&wire, None) {
            warn!(channel, message_id = %envelope.id, "Publishing oversized message");
        }

        let receivers = self.publisher.publish(channel, wire).await?;
        debug!(channel, message_id = %envelope.id, receivers, "Notification published");

        Ok(DispatchReceipt {
            channel: channel.to_string(),
            message_id: envelope.id,
            receivers,
        })
    }

    pub async fn notify_user(
        &self,
        user_id: &str,
        message_type: &str,
        payload: Value,
    ) -> DispatchResult<DispatchReceipt> {
        self.publish(&channel::user_notifications(user_id), message_type, payload, None)
            .await
    }

    pub async fn notify_org(
        &self,
        org_id: &str,
        message_type: &str,
        payload: Value,
    ) -> DispatchResult<DispatchReceipt> {
        self.publish(&channel::org_notifications(org_id), message_type, payload, None)
            .await
    }

    /// Direct message; both participants share one channel regardless of order.
    pub async fn send_direct(
        &self,
        from: &str,
        to: &str,
        message_type: &str,
        payload: Value,
    ) -> DispatchResult<DispatchReceipt> {
        let mut metadata = Map::new();
        metadata.insert("sender".to_string(), Value::String(from.to_string()));
        self.publish(&channel::chat_direct(from, to), message_type, payload, Some(metadata))
            .await
    }

    pub async fn broadcast_admins(
        &self,
        message_type: &str,
        payload: Value,
    ) -> DispatchResult<DispatchReceipt> {
        self.publish(BROADCAST_ADMINS, message_type, payload, None).await
    }

    pub async fn system_event(
        &self,
        message_type: &str,
        payload: Value,
    ) -> DispatchResult<DispatchReceipt> {
        self.publish(SYSTEM_EVENTS, message_type, payload, None).await
    }
}
