//! Channel addressing CLI commands.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;

use crate::adapters::memory::InMemoryPublisher;
use crate::cli::display::{action_failure, action_success, output, CommandOutput, DetailView};
use crate::cli::types::{ChannelCommands, ChannelKind};
use crate::domain::models::channel::{
    self, channel_type, extract_id, BROADCAST_ADMINS, BROADCAST_ALL, SYSTEM_EVENTS,
    SYSTEM_HEALTH, SYSTEM_MAINTENANCE,
};
use crate::domain::models::MessagingConfig;
use crate::services::{MessageCodec, NotificationDispatcher};

#[derive(Debug, Serialize)]
pub struct ChannelBuildOutput {
    pub channel: String,
}

impl CommandOutput for ChannelBuildOutput {
    fn to_human(&self) -> String {
        self.channel.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct ChannelInspectOutput {
    pub channel: String,
    pub valid: bool,
    pub prefix: Option<String>,
    /// Everything after `<prefix>:`.
    pub path: Option<String>,
    pub pattern: Option<String>,
}

impl CommandOutput for ChannelInspectOutput {
    fn to_human(&self) -> String {
        if !self.valid {
            return action_failure(&format!("'{}' is not a known channel", self.channel));
        }
        DetailView::new(&self.channel)
            .field_opt("Prefix", self.prefix.as_deref())
            .field_opt("Path", self.path.as_deref())
            .field_opt("Pattern", self.pattern.as_deref())
            .render()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct ChannelPublishOutput {
    pub channel: String,
    pub message_id: String,
    pub receivers: usize,
    pub delivered: Option<String>,
}

impl CommandOutput for ChannelPublishOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![action_success(&format!(
            "Published {} on {} ({} receiver{})",
            self.message_id,
            self.channel,
            self.receivers,
            if self.receivers == 1 { "" } else { "s" }
        ))];
        if let Some(delivered) = &self.delivered {
            lines.push(delivered.clone());
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(
    command: ChannelCommands,
    messaging: &MessagingConfig,
    json_mode: bool,
) -> Result<()> {
    match command {
        ChannelCommands::Build { kind, ids } => {
            let channel = build(kind, &ids)?;
            output(&ChannelBuildOutput { channel }, json_mode);
            Ok(())
        }
        ChannelCommands::Inspect { channel } => {
            let result = inspect(&channel);
            output(&result, json_mode);
            if !result.valid {
                anyhow::bail!("Unknown channel: {channel}");
            }
            Ok(())
        }
        ChannelCommands::Publish {
            channel,
            message_type,
            payload,
        } => {
            let codec = MessageCodec::new(messaging.clone());
            let result = publish(codec, &channel, &message_type, &payload).await?;
            output(&result, json_mode);
            Ok(())
        }
    }
}

/// Build a channel name of `kind` from positional identifiers.
pub fn build(kind: ChannelKind, ids: &[String]) -> Result<String> {
    let channel = match kind {
        ChannelKind::User => channel::user_notifications(single_id(kind, ids)?),
        ChannelKind::Org => channel::org_notifications(single_id(kind, ids)?),
        ChannelKind::Property => channel::property_updates(single_id(kind, ids)?),
        ChannelKind::Maintenance => channel::maintenance_updates(single_id(kind, ids)?),
        ChannelKind::MaintenanceStatus => channel::maintenance_status(single_id(kind, ids)?),
        ChannelKind::ChatRoom => channel::chat_room(single_id(kind, ids)?),
        ChannelKind::ChatDirect => match ids {
            [a, b] => channel::chat_direct(a, b),
            _ => anyhow::bail!("chat-direct takes exactly two participant ids"),
        },
        ChannelKind::Email => channel::email_status(single_id(kind, ids)?),
        ChannelKind::Payment => channel::payment_status(single_id(kind, ids)?),
        ChannelKind::Subscription => channel::subscription_updates(single_id(kind, ids)?),
        ChannelKind::SystemEvents => static_channel(kind, ids, SYSTEM_EVENTS)?,
        ChannelKind::SystemHealth => static_channel(kind, ids, SYSTEM_HEALTH)?,
        ChannelKind::SystemMaintenance => static_channel(kind, ids, SYSTEM_MAINTENANCE)?,
        ChannelKind::BroadcastAll => static_channel(kind, ids, BROADCAST_ALL)?,
        ChannelKind::BroadcastAdmins => static_channel(kind, ids, BROADCAST_ADMINS)?,
    };
    Ok(channel)
}

fn single_id(kind: ChannelKind, ids: &[String]) -> Result<&str> {
    match ids {
        [id] if !id.is_empty() => Ok(id.as_str()),
        _ => anyhow::bail!("{kind:?} channels take exactly one non-empty id"),
    }
}

fn static_channel(kind: ChannelKind, ids: &[String], name: &str) -> Result<String> {
    if !ids.is_empty() {
        anyhow::bail!("{kind:?} is a fixed channel and takes no ids");
    }
    Ok(name.to_string())
}

fn inspect(channel: &str) -> ChannelInspectOutput {
    let prefix = channel_type(channel);
    ChannelInspectOutput {
        channel: channel.to_string(),
        valid: prefix.is_some(),
        prefix: prefix.map(|p| p.as_str().to_string()),
        path: prefix.and_then(|p| extract_id(channel, p.as_str()).map(str::to_string)),
        pattern: prefix.map(|p| p.pattern()),
    }
}

/// Round-trip a notification through an in-process bus with one
/// subscriber on `channel`.
async fn publish(
    codec: MessageCodec,
    channel: &str,
    message_type: &str,
    payload: &str,
) -> Result<ChannelPublishOutput> {
    let payload = codec.parse(payload);
    let bus = Arc::new(InMemoryPublisher::new());
    let mut subscription = bus.subscribe(channel).await;
    let dispatcher = NotificationDispatcher::new(Arc::clone(&bus), codec);

    let receipt = dispatcher
        .publish(channel, message_type, payload, None)
        .await
        .with_context(|| format!("Failed to publish on {channel}"))?;

    Ok(ChannelPublishOutput {
        channel: receipt.channel,
        message_id: receipt.message_id,
        receivers: receipt.receivers,
        delivered: subscription.try_recv().map(|message| message.message),
    })
}
