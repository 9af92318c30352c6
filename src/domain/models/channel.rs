//! Notification channel addressing.
//!
//! Channel names are hierarchical strings of the form `<prefix>:<subpath...>`.
//! Every function here is total: malformed or hostile input yields `false`
//! or `None`, never a panic, because channel names often come straight
//! from request data.

use serde::{Deserialize, Serialize};

/// Known top-level channel prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelPrefix {
    Notifications,
    Property,
    Maintenance,
    System,
    Email,
    Payment,
    Subscription,
    Chat,
    Broadcast,
}

impl ChannelPrefix {
    /// Every prefix, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Notifications,
        Self::Property,
        Self::Maintenance,
        Self::System,
        Self::Email,
        Self::Payment,
        Self::Subscription,
        Self::Chat,
        Self::Broadcast,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Notifications => "notifications",
            Self::Property => "property",
            Self::Maintenance => "maintenance",
            Self::System => "system",
            Self::Email => "email",
            Self::Payment => "payment",
            Self::Subscription => "subscription",
            Self::Chat => "chat",
            Self::Broadcast => "broadcast",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|prefix| prefix.as_str() == s)
    }

    /// Wildcard pattern covering every channel under this prefix, e.g. `system:*`.
    pub fn pattern(&self) -> String {
        format!("{}:*", self.as_str())
    }
}

impl std::fmt::Display for ChannelPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const SYSTEM_EVENTS: &str = "system:events";
pub const SYSTEM_HEALTH: &str = "system:health";
pub const SYSTEM_MAINTENANCE: &str = "system:maintenance";
pub const BROADCAST_ALL: &str = "broadcast:all";
pub const BROADCAST_ADMINS: &str = "broadcast:admins";

/// `notifications:user:<id>`
pub fn user_notifications(user_id: &str) -> String {
    format!("notifications:user:{user_id}")
}

/// `notifications:org:<id>`
pub fn org_notifications(org_id: &str) -> String {
    format!("notifications:org:{org_id}")
}

/// Pattern matching every per-user notification channel.
pub fn user_notifications_pattern() -> String {
    "notifications:user:*".to_string()
}

pub fn property_updates(property_id: &str) -> String {
    format!("property:updates:{property_id}")
}

pub fn maintenance_updates(request_id: &str) -> String {
    format!("maintenance:updates:{request_id}")
}

pub fn maintenance_status(request_id: &str) -> String {
    format!("maintenance:status:{request_id}")
}

pub fn chat_room(room_id: &str) -> String {
    format!("chat:room:{room_id}")
}

/// Direct chat channel between two participants.
///
/// The pair is sorted before joining so both sides derive the same name
/// without coordinating.
pub fn chat_direct(participant_a: &str, participant_b: &str) -> String {
    let (first, second) = if participant_a <= participant_b {
        (participant_a, participant_b)
    } else {
        (participant_b, participant_a)
    };
    format!("chat:direct:{first}:{second}")
}

pub fn email_status(email_id: &str) -> String {
    format!("email:status:{email_id}")
}

pub fn payment_status(payment_id: &str) -> String {
    format!("payment:status:{payment_id}")
}

pub fn subscription_updates(subscription_id: &str) -> String {
    format!("subscription:updates:{subscription_id}")
}

/// Return the part of `channel` after `<prefix>:`.
///
/// `prefix` may be a single segment (`chat`) or a longer path
/// (`notifications:user`). Returns `None` when the channel does not start
/// with `<prefix>:` or when nothing follows it.
pub fn extract_id<'a>(channel: &'a str, prefix: &str) -> Option<&'a str> {
    channel
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix(':'))
        .filter(|id| !id.is_empty())
}

/// True iff `channel` starts with a known prefix followed by `:`.
pub fn is_valid_channel(channel: &str) -> bool {
    channel_type(channel).is_some()
}

/// Known prefix of `channel`, if any.
pub fn channel_type(channel: &str) -> Option<ChannelPrefix> {
    let (head, _) = channel.split_once(':')?;
    ChannelPrefix::from_str(head)
}

/// Subscription matching for exact names and trailing-`*` patterns.
pub fn matches_pattern(pattern: &str, channel: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(stem) => channel.starts_with(stem),
        None => pattern == channel,
    }
}
