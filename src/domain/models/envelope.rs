//! Message envelope published on notification channels.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Envelope format version written into `metadata.version`.
pub const ENVELOPE_VERSION: &str = "1.0";

/// Default advisory size limit for a wire message, in kilobytes.
pub const DEFAULT_MAX_MESSAGE_KB: usize = 512;

const RANDOM_SUFFIX_LEN: usize = 7;

/// Wrapper around a published payload.
///
/// Built right before publishing and never mutated after it is
/// serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub payload: Value,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl MessageEnvelope {
    /// Build an envelope stamped with the current time.
    pub fn new(
        message_type: impl Into<String>,
        payload: Value,
        metadata: Option<Map<String, Value>>,
        version: &str,
    ) -> Self {
        Self::new_at(message_type, payload, metadata, version, Utc::now())
    }

    /// Build an envelope stamped with `now`.
    ///
    /// Caller metadata is kept; `timestamp` and `version` always win.
    pub fn new_at(
        message_type: impl Into<String>,
        payload: Value,
        metadata: Option<Map<String, Value>>,
        version: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let mut metadata = metadata.unwrap_or_default();
        metadata.insert(
            "timestamp".to_string(),
            Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        metadata.insert("version".to_string(), Value::String(version.to_string()));

        Self {
            id: generate_id(),
            message_type: message_type.into(),
            payload,
            metadata,
        }
    }

    /// Creation time recorded in the metadata, if it parses.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.metadata
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Envelope version recorded in the metadata.
    pub fn version(&self) -> Option<&str> {
        self.metadata.get("version").and_then(Value::as_str)
    }
}

/// Generate an advisory message id: `msg_<base36 millis>_<7 base36 chars>`.
///
/// Good enough for tracing and dedup hints; not an idempotency key.
pub fn generate_id() -> String {
    let millis = u128::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let mut random = Uuid::new_v4().as_u128();

    let mut suffix = String::with_capacity(RANDOM_SUFFIX_LEN);
    for _ in 0..RANDOM_SUFFIX_LEN {
        suffix.push(base36_digit(random % 36));
        random /= 36;
    }

    format!("msg_{}_{}", to_base36(millis), suffix)
}

/// True iff the current time is strictly past `timestamp_ms + ttl_seconds`.
pub fn is_expired(timestamp_ms: i64, ttl_seconds: i64) -> bool {
    is_expired_at(timestamp_ms, ttl_seconds, Utc::now().timestamp_millis())
}

/// [`is_expired`] against an explicit clock.
pub const fn is_expired_at(timestamp_ms: i64, ttl_seconds: i64, now_ms: i64) -> bool {
    now_ms > timestamp_ms.saturating_add(ttl_seconds.saturating_mul(1000))
}

fn to_base36(mut n: u128) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(base36_digit(n % 36));
        n /= 36;
    }
    digits.iter().rev().collect()
}

fn base36_digit(d: u128) -> char {
    // d < 36 by construction
    char::from_digit(u32::try_from(d).unwrap_or(0), 36).unwrap_or('0')
}
