//! Message envelope CLI commands.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::display::{colorize_valid, output, truncate, CommandOutput, DetailView};
use crate::cli::types::EnvelopeCommands;
use crate::domain::models::envelope::is_expired;
use crate::domain::models::MessagingConfig;
use crate::services::MessageCodec;

const PAYLOAD_PREVIEW_CHARS: usize = 120;

#[derive(Debug, Serialize)]
pub struct EnvelopeCreateOutput {
    pub message: String,
}

impl CommandOutput for EnvelopeCreateOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.message).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct EnvelopeInspectOutput {
    pub enveloped: bool,
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub message_type: Option<String>,
    pub version: Option<String>,
    pub timestamp: Option<String>,
    pub payload: Value,
    pub size_bytes: usize,
    pub within_size_limit: bool,
    /// Present only when a TTL was given and the envelope carries a timestamp.
    pub expired: Option<bool>,
}

impl CommandOutput for EnvelopeInspectOutput {
    fn to_human(&self) -> String {
        let title = if self.enveloped {
            "Envelope"
        } else {
            "Plain message"
        };
        let payload = serde_json::to_string(&self.payload).unwrap_or_default();

        DetailView::new(title)
            .field_opt("ID", self.id.as_deref())
            .field_opt("Type", self.message_type.as_deref())
            .field_opt("Version", self.version.as_deref())
            .field_opt("Timestamp", self.timestamp.as_deref())
            .field(
                "Size",
                format!("{} bytes ({})", self.size_bytes, colorize_valid(self.within_size_limit)),
            )
            .field_opt(
                "Expired",
                self.expired.map(|expired| if expired { "yes" } else { "no" }),
            )
            .section("Payload")
            .item(&truncate(&payload, PAYLOAD_PREVIEW_CHARS))
            .render()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(
    command: EnvelopeCommands,
    messaging: &MessagingConfig,
    json_mode: bool,
) -> Result<()> {
    let codec = MessageCodec::new(messaging.clone());

    match command {
        EnvelopeCommands::Create {
            message_type,
            payload,
            metadata,
        } => {
            let result = create(&codec, &message_type, &payload, metadata)?;
            output(&result, json_mode);
            Ok(())
        }
        EnvelopeCommands::Inspect {
            message,
            ttl,
            max_kb,
        } => {
            output(&inspect(&codec, &message, ttl, max_kb), json_mode);
            Ok(())
        }
    }
}

fn create(
    codec: &MessageCodec,
    message_type: &str,
    payload: &str,
    metadata: Vec<(String, String)>,
) -> Result<EnvelopeCreateOutput> {
    let metadata: Map<String, Value> = metadata
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    let metadata = (!metadata.is_empty()).then_some(metadata);

    let message = codec
        .create_envelope(message_type, codec.parse(payload), metadata)
        .context("Failed to create envelope")?;
    Ok(EnvelopeCreateOutput { message })
}

fn inspect(
    codec: &MessageCodec,
    message: &str,
    ttl_seconds: Option<i64>,
    max_kb: Option<usize>,
) -> EnvelopeInspectOutput {
    let within_size_limit = codec.validate_size(message, max_kb);

    match codec.parse_envelope(message) {
        Some(envelope) => {
            let timestamp = envelope.timestamp();
            let expired = ttl_seconds
                .zip(timestamp)
                .map(|(ttl, ts)| is_expired(ts.timestamp_millis(), ttl));
            EnvelopeInspectOutput {
                enveloped: true,
                version: envelope.version().map(str::to_string),
                timestamp: timestamp.map(|ts| ts.to_rfc3339()),
                id: Some(envelope.id),
                message_type: Some(envelope.message_type),
                payload: envelope.payload,
                size_bytes: message.len(),
                within_size_limit,
                expired,
            }
        }
        None => EnvelopeInspectOutput {
            enveloped: false,
            id: None,
            message_type: None,
            version: None,
            timestamp: None,
            payload: codec.extract_payload(message),
            size_bytes: message.len(),
            within_size_limit,
            expired: None,
        },
    }
}
