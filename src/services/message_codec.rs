//! Message codec for channel payloads.
//!
//! Encodes envelopes for publishing and decodes whatever arrives on a
//! channel. Decoding is tolerant: legacy and foreign publishers send plain
//! strings, so anything that is not JSON is passed through as an opaque
//! string instead of failing.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::error::EnvelopeError;
use crate::domain::models::{MessageEnvelope, MessagingConfig};

/// Envelope encoder/decoder.
#[derive(Debug, Clone, Default)]
pub struct MessageCodec {
    config: MessagingConfig,
}

impl MessageCodec {
    pub fn new(config: MessagingConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &MessagingConfig {
        &self.config
    }

    /// Encode a value for the wire. Strings pass through unchanged.
    pub fn serialize(&self, message: &Value) -> Result<String, EnvelopeError> {
        match message {
            Value::String(text) => Ok(text.clone()),
            other => Ok(serde_json::to_string(other)?),
        }
    }

    /// Encode any serializable value for the wire.
    ///
    /// Fails when the value has no JSON representation, e.g. a map with
    /// non-string keys.
    pub fn serialize_message<T: Serialize>(&self, message: &T) -> Result<String, EnvelopeError> {
        let value = serde_json::to_value(message)?;
        self.serialize(&value)
    }

    /// Decode wire text, falling back to the raw text as a JSON string.
    pub fn parse(&self, text: &str) -> Value {
        serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
    }

    /// Build an envelope stamped with the configured version.
    pub fn build_envelope(
        &self,
        message_type: &str,
        payload: Value,
        metadata: Option<Map<String, Value>>,
    ) -> Result<MessageEnvelope, EnvelopeError> {
        if message_type.trim().is_empty() {
            return Err(EnvelopeError::EmptyType);
        }
        Ok(MessageEnvelope::new(
            message_type,
            payload,
            metadata,
            &self.config.envelope_version,
        ))
    }

    /// Build and encode an envelope.
    pub fn create_envelope(
        &self,
        message_type: &str,
        payload: Value,
        metadata: Option<Map<String, Value>>,
    ) -> Result<String, EnvelopeError> {
        let envelope = self.build_envelope(message_type, payload, metadata)?;
        self.serialize_message(&envelope)
    }

    /// Payload of an enveloped message, or the decoded message itself.
    pub fn extract_payload(&self, text: &str) -> Value {
        match self.parse(text) {
            Value::Object(mut fields) if fields.contains_key("payload") => {
                fields.remove("payload").unwrap_or(Value::Null)
            }
            other => other,
        }
    }

    /// Decode a full envelope. `None` for plain or non-enveloped messages.
    pub fn parse_envelope(&self, text: &str) -> Option<MessageEnvelope> {
        serde_json::from_str(text).ok()
    }

    /// Advisory size check against `max_kb` (or the configured limit).
    ///
    /// Logs a warning when exceeded; nothing is truncated.
    pub fn validate_size(&self, text: &str, max_kb: Option<usize>) -> bool {
        let max_kb = max_kb.unwrap_or(self.config.max_message_kb);
        let size = text.len();
        let limit = max_kb.saturating_mul(1024);

        if size > limit {
            warn!(size_bytes = size, limit_bytes = limit, "Message exceeds size limit");
            return false;
        }
        true
    }

    /// Typed validation of a decoded message.
    ///
    /// The target type is the schema. Failures are logged and return `None`.
    pub fn validate<T: DeserializeOwned>(&self, message: &Value) -> Option<T> {
        match T::deserialize(message) {
            Ok(typed) => Some(typed),
            Err(err) => {
                warn!(
                    error = %err,
                    schema = std::any::type_name::<T>(),
                    "Message failed schema validation"
                );
                None
            }
        }
    }
}
