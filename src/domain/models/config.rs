use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::cache_policy::{EntityCacheConfigPatch, DEFAULT_TTL_SECONDS};
use super::envelope::{DEFAULT_MAX_MESSAGE_KB, ENVELOPE_VERSION};

/// Main configuration structure for TenantFlow realtime services
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Cache policy configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Channel message configuration
    #[serde(default)]
    pub messaging: MessagingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation for file output: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Eviction policy label. Advisory; nothing in this crate evicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    Lru,
    Lfu,
    Fifo,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self::Lru
    }
}

impl std::fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lru => write!(f, "lru"),
            Self::Lfu => write!(f, "lfu"),
            Self::Fifo => write!(f, "fifo"),
        }
    }
}

/// Global cache settings plus per-entity overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// TTL for entities without explicit configuration
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: i64,

    /// Memory budget in megabytes (advisory)
    #[serde(default = "default_max_memory_mb")]
    pub max_memory_mb: u64,

    /// Eviction policy label (advisory)
    #[serde(default)]
    pub eviction_policy: EvictionPolicy,

    /// Number of entities warmed concurrently at startup (advisory)
    #[serde(default = "default_warming_concurrency")]
    pub warming_concurrency: u32,

    /// Per-entity overrides keyed by entity name
    #[serde(default)]
    pub entities: BTreeMap<String, EntityCacheConfigPatch>,
}

const fn default_ttl_seconds() -> i64 {
    DEFAULT_TTL_SECONDS
}

const fn default_max_memory_mb() -> u64 {
    512
}

const fn default_warming_concurrency() -> u32 {
    3
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: default_ttl_seconds(),
            max_memory_mb: default_max_memory_mb(),
            eviction_policy: EvictionPolicy::default(),
            warming_concurrency: default_warming_concurrency(),
            entities: BTreeMap::new(),
        }
    }
}

/// Message envelope configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MessagingConfig {
    /// Advisory size limit per message in kilobytes
    #[serde(default = "default_max_message_kb")]
    pub max_message_kb: usize,

    /// Version stamped into envelope metadata
    #[serde(default = "default_envelope_version")]
    pub envelope_version: String,
}

const fn default_max_message_kb() -> usize {
    DEFAULT_MAX_MESSAGE_KB
}

fn default_envelope_version() -> String {
    ENVELOPE_VERSION.to_string()
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            max_message_kb: default_max_message_kb(),
            envelope_version: default_envelope_version(),
        }
    }
}
