pub mod cache_policy;
pub mod channel;
pub mod config;
pub mod envelope;

pub use cache_policy::{
    CacheEntity, CachePriority, CacheStrategy, EntityCacheConfig, EntityCacheConfigPatch,
    EntityCacheSummary, InvalidationStrategy, DEFAULT_TTL_SECONDS, MAX_TTL_SECONDS,
};
pub use channel::ChannelPrefix;
pub use config::{CacheConfig, Config, EvictionPolicy, LoggingConfig, MessagingConfig};
pub use envelope::{MessageEnvelope, DEFAULT_MAX_MESSAGE_KB, ENVELOPE_VERSION};
