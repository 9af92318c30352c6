//! TenantFlow realtime - cache policy and notification addressing
//!
//! Shared building blocks for the TenantFlow property management backend:
//! the per-entity cache policy registry, the notification channel naming
//! scheme and the message envelope published on those channels.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): Policy, channel and envelope models plus the publisher port
//! - **Service Layer** (`services`): Policy registry, message codec and notification dispatch
//! - **Adapters** (`adapters`): In-process publisher
//! - **Infrastructure Layer** (`infrastructure`): Configuration loading and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```
//! use tenantflow::domain::models::channel;
//! use tenantflow::services::CachePolicyRegistry;
//!
//! let registry = CachePolicyRegistry::with_builtin_defaults();
//! assert_eq!(registry.ttl("Leases"), 300);
//! assert_eq!(channel::chat_direct("zoe", "adam"), "chat:direct:adam:zoe");
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::memory::InMemoryPublisher;
pub use domain::models::{
    CacheConfig, CacheEntity, CachePriority, CacheStrategy, ChannelPrefix, Config,
    EntityCacheConfig, EntityCacheConfigPatch, InvalidationStrategy, LoggingConfig,
    MessageEnvelope, MessagingConfig,
};
pub use domain::ports::MessagePublisher;
pub use domain::{DispatchError, EnvelopeError, PolicyViolation, PublishError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{CachePolicyRegistry, MessageCodec, NotificationDispatcher};
