pub mod cache_policy_registry;
pub mod message_codec;
pub mod notification_dispatcher;

pub use cache_policy_registry::{CachePolicyRegistry, CacheSettings, ValidationReport};
pub use message_codec::MessageCodec;
pub use notification_dispatcher::{DispatchReceipt, NotificationDispatcher};
