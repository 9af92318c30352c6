//! Domain layer for TenantFlow realtime support
//!
//! Cache policy, channel addressing and envelope models, plus the ports
//! that adapters implement.

pub mod error;
pub mod models;
pub mod ports;

pub use error::{DispatchError, EnvelopeError, PolicyViolation, PublishError};
