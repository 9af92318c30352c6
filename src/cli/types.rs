//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tenantflow")]
#[command(about = "TenantFlow cache policy and notification channel tooling", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .tenantflow/
    #[arg(short, long, global = true, env = "TENANTFLOW_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect cache policies
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Build and inspect notification channel names
    #[command(subcommand)]
    Channel(ChannelCommands),

    /// Create and inspect message envelopes
    #[command(subcommand)]
    Envelope(EnvelopeCommands),
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// List every configured entity policy
    List,

    /// Show the effective policy for one entity
    Show {
        /// Entity name (case-insensitive)
        entity: String,
    },

    /// Validate one entity, or every configured entity
    Validate {
        /// Entity name (case-insensitive)
        entity: Option<String>,
    },

    /// Show which entities would be warmed at startup
    WarmPlan,
}

#[derive(Subcommand)]
pub enum ChannelCommands {
    /// Build a channel name
    Build {
        /// Channel kind
        #[arg(value_enum)]
        kind: ChannelKind,

        /// Identifiers (two for chat-direct, none for static channels)
        ids: Vec<String>,
    },

    /// Validate a channel name and extract its parts
    Inspect {
        /// Channel name
        channel: String,
    },

    /// Publish an envelope through the in-process bus and show what a
    /// subscriber on the channel receives
    Publish {
        /// Channel name
        channel: String,

        /// Message type, e.g. maintenance.created
        #[arg(short = 't', long = "type")]
        message_type: String,

        /// JSON payload (plain text is sent as a string)
        #[arg(short, long, default_value = "null")]
        payload: String,
    },
}

/// Channel builders reachable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChannelKind {
    User,
    Org,
    Property,
    Maintenance,
    MaintenanceStatus,
    ChatRoom,
    ChatDirect,
    Email,
    Payment,
    Subscription,
    SystemEvents,
    SystemHealth,
    SystemMaintenance,
    BroadcastAll,
    BroadcastAdmins,
}

#[derive(Subcommand)]
pub enum EnvelopeCommands {
    /// Wrap a payload in an envelope and print the wire string
    Create {
        /// Message type, e.g. lease.created
        #[arg(short = 't', long = "type")]
        message_type: String,

        /// JSON payload (plain text is sent as a string)
        #[arg(short, long, default_value = "null")]
        payload: String,

        /// Extra metadata entries as key=value
        #[arg(short, long = "meta", value_parser = parse_key_value)]
        metadata: Vec<(String, String)>,
    },

    /// Decode a wire message
    Inspect {
        /// Wire text
        message: String,

        /// Report expiry against this TTL in seconds
        #[arg(long)]
        ttl: Option<i64>,

        /// Size limit in KB (defaults to the configured limit)
        #[arg(long)]
        max_kb: Option<usize>,
    },
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}
