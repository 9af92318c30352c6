//! Cache policy domain model.
//!
//! Describes how each TenantFlow entity should be cached: TTL, write
//! strategy, invalidation mode, per-user footprint and eviction priority.
//! These values are advisory configuration; no cache store lives here.

use serde::{Deserialize, Serialize};

use crate::domain::error::PolicyViolation;

/// Upper bound for an entity TTL (24 hours).
pub const MAX_TTL_SECONDS: i64 = 86_400;

/// TTL applied to entities without explicit configuration.
pub const DEFAULT_TTL_SECONDS: i64 = 300;

/// Entities with a compiled-in cache policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheEntity {
    Properties,
    Tenants,
    Units,
    Leases,
    Stats,
    Documents,
    Maintenance,
}

impl CacheEntity {
    /// All known entities, in table order.
    pub const ALL: [Self; 7] = [
        Self::Properties,
        Self::Tenants,
        Self::Units,
        Self::Leases,
        Self::Stats,
        Self::Documents,
        Self::Maintenance,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Properties => "properties",
            Self::Tenants => "tenants",
            Self::Units => "units",
            Self::Leases => "leases",
            Self::Stats => "stats",
            Self::Documents => "documents",
            Self::Maintenance => "maintenance",
        }
    }

    /// Case-insensitive parse.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "properties" => Some(Self::Properties),
            "tenants" => Some(Self::Tenants),
            "units" => Some(Self::Units),
            "leases" => Some(Self::Leases),
            "stats" => Some(Self::Stats),
            "documents" => Some(Self::Documents),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }

    /// Compiled-in policy for this entity.
    pub const fn builtin_config(&self) -> EntityCacheConfig {
        use CachePriority::{High, Low, Medium};
        use CacheStrategy::{CacheAside, WriteThrough};
        use InvalidationStrategy::{EventBased, Manual, TimeBased};

        let (ttl, strategy, invalidation, cap, warm, priority) = match self {
            Self::Properties => (600, CacheAside, EventBased, 500, true, High),
            Self::Tenants => (300, CacheAside, EventBased, 1000, false, High),
            Self::Units => (600, CacheAside, EventBased, 2000, false, Medium),
            Self::Leases => (300, WriteThrough, EventBased, 1000, true, High),
            Self::Stats => (60, CacheAside, TimeBased, 50, true, Medium),
            Self::Documents => (1800, CacheAside, Manual, 200, false, Low),
            Self::Maintenance => (120, CacheAside, EventBased, 500, false, Medium),
        };

        EntityCacheConfig {
            ttl_seconds: ttl,
            strategy,
            invalidation_strategy: invalidation,
            enabled: true,
            max_entries_per_user: Some(cap),
            warm_on_startup: warm,
            priority,
        }
    }
}

impl std::fmt::Display for CacheEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How reads and writes interact with the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStrategy {
    /// Read from cache, fall back to the store and populate on miss
    CacheAside,
    /// Writes go to cache and store synchronously
    WriteThrough,
    /// Writes go to cache, store is updated asynchronously
    WriteBehind,
}

impl CacheStrategy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CacheAside => "cache-aside",
            Self::WriteThrough => "write-through",
            Self::WriteBehind => "write-behind",
        }
    }
}

impl std::fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What causes a cached entry to be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidationStrategy {
    TimeBased,
    EventBased,
    Manual,
}

impl InvalidationStrategy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TimeBased => "time-based",
            Self::EventBased => "event-based",
            Self::Manual => "manual",
        }
    }
}

impl std::fmt::Display for InvalidationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory eviction preference. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePriority {
    Low,
    Medium,
    High,
}

impl Default for CachePriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl CachePriority {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for CachePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caching parameters for one entity.
///
/// `ttl_seconds` and `max_entries_per_user` are signed so that an invalid
/// override can be stored and later reported by validation instead of
/// being rejected at the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EntityCacheConfig {
    pub ttl_seconds: i64,
    pub strategy: CacheStrategy,
    pub invalidation_strategy: InvalidationStrategy,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries_per_user: Option<i64>,
    #[serde(default)]
    pub warm_on_startup: bool,
    #[serde(default)]
    pub priority: CachePriority,
}

impl EntityCacheConfig {
    /// Configuration used for entities without an explicit entry.
    pub const fn fallback(ttl_seconds: i64) -> Self {
        Self {
            ttl_seconds,
            strategy: CacheStrategy::CacheAside,
            invalidation_strategy: InvalidationStrategy::TimeBased,
            enabled: true,
            max_entries_per_user: None,
            warm_on_startup: false,
            priority: CachePriority::Medium,
        }
    }

    /// Range constraints this configuration violates.
    pub fn violations(&self) -> Vec<PolicyViolation> {
        let mut violations = Vec::new();

        if self.ttl_seconds <= 0 {
            violations.push(PolicyViolation::NonPositiveTtl(self.ttl_seconds));
        }
        if self.ttl_seconds > MAX_TTL_SECONDS {
            violations.push(PolicyViolation::TtlTooLong(self.ttl_seconds));
        }
        if let Some(cap) = self.max_entries_per_user {
            if cap <= 0 {
                violations.push(PolicyViolation::NonPositiveMaxEntries(cap));
            }
        }

        violations
    }

    /// Return a copy with every `Some` field of `patch` applied.
    pub fn merged(mut self, patch: &EntityCacheConfigPatch) -> Self {
        if let Some(ttl) = patch.ttl_seconds {
            self.ttl_seconds = ttl;
        }
        if let Some(strategy) = patch.strategy {
            self.strategy = strategy;
        }
        if let Some(invalidation) = patch.invalidation_strategy {
            self.invalidation_strategy = invalidation;
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(cap) = patch.max_entries_per_user {
            self.max_entries_per_user = Some(cap);
        }
        if let Some(warm) = patch.warm_on_startup {
            self.warm_on_startup = warm;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        self
    }
}

impl Default for EntityCacheConfig {
    fn default() -> Self {
        Self::fallback(DEFAULT_TTL_SECONDS)
    }
}

/// Partial update for an [`EntityCacheConfig`].
///
/// Also the shape of per-entity overrides in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EntityCacheConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<CacheStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalidation_strategy: Option<InvalidationStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries_per_user: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warm_on_startup: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<CachePriority>,
}

impl EntityCacheConfigPatch {
    /// Patch that only changes the TTL.
    pub fn ttl(ttl_seconds: i64) -> Self {
        Self {
            ttl_seconds: Some(ttl_seconds),
            ..Self::default()
        }
    }

    /// Patch that only toggles caching.
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }
}

/// Reporting projection of an entity's policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityCacheSummary {
    pub entity: String,
    pub enabled: bool,
    pub ttl_seconds: i64,
    pub strategy: CacheStrategy,
    pub priority: CachePriority,
}
