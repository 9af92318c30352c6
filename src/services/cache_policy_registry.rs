//! Cache policy registry.
//!
//! Single authoritative answer to "how should entity X be cached". The
//! registry is an ordinary value: build one per process (or per test)
//! from the compiled-in table, optionally layered with configured
//! overrides.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::domain::error::PolicyViolation;
use crate::domain::models::{
    CacheConfig, CacheEntity, CacheStrategy, EntityCacheConfig, EntityCacheConfigPatch,
    EntityCacheSummary, EvictionPolicy,
};

/// Global cache settings. All advisory for this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheSettings {
    pub default_ttl_seconds: i64,
    pub max_memory_mb: u64,
    pub eviction_policy: EvictionPolicy,
    pub warming_concurrency: u32,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl CacheSettings {
    /// Settings with a different default TTL.
    pub fn with_default_ttl(ttl_seconds: i64) -> Self {
        Self {
            default_ttl_seconds: ttl_seconds,
            ..Self::default()
        }
    }
}

impl From<&CacheConfig> for CacheSettings {
    fn from(config: &CacheConfig) -> Self {
        Self {
            default_ttl_seconds: config.default_ttl_seconds,
            max_memory_mb: config.max_memory_mb,
            eviction_policy: config.eviction_policy,
            warming_concurrency: config.warming_concurrency,
        }
    }
}

/// Result of validating one entity's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub entity: String,
    pub violations: Vec<PolicyViolation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Human-readable violation messages.
    pub fn errors(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

/// Entity name to cache policy table.
///
/// Keys are stored lower-cased and kept in insertion order.
#[derive(Debug, Clone)]
pub struct CachePolicyRegistry {
    entries: Vec<(String, EntityCacheConfig)>,
    settings: CacheSettings,
}

impl Default for CachePolicyRegistry {
    fn default() -> Self {
        Self::with_builtin_defaults()
    }
}

impl CachePolicyRegistry {
    /// Create a registry from explicit entries.
    ///
    /// Later duplicates of a (case-insensitive) name replace earlier ones.
    pub fn new(
        entries: impl IntoIterator<Item = (String, EntityCacheConfig)>,
        settings: CacheSettings,
    ) -> Self {
        let mut registry = Self {
            entries: Vec::new(),
            settings,
        };
        for (name, config) in entries {
            registry.upsert(&name, config);
        }
        registry
    }

    /// Registry holding the compiled-in table for every [`CacheEntity`].
    pub fn with_builtin_defaults() -> Self {
        Self::new(
            CacheEntity::ALL
                .iter()
                .map(|entity| (entity.as_str().to_string(), entity.builtin_config())),
            CacheSettings::default(),
        )
    }

    /// Compiled-in table plus the overrides from `config`.
    #[instrument(level = "debug", skip(config), fields(overrides = config.entities.len()))]
    pub fn from_config(config: &CacheConfig) -> Self {
        let mut registry = Self::with_builtin_defaults();
        registry.settings = CacheSettings::from(config);

        for (name, patch) in &config.entities {
            let merged = registry.override_config(name, *patch);
            info!(
                entity = %name.to_lowercase(),
                ttl_seconds = merged.ttl_seconds,
                enabled = merged.enabled,
                "Applied cache policy override"
            );
        }

        registry
    }

    pub const fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Configuration used for names without an entry.
    pub const fn default_config(&self) -> EntityCacheConfig {
        EntityCacheConfig::fallback(self.settings.default_ttl_seconds)
    }

    fn find(&self, normalized: &str) -> Option<&EntityCacheConfig> {
        self.entries
            .iter()
            .find(|(name, _)| name == normalized)
            .map(|(_, config)| config)
    }

    fn upsert(&mut self, name: &str, config: EntityCacheConfig) {
        let normalized = name.to_lowercase();
        match self.entries.iter_mut().find(|(key, _)| *key == normalized) {
            Some((_, existing)) => *existing = config,
            None => self.entries.push((normalized, config)),
        }
    }

    /// Policy for `name` (case-insensitive), or the default policy.
    pub fn entity_config(&self, name: &str) -> EntityCacheConfig {
        let normalized = name.to_lowercase();
        self.find(&normalized).copied().unwrap_or_else(|| {
            debug!(entity = %normalized, "No cache policy configured, using default");
            self.default_config()
        })
    }

    /// Typed lookup for a known entity.
    pub fn entity_config_for(&self, entity: CacheEntity) -> EntityCacheConfig {
        self.entity_config(entity.as_str())
    }

    pub fn is_caching_enabled(&self, name: &str) -> bool {
        self.entity_config(name).enabled
    }

    pub fn ttl(&self, name: &str) -> i64 {
        self.entity_config(name).ttl_seconds
    }

    pub fn strategy(&self, name: &str) -> CacheStrategy {
        self.entity_config(name).strategy
    }

    /// Merge `patch` into the policy for `name`, creating the entry if needed.
    ///
    /// Returns the merged policy. Invalid values are stored as given and
    /// surface through [`Self::validate_config`].
    pub fn override_config(&mut self, name: &str, patch: EntityCacheConfigPatch) -> EntityCacheConfig {
        let merged = self.entity_config(name).merged(&patch);
        self.upsert(name, merged);

        let violations = merged.violations();
        if !violations.is_empty() {
            warn!(
                entity = %name.to_lowercase(),
                violations = violations.len(),
                "Cache policy override is out of range"
            );
        }

        merged
    }

    /// Validate the stored policy for `name`. Unknown names are valid.
    pub fn validate_config(&self, name: &str) -> ValidationReport {
        let normalized = name.to_lowercase();
        let violations = self.find(&normalized).map(EntityCacheConfig::violations).unwrap_or_default();
        ValidationReport {
            entity: normalized,
            violations,
        }
    }

    /// Reports for every configured entity with at least one violation.
    pub fn validate_all(&self) -> Vec<ValidationReport> {
        self.entries
            .iter()
            .map(|(name, _)| self.validate_config(name))
            .filter(|report| !report.is_valid())
            .collect()
    }

    /// Names with explicit configuration, in insertion order.
    pub fn configured_entities(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Reporting view of every configured entity.
    pub fn config_summary(&self) -> Vec<EntityCacheSummary> {
        self.entries
            .iter()
            .map(|(name, config)| EntityCacheSummary {
                entity: name.clone(),
                enabled: config.enabled,
                ttl_seconds: config.ttl_seconds,
                strategy: config.strategy,
                priority: config.priority,
            })
            .collect()
    }

    /// Enabled entities flagged for startup warming, highest priority first.
    pub fn entities_to_warm(&self) -> Vec<&str> {
        let mut warm: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, config)| config.enabled && config.warm_on_startup)
            .collect();
        // stable sort keeps insertion order within a tier
        warm.sort_by(|(_, a), (_, b)| b.priority.cmp(&a.priority));
        warm.into_iter().map(|(name, _)| name.as_str()).collect()
    }
}
