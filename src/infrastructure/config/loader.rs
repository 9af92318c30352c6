use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::models::{EntityCacheConfig, MAX_TTL_SECONDS};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Invalid default_ttl_seconds: {0}. Must be between 1 and {MAX_TTL_SECONDS}")]
    InvalidDefaultTtl(i64),

    #[error("Invalid max_memory_mb: {0}. Must be at least 1")]
    InvalidMaxMemory(u64),

    #[error("Invalid warming_concurrency: {0}. Must be at least 1")]
    InvalidWarmingConcurrency(u32),

    #[error("Invalid cache override for '{entity}': {reason}")]
    InvalidEntityOverride { entity: String, reason: String },

    #[error("Invalid max_message_kb: {0}. Must be at least 1")]
    InvalidMaxMessageSize(usize),

    #[error("Envelope version cannot be empty")]
    EmptyEnvelopeVersion,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .tenantflow/config.yaml (project config)
    /// 3. .tenantflow/local.yaml (local overrides, optional)
    /// 4. Environment variables (TENANTFLOW_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("TENANTFLOW_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".tenantflow/config.yaml"))
            .merge(Yaml::file(".tenantflow/local.yaml"))
            .merge(Env::prefixed("TENANTFLOW_").split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        // Logging
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogRotation(config.logging.rotation.clone()));
        }

        // Cache
        let cache = &config.cache;
        if cache.default_ttl_seconds <= 0 || cache.default_ttl_seconds > MAX_TTL_SECONDS {
            return Err(ConfigError::InvalidDefaultTtl(cache.default_ttl_seconds));
        }

        if cache.max_memory_mb == 0 {
            return Err(ConfigError::InvalidMaxMemory(cache.max_memory_mb));
        }

        if cache.warming_concurrency == 0 {
            return Err(ConfigError::InvalidWarmingConcurrency(cache.warming_concurrency));
        }

        // Overrides are checked as patches on the fallback policy; any
        // range problem in a patched field shows up there.
        for (entity, patch) in &cache.entities {
            let patched = EntityCacheConfig::fallback(cache.default_ttl_seconds).merged(patch);
            if let Some(violation) = patched.violations().into_iter().next() {
                return Err(ConfigError::InvalidEntityOverride {
                    entity: entity.clone(),
                    reason: violation.to_string(),
                });
            }
        }

        // Messaging
        if config.messaging.max_message_kb == 0 {
            return Err(ConfigError::InvalidMaxMessageSize(config.messaging.max_message_kb));
        }

        if config.messaging.envelope_version.trim().is_empty() {
            return Err(ConfigError::EmptyEnvelopeVersion);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{CacheStrategy, EntityCacheConfigPatch, EvictionPolicy};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cache.default_ttl_seconds, 300);
        assert_eq!(config.cache.max_memory_mb, 512);
        assert_eq!(config.cache.eviction_policy, EvictionPolicy::Lru);
        assert_eq!(config.cache.warming_concurrency, 3);
        assert_eq!(config.messaging.max_message_kb, 512);
        assert_eq!(config.messaging.envelope_version, "1.0");
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
logging:
  level: debug
  format: json
cache:
  default_ttl_seconds: 120
  eviction_policy: lfu
  entities:
    leases:
      ttl_seconds: 999
      strategy: write-behind
    invoices:
      enabled: false
messaging:
  max_message_kb: 64
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.cache.default_ttl_seconds, 120);
        assert_eq!(config.cache.eviction_policy, EvictionPolicy::Lfu);
        assert_eq!(config.cache.max_memory_mb, 512, "unset fields keep defaults");
        assert_eq!(config.cache.entities["leases"].ttl_seconds, Some(999));
        assert_eq!(
            config.cache.entities["leases"].strategy,
            Some(CacheStrategy::WriteBehind)
        );
        assert_eq!(config.cache.entities["invoices"].enabled, Some(false));
        assert_eq!(config.messaging.max_message_kb, 64);

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidLogFormat(_)
        ));
    }

    #[test]
    fn test_validate_default_ttl_bounds() {
        let mut config = Config::default();
        config.cache.default_ttl_seconds = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidDefaultTtl(0)
        ));

        config.cache.default_ttl_seconds = MAX_TTL_SECONDS + 1;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidDefaultTtl(_)
        ));

        config.cache.default_ttl_seconds = MAX_TTL_SECONDS;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_warming_concurrency() {
        let mut config = Config::default();
        config.cache.warming_concurrency = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidWarmingConcurrency(0)
        ));
    }

    #[test]
    fn test_validate_entity_override() {
        let mut config = Config::default();
        config
            .cache
            .entities
            .insert("leases".to_string(), EntityCacheConfigPatch::ttl(-1));

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidEntityOverride { entity, reason } => {
                assert_eq!(entity, "leases");
                assert!(reason.contains("must be positive"));
            }
            other => panic!("Expected InvalidEntityOverride, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_zero_message_size() {
        let mut config = Config::default();
        config.messaging.max_message_kb = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidMaxMessageSize(0)
        ));
    }

    #[test]
    fn test_env_override() {
        temp_env::with_vars(
            [
                ("TENANTFLOW_CACHE__DEFAULT_TTL_SECONDS", Some("90")),
                ("TENANTFLOW_LOGGING__LEVEL", Some("warn")),
            ],
            || {
                let dir = tempfile::tempdir().unwrap();
                let path = dir.path().join("config.yaml");
                std::fs::write(&path, "messaging:\n  max_message_kb: 32\n").unwrap();

                let config = ConfigLoader::load_from_file(&path).unwrap();
                assert_eq!(config.cache.default_ttl_seconds, 90);
                assert_eq!(config.logging.level, "warn");
                assert_eq!(config.messaging.max_message_kb, 32);
            },
        );
    }

    #[test]
    fn test_hierarchical_merging() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "cache:\n  default_ttl_seconds: 100\n  warming_concurrency: 2\nlogging:\n  level: info\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(
            override_file,
            "cache:\n  default_ttl_seconds: 200\nlogging:\n  level: debug"
        )
        .unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.cache.default_ttl_seconds, 200, "Override should win");
        assert_eq!(config.cache.warming_concurrency, 2, "Base value should persist");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        temp_env::with_vars_unset(["TENANTFLOW_CACHE__DEFAULT_TTL_SECONDS"], || {
            let config = ConfigLoader::load_from_file("/nonexistent/tenantflow.yaml").unwrap();
            assert_eq!(config.cache.default_ttl_seconds, 300);
        });
    }
}
