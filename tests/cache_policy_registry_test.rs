//! Integration tests for the cache policy registry loaded from configuration.

mod common;

use tenantflow::domain::models::{
    CacheEntity, CachePriority, CacheStrategy, EntityCacheConfigPatch, InvalidationStrategy,
};
use tenantflow::infrastructure::config::{ConfigError, ConfigLoader};
use tenantflow::services::CachePolicyRegistry;

#[test]
fn test_builtin_table_matches_entities() {
    let registry = CachePolicyRegistry::with_builtin_defaults();

    let leases = registry.entity_config("leases");
    assert_eq!(leases.ttl_seconds, 300);
    assert_eq!(leases.strategy, CacheStrategy::WriteThrough);
    assert_eq!(leases.invalidation_strategy, InvalidationStrategy::EventBased);
    assert_eq!(leases.max_entries_per_user, Some(1000));
    assert!(leases.warm_on_startup);
    assert_eq!(leases.priority, CachePriority::High);

    let documents = registry.entity_config_for(CacheEntity::Documents);
    assert_eq!(documents.ttl_seconds, 1800);
    assert_eq!(documents.invalidation_strategy, InvalidationStrategy::Manual);
    assert_eq!(documents.priority, CachePriority::Low);

    assert_eq!(
        registry.configured_entities(),
        vec!["properties", "tenants", "units", "leases", "stats", "documents", "maintenance"]
    );
}

#[test]
fn test_lookup_is_case_insensitive() {
    let registry = CachePolicyRegistry::with_builtin_defaults();
    for name in ["stats", "STATS", "Stats", "sTaTs"] {
        assert_eq!(registry.ttl(name), 60, "lookup of {name}");
    }
}

#[test]
fn test_unknown_entity_gets_default_policy() {
    let registry = CachePolicyRegistry::with_builtin_defaults();
    let config = registry.entity_config("invoices");

    assert_eq!(config.ttl_seconds, 300);
    assert_eq!(config.strategy, CacheStrategy::CacheAside);
    assert_eq!(config.invalidation_strategy, InvalidationStrategy::TimeBased);
    assert!(config.enabled);
    assert!(registry.is_caching_enabled("invoices"));
    assert!(registry.validate_config("invoices").is_valid());
}

#[test]
fn test_override_is_isolated_per_entity() {
    let mut registry = CachePolicyRegistry::with_builtin_defaults();
    let tenants_before = registry.entity_config("tenants");

    registry.override_config("Leases", EntityCacheConfigPatch::ttl(999));

    assert_eq!(registry.ttl("leases"), 999);
    assert_eq!(registry.strategy("leases"), CacheStrategy::WriteThrough);
    assert_eq!(registry.entity_config("tenants"), tenants_before);
}

#[test]
fn test_independent_registries_do_not_share_state() {
    let mut first = CachePolicyRegistry::with_builtin_defaults();
    let second = CachePolicyRegistry::with_builtin_defaults();

    first.override_config("units", EntityCacheConfigPatch::enabled(false));

    assert!(!first.is_caching_enabled("units"));
    assert!(second.is_caching_enabled("units"));
}

#[test]
fn test_validation_messages() {
    let mut registry = CachePolicyRegistry::with_builtin_defaults();

    registry.override_config("stats", EntityCacheConfigPatch::ttl(-1));
    let report = registry.validate_config("stats");
    assert!(!report.is_valid());
    assert!(report.errors().iter().any(|e| e.contains("must be positive")));

    registry.override_config("stats", EntityCacheConfigPatch::ttl(90_000));
    let report = registry.validate_config("stats");
    assert!(report
        .errors()
        .iter()
        .any(|e| e.contains("should not exceed 24 hours")));

    let failing: Vec<_> = registry
        .validate_all()
        .into_iter()
        .map(|report| report.entity)
        .collect();
    assert_eq!(failing, vec!["stats"]);
}

#[test]
fn test_registry_from_config_file() {
    let (_dir, path) = common::write_config(
        "cache:\n  default_ttl_seconds: 120\n  warming_concurrency: 5\n  entities:\n    Documents:\n      warm_on_startup: true\n      priority: high\n    invoices:\n      ttl_seconds: 45\n",
    );

    let config = ConfigLoader::load_from_file(&path).unwrap();
    let registry = CachePolicyRegistry::from_config(&config.cache);

    assert_eq!(registry.settings().default_ttl_seconds, 120);
    assert_eq!(registry.settings().warming_concurrency, 5);
    assert_eq!(registry.ttl("invoices"), 45);
    assert_eq!(registry.ttl("receipts"), 120, "fallback follows the configured default");
    assert_eq!(registry.ttl("documents"), 1800, "unpatched fields are kept");
    assert_eq!(
        registry.entities_to_warm(),
        vec!["properties", "leases", "documents", "stats"]
    );
}

#[test]
fn test_invalid_override_rejected_at_load() {
    let (_dir, path) =
        common::write_config("cache:\n  entities:\n    leases:\n      max_entries_per_user: 0\n");

    let err = ConfigLoader::load_from_file(&path).unwrap_err();
    let config_err = err
        .downcast_ref::<ConfigError>()
        .expect("validation failure should surface as ConfigError");
    assert!(matches!(
        config_err,
        ConfigError::InvalidEntityOverride { entity, .. } if entity == "leases"
    ));
}
