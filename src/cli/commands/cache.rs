//! Cache policy CLI commands.

use anyhow::Result;
use comfy_table::Cell;
use serde::Serialize;

use crate::cli::display::{
    colorize_enabled, colorize_priority, colorize_valid, list_table, output, render_list,
    CommandOutput, DetailView,
};
use crate::cli::types::CacheCommands;
use crate::domain::models::{CacheConfig, EntityCacheConfig, EntityCacheSummary};
use crate::services::{CachePolicyRegistry, CacheSettings};

#[derive(Debug, Serialize)]
pub struct CacheListOutput {
    pub settings: CacheSettings,
    pub entities: Vec<EntityCacheSummary>,
}

impl CommandOutput for CacheListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["Entity", "Status", "TTL", "Strategy", "Priority"]);
        for summary in &self.entities {
            table.add_row(vec![
                Cell::new(&summary.entity),
                Cell::new(colorize_enabled(summary.enabled)),
                Cell::new(format!("{}s", summary.ttl_seconds)),
                Cell::new(summary.strategy),
                Cell::new(colorize_priority(summary.priority.as_str())),
            ]);
        }

        format!(
            "{}\n\nDefault TTL {}s, {} MB max, {} eviction",
            render_list("entity policy", "entity policies", &table, self.entities.len()),
            self.settings.default_ttl_seconds,
            self.settings.max_memory_mb,
            self.settings.eviction_policy,
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct CacheShowOutput {
    pub entity: String,
    /// False when the entity has no entry and the default policy applies.
    pub configured: bool,
    pub config: EntityCacheConfig,
}

impl CommandOutput for CacheShowOutput {
    fn to_human(&self) -> String {
        let config = &self.config;
        let mut view = DetailView::new(&self.entity)
            .field("Status", colorize_enabled(config.enabled))
            .field("TTL", format!("{}s", config.ttl_seconds))
            .field("Strategy", config.strategy)
            .field("Invalidation", config.invalidation_strategy)
            .field("Priority", colorize_priority(config.priority.as_str()))
            .field("Warm", if config.warm_on_startup { "yes" } else { "no" })
            .field_opt("Max per user", config.max_entries_per_user);

        if !self.configured {
            view = view
                .section("Notes")
                .item("No explicit policy; showing the default");
        }
        view.render()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct EntityValidation {
    pub entity: String,
    pub valid: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CacheValidateOutput {
    pub checked: usize,
    pub results: Vec<EntityValidation>,
}

impl CacheValidateOutput {
    fn invalid_count(&self) -> usize {
        self.results.iter().filter(|r| !r.valid).count()
    }
}

impl CommandOutput for CacheValidateOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        for result in &self.results {
            lines.push(format!("{}: {}", result.entity, colorize_valid(result.valid)));
            for error in &result.errors {
                lines.push(format!("  - {error}"));
            }
        }
        if self.results.is_empty() {
            lines.push(format!("All {} entity policies are valid.", self.checked));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct WarmPlanOutput {
    pub concurrency: u32,
    pub entities: Vec<String>,
}

impl CommandOutput for WarmPlanOutput {
    fn to_human(&self) -> String {
        if self.entities.is_empty() {
            return "No entities are warmed at startup.".to_string();
        }
        let mut lines = vec![format!(
            "Warm order ({} at a time):",
            self.concurrency
        )];
        for (index, entity) in self.entities.iter().enumerate() {
            lines.push(format!("  {}. {entity}", index + 1));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(command: CacheCommands, config: &CacheConfig, json_mode: bool) -> Result<()> {
    let registry = CachePolicyRegistry::from_config(config);

    match command {
        CacheCommands::List => {
            output(&list(&registry), json_mode);
            Ok(())
        }
        CacheCommands::Show { entity } => {
            output(&show(&registry, &entity), json_mode);
            Ok(())
        }
        CacheCommands::Validate { entity } => {
            let result = validate(&registry, entity.as_deref());
            output(&result, json_mode);
            let invalid = result.invalid_count();
            if invalid > 0 {
                let noun = if invalid == 1 { "policy" } else { "policies" };
                anyhow::bail!("{invalid} cache {noun} failed validation");
            }
            Ok(())
        }
        CacheCommands::WarmPlan => {
            output(&warm_plan(&registry), json_mode);
            Ok(())
        }
    }
}

fn list(registry: &CachePolicyRegistry) -> CacheListOutput {
    CacheListOutput {
        settings: *registry.settings(),
        entities: registry.config_summary(),
    }
}

fn show(registry: &CachePolicyRegistry, entity: &str) -> CacheShowOutput {
    let normalized = entity.to_lowercase();
    let configured = registry.configured_entities().contains(&normalized.as_str());
    CacheShowOutput {
        config: registry.entity_config(&normalized),
        entity: normalized,
        configured,
    }
}

/// One entity's report, or reports for every failing entity.
fn validate(registry: &CachePolicyRegistry, entity: Option<&str>) -> CacheValidateOutput {
    let reports = match entity {
        Some(name) => vec![registry.validate_config(name)],
        None => registry.validate_all(),
    };
    let checked = if entity.is_some() {
        1
    } else {
        registry.configured_entities().len()
    };

    CacheValidateOutput {
        checked,
        results: reports
            .into_iter()
            .map(|report| EntityValidation {
                valid: report.is_valid(),
                errors: report.errors(),
                entity: report.entity,
            })
            .collect(),
    }
}

fn warm_plan(registry: &CachePolicyRegistry) -> WarmPlanOutput {
    WarmPlanOutput {
        concurrency: registry.settings().warming_concurrency,
        entities: registry
            .entities_to_warm()
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::EntityCacheConfigPatch;

    #[test]
    fn test_list_covers_builtin_entities() {
        let registry = CachePolicyRegistry::with_builtin_defaults();
        let result = list(&registry);
        assert_eq!(result.entities.len(), 7);

        let json = result.to_json();
        assert_eq!(json["entities"][0]["entity"], "properties");
        assert_eq!(json["settings"]["default_ttl_seconds"], 300);
    }

    #[test]
    fn test_show_unknown_entity_uses_default() {
        let registry = CachePolicyRegistry::with_builtin_defaults();
        let result = show(&registry, "Invoices");
        assert_eq!(result.entity, "invoices");
        assert!(!result.configured);
        assert_eq!(result.config.ttl_seconds, 300);

        let known = show(&registry, "LEASES");
        assert!(known.configured);
        assert!(known.config.warm_on_startup);
    }

    #[test]
    fn test_validate_reports_only_failures() {
        let mut registry = CachePolicyRegistry::with_builtin_defaults();
        assert!(validate(&registry, None).results.is_empty());

        registry.override_config("stats", EntityCacheConfigPatch::ttl(-1));
        let result = validate(&registry, None);
        assert_eq!(result.checked, 7);
        assert_eq!(result.invalid_count(), 1);
        assert_eq!(result.results[0].entity, "stats");
        assert!(result.results[0].errors[0].contains("must be positive"));
    }

    #[test]
    fn test_validate_single_entity() {
        let registry = CachePolicyRegistry::with_builtin_defaults();
        let result = validate(&registry, Some("Tenants"));
        assert_eq!(result.checked, 1);
        assert_eq!(result.results.len(), 1);
        assert!(result.results[0].valid);
    }

    #[test]
    fn test_warm_plan_order() {
        let config = CacheConfig::default();
        let registry = CachePolicyRegistry::from_config(&config);
        let plan = warm_plan(&registry);
        assert_eq!(plan.entities, vec!["properties", "leases", "stats"]);
        assert_eq!(plan.concurrency, 3);
    }
}
