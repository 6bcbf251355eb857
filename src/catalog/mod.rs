//! Static catalogs: scope checklist, weightage formulas, tier bands, effort
//! template and allocation matrix.
//!
//! The built-in data lives under `data/` and is embedded at compile time.
//! Everything is validated up front; a structural defect fails loading with
//! a critical [`ScopingError::CatalogError`].

pub mod adjustments;
pub mod allocation;
pub mod formulas;
pub mod tiers;

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::core::formula::Formula;
use crate::domain::model::{CategoryDefinition, ScopeItemDefinition, TaskDefinition, TierBand};
use crate::utils::error::{Result, ScopingError};
use crate::utils::validation::validate_unique_names;

pub use adjustments::TierAdjustmentTable;
pub use allocation::AllocationMatrix;
pub use tiers::TierTable;

/// Raw catalog text, one document per concern.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSources<'a> {
    pub scope_items: &'a str,
    pub formulas: &'a str,
    pub tiers: &'a str,
    pub effort: &'a str,
    pub allocation: &'a str,
}

impl CatalogSources<'static> {
    pub fn builtin() -> Self {
        Self {
            scope_items: include_str!("../../data/scope_items.toml"),
            formulas: include_str!("../../data/formulas.csv"),
            tiers: include_str!("../../data/tiers.toml"),
            effort: include_str!("../../data/effort.toml"),
            allocation: include_str!("../../data/allocation.toml"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScopeItemsFile {
    items: Vec<ScopeItemDefinition>,
}

#[derive(Debug, Deserialize)]
struct EffortFile {
    tier_adjustment: TierAdjustmentTable,
    categories: Vec<CategoryDefinition>,
}

fn parse_toml<T: serde::de::DeserializeOwned>(catalog: &str, source: &str) -> Result<T> {
    toml::from_str(source).map_err(|e| ScopingError::catalog(catalog, e.to_string()))
}

#[derive(Debug, Clone)]
pub struct Catalog {
    scope_items: Vec<ScopeItemDefinition>,
    formulas: HashMap<String, Formula>,
    tiers: TierTable,
    categories: Vec<CategoryDefinition>,
    tier_adjustment: TierAdjustmentTable,
    allocation: AllocationMatrix,
}

static BUILTIN: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    /// Parse and validate the embedded catalog.
    pub fn builtin() -> Result<Self> {
        Self::from_sources(&CatalogSources::builtin())
    }

    /// The embedded catalog, loaded once per process and shared read-only.
    pub fn shared() -> Result<&'static Catalog> {
        if let Some(catalog) = BUILTIN.get() {
            return Ok(catalog);
        }
        let catalog = Self::builtin()?;
        Ok(BUILTIN.get_or_init(|| catalog))
    }

    pub fn from_sources(sources: &CatalogSources<'_>) -> Result<Self> {
        let scope: ScopeItemsFile = parse_toml("scope_items", sources.scope_items)?;
        let tiers: TierTable = parse_toml("tiers", sources.tiers)?;
        let effort: EffortFile = parse_toml("effort", sources.effort)?;
        let allocation: AllocationMatrix = parse_toml("allocation", sources.allocation)?;
        let formula_rows = formulas::load_formulas(sources.formulas)
            .map_err(|e| ScopingError::catalog("formulas", e.to_string()))?;

        let mut formulas = HashMap::new();
        for (metric, formula) in formula_rows {
            if formulas.insert(metric.clone(), formula).is_some() {
                return Err(ScopingError::catalog(
                    "formulas",
                    format!("'{}' has more than one formula", metric),
                ));
            }
        }

        let catalog = Self {
            scope_items: scope.items,
            formulas,
            tiers,
            categories: effort.categories,
            tier_adjustment: effort.tier_adjustment,
            allocation,
        };
        catalog.validate()?;

        tracing::debug!(
            "Catalog loaded: {} scope items, {} formulas, {} tiers, {} categories, {} roles",
            catalog.scope_items.len(),
            catalog.formulas.len(),
            catalog.tiers.bands().len(),
            catalog.categories.len(),
            catalog.allocation.roles.len()
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        self.validate_scope_items()?;
        self.tiers.validate()?;
        self.validate_effort()?;
        self.allocation.validate(&self.categories)?;
        Ok(())
    }

    fn validate_scope_items(&self) -> Result<()> {
        if self.scope_items.is_empty() {
            return Err(ScopingError::catalog("scope_items", "no scope items defined"));
        }
        validate_unique_names("scope_items", self.scope_items.iter().map(|i| i.name.as_str()))
            .map_err(|e| ScopingError::catalog("scope_items", e.to_string()))?;

        let mut ordinals = HashSet::new();
        for item in &self.scope_items {
            if !ordinals.insert(item.ordinal) {
                return Err(ScopingError::catalog(
                    "scope_items",
                    format!("ordinal {} used more than once ('{}')", item.ordinal, item.name),
                ));
            }
        }

        for metric in self.formulas.keys() {
            if !self.has_scope_item(metric) {
                return Err(ScopingError::catalog(
                    "formulas",
                    format!("formula keyed to unknown scope item '{}'", metric),
                ));
            }
        }
        Ok(())
    }

    fn validate_effort(&self) -> Result<()> {
        validate_unique_names("categories", self.categories.iter().map(|c| c.name.as_str()))
            .map_err(|e| ScopingError::catalog("effort", e.to_string()))?;

        for category in &self.categories {
            validate_unique_names(&category.name, category.tasks.iter().map(|t| t.name.as_str()))
                .map_err(|e| ScopingError::catalog("effort", e.to_string()))?;

            for task in &category.tasks {
                if let Some(item) = task.rule.source_item() {
                    if !self.has_scope_item(item) {
                        return Err(ScopingError::catalog(
                            "effort",
                            format!("task '{}' references unknown scope item '{}'", task.name, item),
                        ));
                    }
                }
            }
        }

        if !self.tier_adjustment.thresholds_increase() {
            return Err(ScopingError::catalog(
                "effort",
                "tier adjustment thresholds must increase",
            ));
        }
        for name in self.tier_adjustment.categories.keys() {
            if self.category(name).is_none() {
                return Err(ScopingError::catalog(
                    "effort",
                    format!("tier adjustment for unknown category '{}'", name),
                ));
            }
        }
        Ok(())
    }

    pub fn scope_items(&self) -> &[ScopeItemDefinition] {
        &self.scope_items
    }

    pub fn has_scope_item(&self, name: &str) -> bool {
        self.scope_items.iter().any(|i| i.name == name)
    }

    pub fn formula(&self, item: &str) -> Option<&Formula> {
        self.formulas.get(item)
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub fn classify(&self, weightage: f64) -> &TierBand {
        self.tiers.classify(weightage)
    }

    pub fn categories(&self) -> &[CategoryDefinition] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn tier_adjustment(&self) -> &TierAdjustmentTable {
        &self.tier_adjustment
    }

    pub fn allocation(&self) -> &AllocationMatrix {
        &self.allocation
    }

    pub fn roles(&self) -> &[String] {
        &self.allocation.roles
    }

    pub fn total_baseline_hours(&self) -> f64 {
        self.categories.iter().map(|c| c.baseline_hours).sum()
    }

    pub fn category_baseline(&self, name: &str) -> Option<f64> {
        self.category(name).map(|c| c.baseline_hours)
    }

    /// First task with this name in category order.
    pub fn task(&self, name: &str) -> Option<&TaskDefinition> {
        self.categories
            .iter()
            .flat_map(|c| c.tasks.iter())
            .find(|t| t.name == name)
    }

    pub fn task_baseline(&self, category: &str, task: &str) -> Option<f64> {
        self.category(category)?
            .tasks
            .iter()
            .find(|t| t.name == task)
            .map(|t| t.baseline_hours)
    }
}
