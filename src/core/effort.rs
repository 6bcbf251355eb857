use crate::catalog::Catalog;
use crate::domain::model::{
    CategoryDefinition, CategoryEffort, EffortResult, EffortSummary, ScopeResult, TaskEffort,
    DAYS_PER_MONTH, HOURS_PER_DAY,
};
use crate::domain::ports::ScopeLookup;

/// Applies each task's rule and rolls tasks up into category and engagement totals.
pub struct EffortEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> EffortEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn calculate(&self, scope: &ScopeResult) -> EffortResult {
        let categories: Vec<CategoryEffort> = self
            .catalog
            .categories()
            .iter()
            .map(|category| self.category_effort(category, scope))
            .collect();

        let total_hours: f64 = categories.iter().map(|c| c.final_hours).sum();
        let total_days = total_hours / HOURS_PER_DAY;
        let summary = EffortSummary {
            total_weightage: scope.total_weightage,
            tier_id: scope.tier.id,
            tier_name: scope.tier.name.clone(),
            total_hours,
            total_days,
            total_months: total_days / DAYS_PER_MONTH,
        };

        tracing::debug!(
            "Effort calculated: {} hours across {} categories",
            summary.total_hours,
            categories.len()
        );

        EffortResult {
            categories,
            summary,
        }
    }

    fn category_effort(&self, category: &CategoryDefinition, scope: &ScopeResult) -> CategoryEffort {
        let tasks: Vec<TaskEffort> = category
            .tasks
            .iter()
            .map(|task| TaskEffort {
                name: task.name.clone(),
                rule: task.rule.kind(),
                baseline_hours: task.baseline_hours,
                in_scope: scope.in_scope(&task.name),
                quantity: scope.scoped_details(&task.name),
                final_hours: task.rule.final_hours(&task.name, scope),
            })
            .collect();

        let tier_adjustment = self
            .catalog
            .tier_adjustment()
            .adjustment_for(&category.name, scope.total_weightage);
        let task_hours: f64 = tasks
            .iter()
            .map(|t| t.final_hours)
            .filter(|hours| *hours > 0.0)
            .sum();
        let final_hours = (category.baseline_hours + tier_adjustment) + task_hours;

        CategoryEffort {
            name: category.name.clone(),
            baseline_hours: category.baseline_hours,
            tier_adjustment,
            final_hours,
            days: final_hours / HOURS_PER_DAY,
            tasks,
        }
    }
}
