use serde::Serialize;

use crate::catalog::Catalog;
use crate::core::allocation::AllocationReducer;
use crate::core::effort::EffortEngine;
use crate::core::kdd::{key_design_decisions, KeyDesignDecision};
use crate::core::scope::ScopeAggregator;
use crate::domain::model::{AllocationResult, EffortResult, ScopeResult, Submission};

/// Output of one full calculation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementEstimate {
    pub scope: ScopeResult,
    pub effort: EffortResult,
    pub allocation: AllocationResult,
    pub key_design_decisions: Vec<KeyDesignDecision>,
}

pub struct ScopingEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> ScopingEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn run(&self, submission: &Submission) -> EngagementEstimate {
        tracing::info!(
            "🚀 Estimating engagement from {} answers",
            submission.answers.len()
        );

        // Scope
        let scope = ScopeAggregator::new(self.catalog)
            .process(&submission.answers, &submission.selected_roles);
        tracing::debug!(
            "📋 Total weightage {} ({} of {} items in scope): {}",
            scope.total_weightage,
            scope.summary.in_scope_count,
            scope.summary.total_items,
            scope.tier.name
        );

        // Effort
        let effort = EffortEngine::new(self.catalog).calculate(&scope);
        tracing::debug!(
            "⏱️ Effort {} hours ({:.2} days)",
            effort.summary.total_hours,
            effort.summary.total_days
        );

        // Allocation
        let allocation = AllocationReducer::new(self.catalog.allocation())
            .reduce(&effort, &scope.selected_roles);
        tracing::debug!(
            "👥 Allocated {} hours across {} roles",
            allocation.total_hours,
            allocation.roles.len()
        );

        let key_design_decisions = key_design_decisions(&scope);

        tracing::info!("✅ Estimate complete");
        EngagementEstimate {
            scope,
            effort,
            allocation,
            key_design_decisions,
        }
    }
}
