use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::ports::ScopeLookup;
use crate::domain::rules::TaskRule;

pub const HOURS_PER_DAY: f64 = 8.0;
pub const DAYS_PER_MONTH: f64 = 30.0;

/// The only answer that puts an item in scope. Matching is case-sensitive.
pub const IN_SCOPE_ANSWER: &str = "YES";
pub const OUT_OF_SCOPE_ANSWER: &str = "NO";

// ============================================================================
// Static catalog entries
// ============================================================================

/// One checklist question of the scope definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeItemDefinition {
    pub name: String,
    /// Row position in the checklist. Unique, ascending, not contiguous.
    pub ordinal: u32,
    pub details_required: bool,
    pub sub_question: bool,
}

/// Weightage band mapped to an engagement tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBand {
    pub id: u8,
    pub name: String,
    pub min_weightage: f64,
    pub max_weightage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub name: String,
    /// Descriptive baseline from the effort template. Most rules ignore it.
    pub baseline_hours: f64,
    pub rule: TaskRule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub name: String,
    pub baseline_hours: f64,
    pub tasks: Vec<TaskDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationMatrixRow {
    pub index: usize,
    pub category: String,
    pub fractions: HashMap<String, f64>,
}

impl AllocationMatrixRow {
    /// Roles missing from the row carry no share of its hours.
    pub fn fraction(&self, role: &str) -> f64 {
        self.fractions.get(role).copied().unwrap_or(0.0)
    }
}

// ============================================================================
// Request input
// ============================================================================

fn default_answer() -> String {
    OUT_OF_SCOPE_ANSWER.to_string()
}

/// A caller's answer for one scope item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeAnswer {
    pub name: String,
    #[serde(default = "default_answer")]
    pub in_scope: String,
    #[serde(default)]
    pub details: Option<f64>,
}

impl ScopeAnswer {
    pub fn new(name: impl Into<String>, in_scope: impl Into<String>, details: f64) -> Self {
        Self {
            name: name.into(),
            in_scope: in_scope.into(),
            details: Some(details),
        }
    }

    pub fn yes(name: impl Into<String>, details: f64) -> Self {
        Self::new(name, IN_SCOPE_ANSWER, details)
    }

    pub fn no(name: impl Into<String>) -> Self {
        Self::new(name, OUT_OF_SCOPE_ANSWER, 0.0)
    }
}

/// Everything one calculation run needs from the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub answers: Vec<ScopeAnswer>,
    #[serde(default)]
    pub selected_roles: Vec<String>,
}

// ============================================================================
// Scope stage output
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeItemState {
    pub name: String,
    pub ordinal: u32,
    /// 1 iff the raw answer was exactly "YES".
    pub in_scope_flag: u8,
    pub details: f64,
    pub weightage: f64,
    pub formula: String,
    pub details_required: bool,
    pub sub_question: bool,
}

impl ScopeItemState {
    pub fn from_answer(definition: &ScopeItemDefinition, answer: Option<&ScopeAnswer>) -> Self {
        let in_scope_flag = match answer {
            Some(a) if a.in_scope == IN_SCOPE_ANSWER => 1,
            _ => 0,
        };
        let details = answer.and_then(|a| a.details).unwrap_or(0.0);

        Self {
            name: definition.name.clone(),
            ordinal: definition.ordinal,
            in_scope_flag,
            details,
            weightage: 0.0,
            formula: String::new(),
            details_required: definition.details_required,
            sub_question: definition.sub_question,
        }
    }

    pub fn is_in_scope(&self) -> bool {
        self.in_scope_flag == 1
    }

    pub fn answer(&self) -> &'static str {
        if self.is_in_scope() {
            IN_SCOPE_ANSWER
        } else {
            OUT_OF_SCOPE_ANSWER
        }
    }
}

/// Request-scoped working set of item states with a by-name index.
#[derive(Debug, Clone, Default)]
pub struct ScopeTable {
    items: Vec<ScopeItemState>,
    index: HashMap<String, usize>,
}

impl ScopeTable {
    pub fn new(items: Vec<ScopeItemState>) -> Self {
        let index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.name.clone(), i))
            .collect();
        Self { items, index }
    }

    pub fn items(&self) -> &[ScopeItemState] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [ScopeItemState] {
        &mut self.items
    }

    pub fn into_items(self) -> Vec<ScopeItemState> {
        self.items
    }
}

impl ScopeLookup for ScopeTable {
    fn find(&self, name: &str) -> Option<&ScopeItemState> {
        self.index.get(name).map(|&i| &self.items[i])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScopeSummary {
    pub total_items: usize,
    pub in_scope_count: usize,
    pub out_scope_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeResult {
    pub total_weightage: f64,
    pub tier: TierBand,
    pub items: Vec<ScopeItemState>,
    pub summary: ScopeSummary,
    pub selected_roles: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ScopeResult {
    pub fn new(
        total_weightage: f64,
        tier: TierBand,
        items: Vec<ScopeItemState>,
        selected_roles: Vec<String>,
    ) -> Self {
        let in_scope_count = items.iter().filter(|i| i.is_in_scope()).count();
        let summary = ScopeSummary {
            total_items: items.len(),
            in_scope_count,
            out_scope_count: items.len() - in_scope_count,
        };
        let index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.name.clone(), i))
            .collect();

        Self {
            total_weightage,
            tier,
            items,
            summary,
            selected_roles,
            index,
        }
    }

    pub fn item(&self, name: &str) -> Option<&ScopeItemState> {
        self.find(name)
    }
}

impl ScopeLookup for ScopeResult {
    fn find(&self, name: &str) -> Option<&ScopeItemState> {
        self.index.get(name).map(|&i| &self.items[i])
    }
}

// ============================================================================
// Effort stage output
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskEffort {
    pub name: String,
    pub rule: &'static str,
    pub baseline_hours: f64,
    pub in_scope: bool,
    /// Item quantity when in scope, else 0.
    pub quantity: f64,
    pub final_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryEffort {
    pub name: String,
    pub baseline_hours: f64,
    pub tier_adjustment: f64,
    pub final_hours: f64,
    pub days: f64,
    pub tasks: Vec<TaskEffort>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffortSummary {
    pub total_weightage: f64,
    pub tier_id: u8,
    pub tier_name: String,
    pub total_hours: f64,
    pub total_days: f64,
    pub total_months: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffortResult {
    pub categories: Vec<CategoryEffort>,
    pub summary: EffortSummary,
}

impl EffortResult {
    pub fn category(&self, name: &str) -> Option<&CategoryEffort> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Final hours of a category, 0 when the category is unknown.
    pub fn category_hours(&self, name: &str) -> f64 {
        self.category(name).map(|c| c.final_hours).unwrap_or(0.0)
    }
}

// ============================================================================
// Allocation stage output
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleAllocation {
    pub role: String,
    pub hours: f64,
    pub days: f64,
    pub months: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationResult {
    pub roles: Vec<RoleAllocation>,
    pub total_hours: f64,
    pub total_days: f64,
    pub total_months: f64,
}

impl AllocationResult {
    pub fn role(&self, name: &str) -> Option<&RoleAllocation> {
        self.roles.iter().find(|r| r.role == name)
    }
}
