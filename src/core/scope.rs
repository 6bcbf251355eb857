use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::domain::model::{ScopeAnswer, ScopeItemState, ScopeResult, ScopeTable};

/// Turns raw scope answers into per-item weightages and an engagement tier.
pub struct ScopeAggregator<'a> {
    catalog: &'a Catalog,
}

impl<'a> ScopeAggregator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn process(&self, answers: &[ScopeAnswer], selected_roles: &[String]) -> ScopeResult {
        // a later answer for the same name replaces an earlier one
        let by_name: HashMap<&str, &ScopeAnswer> =
            answers.iter().map(|a| (a.name.as_str(), a)).collect();

        let unmatched = by_name
            .keys()
            .filter(|name| !self.catalog.has_scope_item(name))
            .count();
        if unmatched > 0 {
            tracing::debug!("{} answers do not match any scope item and were ignored", unmatched);
        }

        let states: Vec<ScopeItemState> = self
            .catalog
            .scope_items()
            .iter()
            .map(|def| ScopeItemState::from_answer(def, by_name.get(def.name.as_str()).copied()))
            .collect();
        let mut table = ScopeTable::new(states);

        // formulas read flags and quantities only, never weightages
        let weightages: Vec<(f64, String)> = table
            .items()
            .iter()
            .map(|item| match self.catalog.formula(&item.name) {
                Some(formula) => (formula.evaluate(&item.name, &table), formula.source().to_string()),
                None => (0.0, String::new()),
            })
            .collect();

        for (item, (weightage, formula)) in table.items_mut().iter_mut().zip(weightages) {
            item.weightage = weightage;
            item.formula = formula;
        }

        let items = table.into_items();
        let total_weightage: f64 = items.iter().map(|i| i.weightage).sum();
        let tier = self.catalog.classify(total_weightage).clone();

        tracing::debug!(
            "Scope processed: weightage {} -> {}",
            total_weightage,
            tier.name
        );

        ScopeResult::new(total_weightage, tier, items, selected_roles.to_vec())
    }
}
