use serde::Serialize;

use crate::domain::ports::ScopeLookup;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyDesignDecision {
    pub id: &'static str,
    pub title: &'static str,
    /// Scope item whose in-scope answer adds this decision, `None` when always present.
    pub trigger: Option<&'static str>,
}

const ALWAYS_INCLUDED: [(&str, &str); 4] = [
    ("KDD01", "General Application Configuration"),
    ("KDD02", "Metadata Configuration"),
    ("KDD03", "FCC Consolidations and Other Calculations"),
    ("KDD04", "Reports and Data Form Configuration"),
];

/// (id, title, triggering scope item)
const CONDITIONAL: [(&str, &str, &str); 12] = [
    ("KDD05", "Ownership Management", "Ownership Management"),
    ("KDD06", "Cash Flow", "Cash Flow"),
    ("KDD07", "Journal Process", "Consolidation Journals"),
    ("KDD08", "Integrations", "Files Based Loads"),
    ("KDD09", "Historical Data Source and Validations", "Historical Data Validation"),
    ("KDD10", "Automations", "Automated Data loads"),
    ("KDD11", "Approval Process", "Approval Process"),
    ("KDD12", "Task Manager", "Task Manager"),
    ("KDD13", "Supplemental Data Collection", "Supplemental Data Collection"),
    ("KDD14", "Enterprise Journals", "Enterprise Journals"),
    ("KDD15", "Application Security", "Secured Dimensions"),
    ("KDD16", "Audit", "Audit"),
];

/// Decisions to document for this scope: the fixed four, then every
/// conditional one whose trigger is in scope, in table order.
pub fn key_design_decisions<S: ScopeLookup + ?Sized>(scope: &S) -> Vec<KeyDesignDecision> {
    let fixed = ALWAYS_INCLUDED.iter().map(|&(id, title)| KeyDesignDecision {
        id,
        title,
        trigger: None,
    });
    let conditional = CONDITIONAL
        .iter()
        .filter(|(_, _, trigger)| scope.in_scope(trigger))
        .map(|&(id, title, trigger)| KeyDesignDecision {
            id,
            title,
            trigger: Some(trigger),
        });

    fixed.chain(conditional).collect()
}

/// Every scope item the conditional decisions depend on.
pub fn trigger_items() -> impl Iterator<Item = &'static str> {
    CONDITIONAL.iter().map(|&(_, _, trigger)| trigger)
}
