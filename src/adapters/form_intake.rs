//! Web form payload intake.
//!
//! The scoping form posts short field ids (`acc_alt_hier`, `par_test`, ...)
//! with a `{ value, count }` pair each. This adapter maps them to catalog
//! item names and produces a [`Submission`].

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::domain::model::{ScopeAnswer, Submission, IN_SCOPE_ANSWER, OUT_OF_SCOPE_ANSWER};
use crate::utils::error::Result;

/// Form field id to scope item name. Several items accept an alternate id.
const FORM_ALIASES: &[(&str, &str)] = &[
    // dimensions
    ("account", "Account"),
    ("acc_alt_hier", "Account Alternate Hierarchies"),
    ("rat_coa", "Rationalization of CoA"),
    ("multi_curr", "Multi-Currency"),
    ("rep_curr", "Reporting Currency"),
    ("entity", "Entity"),
    ("ent_redesign", "Entity Redesign"),
    ("ent_alt_hier", "Entity Alternate Hierarchies"),
    ("scenario", "Scenario"),
    ("multi_gaap", "Multi-GAAP"),
    ("cust_dim", "Custom Dimensions"),
    ("alt_hier_cust", "Alternate Hierarchies in Custom Dimensions"),
    ("add_alias", "Additional Alias Tables"),
    // application features
    ("elim", "Elimination"),
    ("cust_elim", "Custom Elimination Requirement"),
    ("consol_journ", "Consolidation Journals"),
    ("journ_temp", "Journal Templates"),
    ("parent_curr", "Parent Currency Journals"),
    ("own_mgmt", "Ownership Management"),
    ("enh_org", "Enhanced Organization by Period"),
    ("equity_pickup", "Equity Pickup"),
    ("partner_elim", "Partner Elimination"),
    ("config_consol", "Configurable Consolidation Rules"),
    ("cash_flow", "Cash Flow"),
    ("supp_data", "Supplemental Data Collection"),
    ("ent_journ", "Enterprise Journals"),
    ("approval", "Approval Process"),
    ("hist_over", "Historic Overrides"),
    ("task_mgr", "Task Manager"),
    ("audit", "Audit"),
    // customization and calculations
    ("data_forms", "Data Forms"),
    ("dashboards", "Dashboards"),
    ("bus_rules", "Business Rules"),
    ("mem_formula", "Member Formula"),
    ("mem_form", "Member Formula"),
    ("ratios", "Ratios"),
    ("cust_kpis", "Custom KPIs"),
    ("cust_kpi", "Custom KPIs"),
    // security
    ("sec_dim", "Secured Dimensions"),
    ("num_users", "Number of Users"),
    // historical data
    ("hist_data_val", "Historical Data Validation"),
    ("hist_data", "Historical Data Validation"),
    ("data_val_acc", "Data Validation for Account Alt Hierarchies"),
    ("val_acc_alt", "Data Validation for Account Alt Hierarchies"),
    ("data_val_ent", "Data Validation for Entity Alt Hierarchies"),
    ("val_ent_alt", "Data Validation for Entity Alt Hierarchies"),
    ("hist_journ_conv", "Historical Journal Conversion"),
    ("hist_journ", "Historical Journal Conversion"),
    // integrations
    ("file_loads", "Files Based Loads"),
    ("file_load", "Files Based Loads"),
    ("direct_connect", "Direct Connect Integrations"),
    ("direct_conn", "Direct Connect Integrations"),
    ("outbound_int", "Outbound Integrations"),
    ("outbound", "Outbound Integrations"),
    ("pipeline", "Pipeline"),
    ("cust_script", "Custom Scripting"),
    // reporting
    ("mgmt_reports", "Management Reports"),
    ("mgmt_rep", "Management Reports"),
    ("consol_reports", "Consolidation Reports"),
    ("consol_rep", "Consolidation Reports"),
    ("consol_journ_reports", "Consolidation Journal Reports"),
    ("consol_journ_rep", "Consolidation Journal Reports"),
    ("ic_reports", "Intercompany Reports"),
    ("inter_rep", "Intercompany Reports"),
    ("task_mgr_reports", "Task Manager Reports"),
    ("task_rep", "Task Manager Reports"),
    ("ent_journ_reports", "Enterprise Journal Reports"),
    ("ent_journ_rep", "Enterprise Journal Reports"),
    ("smart_view", "Smart View Reports"),
    // automations
    ("auto_loads", "Automated Data loads"),
    ("auto_load", "Automated Data loads"),
    ("auto_consol", "Automated Consolidations"),
    ("backup_arch", "Backup and Archival"),
    ("backup", "Backup and Archival"),
    ("meta_import", "Metadata Import"),
    ("meta_imp", "Metadata Import"),
    // testing and training
    ("unit_test", "Unit Testing"),
    ("uat", "UAT"),
    ("sit", "SIT"),
    ("parallel_test", "Parallel Testing"),
    ("par_test", "Parallel Testing"),
    ("user_train", "User Training"),
    // transition and documentation
    ("go_live", "Go Live"),
    ("hypercare", "Hypercare"),
    ("rtm", "RTM"),
    ("design_doc", "Design Document"),
    ("sys_config_doc", "System Configuration Document"),
    ("sys_config", "System Configuration Document"),
    // change and project management
    ("admin_desktop", "Admin Desktop Procedures"),
    ("admin_proc", "Admin Desktop Procedures"),
    ("user_desktop", "End User Desktop Procedures"),
    ("end_user_proc", "End User Desktop Procedures"),
    ("proj_mgmt", "Project Management"),
];

fn default_value() -> String {
    OUT_OF_SCOPE_ANSWER.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormEntry {
    #[serde(default = "default_value")]
    pub value: String,
    #[serde(default)]
    pub count: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub scoping_data: BTreeMap<String, FormEntry>,
    #[serde(default)]
    pub selected_roles: Vec<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl FormSubmission {
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn into_submission(self) -> Submission {
        Submission {
            answers: answers_from_form(&self.scoping_data),
            selected_roles: self.selected_roles,
        }
    }
}

pub fn item_name_for(form_id: &str) -> Option<&'static str> {
    FORM_ALIASES
        .iter()
        .find(|(id, _)| *id == form_id)
        .map(|&(_, name)| name)
}

/// Map form entries to answers, in field id order.
///
/// The quantity only survives when the value is exactly "YES".
pub fn answers_from_form(form: &BTreeMap<String, FormEntry>) -> Vec<ScopeAnswer> {
    form.iter()
        .map(|(form_id, entry)| {
            let name = match item_name_for(form_id) {
                Some(name) => name.to_string(),
                None => {
                    let fallback = fallback_name(form_id);
                    tracing::warn!(
                        "⚠️ No mapping for form id '{}', using '{}'",
                        form_id,
                        fallback
                    );
                    fallback
                }
            };
            let details = if entry.value == IN_SCOPE_ANSWER {
                entry.count.unwrap_or(0.0)
            } else {
                0.0
            };

            ScopeAnswer {
                name,
                in_scope: entry.value.clone(),
                details: Some(details),
            }
        })
        .collect()
}

/// `multi_level-id` becomes `Multi Level Id`.
fn fallback_name(form_id: &str) -> String {
    let spaced = form_id.replace(['_', '-'], " ");
    let mut out = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
