use serde::{Deserialize, Serialize};

use crate::domain::ports::ScopeLookup;

/// Share of the quantity that falls into each of the three scaling buckets.
const BUCKET_SPLIT: [f64; 3] = [0.5, 0.25, 0.25];

/// How a task's final hours are derived from the scope answers.
///
/// Selected once per task when the catalog is loaded. Every variant except
/// the historical-data family is gated: a task whose name is not an in-scope
/// scope item contributes 0 hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskRule {
    /// `multiplier x quantity`, 0 when the quantity is not positive.
    GatedMultiplier { multiplier: f64 },

    /// Quantity split 50/25/25 into buckets, each bucket count rounded half
    /// away from zero and multiplied by its own rate.
    BandedScaling { rates: [f64; 3] },

    /// `rate x quantity` with no positivity check.
    Linear { rate: f64 },

    /// Fixed hours once the quantity exceeds the threshold.
    ThresholdStep { threshold: f64, hours: f64 },

    /// `base x factor` whenever the task is in scope.
    Constant { base: f64, factor: f64 },

    /// `(base + (quantity + 1) x rate) x hours_per_day` on the item's raw
    /// quantity, independent of its own answer.
    HistoryParent {
        base: f64,
        rate: f64,
        hours_per_day: f64,
    },

    /// Requires the task's own YES; hours follow the parent's raw quantity.
    ParentQuantity { parent: String, multiplier: f64 },

    /// Ignores the task's own answer; hours follow a sibling item's raw
    /// quantity when it is positive.
    SiblingQuantity { source: String, multiplier: f64 },

    NotApplicable,
}

impl TaskRule {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GatedMultiplier { .. } => "gated_multiplier",
            Self::BandedScaling { .. } => "banded_scaling",
            Self::Linear { .. } => "linear",
            Self::ThresholdStep { .. } => "threshold_step",
            Self::Constant { .. } => "constant",
            Self::HistoryParent { .. } => "history_parent",
            Self::ParentQuantity { .. } => "parent_quantity",
            Self::SiblingQuantity { .. } => "sibling_quantity",
            Self::NotApplicable => "not_applicable",
        }
    }

    /// True for rules that skip the in-scope gate on the task's own name.
    pub fn bypasses_scope_gate(&self) -> bool {
        matches!(
            self,
            Self::HistoryParent { .. } | Self::ParentQuantity { .. } | Self::SiblingQuantity { .. }
        )
    }

    /// Scope item named by this rule other than the task itself.
    pub fn source_item(&self) -> Option<&str> {
        match self {
            Self::ParentQuantity { parent, .. } => Some(parent.as_str()),
            Self::SiblingQuantity { source, .. } => Some(source.as_str()),
            _ => None,
        }
    }

    pub fn final_hours<S: ScopeLookup + ?Sized>(&self, task: &str, scope: &S) -> f64 {
        match self {
            Self::HistoryParent {
                base,
                rate,
                hours_per_day,
            } => {
                let quantity = scope.details(task);
                if quantity > 0.0 {
                    (base + (quantity + 1.0) * rate) * hours_per_day
                } else {
                    0.0
                }
            }
            Self::ParentQuantity { parent, multiplier } => {
                if scope.in_scope(task) {
                    multiplier * scope.details(parent)
                } else {
                    0.0
                }
            }
            Self::SiblingQuantity { source, multiplier } => {
                let quantity = scope.details(source);
                if quantity > 0.0 {
                    multiplier * quantity
                } else {
                    0.0
                }
            }
            gated => {
                if !scope.in_scope(task) {
                    return 0.0;
                }
                gated.gated_hours(scope.scoped_details(task))
            }
        }
    }

    fn gated_hours(&self, quantity: f64) -> f64 {
        match self {
            Self::GatedMultiplier { multiplier } => {
                if quantity > 0.0 {
                    multiplier * quantity
                } else {
                    0.0
                }
            }
            Self::BandedScaling { rates } => {
                if quantity > 0.0 {
                    BUCKET_SPLIT
                        .iter()
                        .zip(rates.iter())
                        .map(|(share, rate)| bucket_count(quantity * share) * rate)
                        .sum()
                } else {
                    0.0
                }
            }
            Self::Linear { rate } => quantity * rate,
            Self::ThresholdStep { threshold, hours } => {
                if quantity > *threshold {
                    *hours
                } else {
                    0.0
                }
            }
            Self::Constant { base, factor } => base * factor,
            _ => 0.0,
        }
    }
}

/// Round half away from zero, then keep the integer part.
pub fn bucket_count(value: f64) -> f64 {
    value.round().trunc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ScopeAnswer, ScopeItemDefinition, ScopeItemState, ScopeTable};

    fn table(entries: &[(&str, &str, f64)]) -> ScopeTable {
        let states = entries
            .iter()
            .enumerate()
            .map(|(i, (name, answer, details))| {
                let def = ScopeItemDefinition {
                    name: name.to_string(),
                    ordinal: i as u32,
                    details_required: true,
                    sub_question: false,
                };
                ScopeItemState::from_answer(&def, Some(&ScopeAnswer::new(*name, *answer, *details)))
            })
            .collect();
        ScopeTable::new(states)
    }

    #[test]
    fn test_bucket_count_rounds_half_away_from_zero() {
        assert_eq!(bucket_count(2.5), 3.0);
        assert_eq!(bucket_count(1.25), 1.0);
        assert_eq!(bucket_count(0.5), 1.0);
        assert_eq!(bucket_count(0.25), 0.0);
        assert_eq!(bucket_count(0.75), 1.0);
    }

    #[test]
    fn test_banded_scaling_splits_quantity() {
        let scope = table(&[("Data Forms", "YES", 5.0)]);
        let rule = TaskRule::BandedScaling {
            rates: [8.0, 12.0, 16.0],
        };
        // buckets 3 / 1 / 1
        assert_eq!(rule.final_hours("Data Forms", &scope), 3.0 * 8.0 + 12.0 + 16.0);
    }

    #[test]
    fn test_banded_scaling_light_rate_triples() {
        let scope = table(&[("Member Formula", "YES", 5.0), ("Custom KPIs", "YES", 5.0)]);
        let member = TaskRule::BandedScaling {
            rates: [2.0, 3.0, 4.0],
        };
        let kpis = TaskRule::BandedScaling {
            rates: [2.0, 4.0, 4.0],
        };
        assert_eq!(member.final_hours("Member Formula", &scope), 13.0);
        assert_eq!(kpis.final_hours("Custom KPIs", &scope), 14.0);
    }

    #[test]
    fn test_banded_scaling_zero_quantity() {
        let scope = table(&[("Dashboards", "YES", 0.0)]);
        let rule = TaskRule::BandedScaling {
            rates: [8.0, 12.0, 16.0],
        };
        assert_eq!(rule.final_hours("Dashboards", &scope), 0.0);
    }

    #[test]
    fn test_gated_rules_return_zero_out_of_scope() {
        let scope = table(&[("Parallel Testing", "NO", 3.0), ("Account Alternate Hierarchies", "NO", 2.0)]);
        let constant = TaskRule::Constant {
            base: 40.0,
            factor: 2.0,
        };
        let multiplier = TaskRule::GatedMultiplier { multiplier: 8.0 };
        assert_eq!(constant.final_hours("Parallel Testing", &scope), 0.0);
        assert_eq!(multiplier.final_hours("Account Alternate Hierarchies", &scope), 0.0);
        assert_eq!(multiplier.final_hours("Unknown Item", &scope), 0.0);
    }

    #[test]
    fn test_gated_multiplier_and_linear() {
        let scope = table(&[
            ("Account Alternate Hierarchies", "YES", 2.0),
            ("Secured Dimensions", "YES", 1.0),
            ("Number of Users", "YES", 20.0),
        ]);
        assert_eq!(
            TaskRule::GatedMultiplier { multiplier: 8.0 }.final_hours("Account Alternate Hierarchies", &scope),
            16.0
        );
        assert_eq!(TaskRule::Linear { rate: 4.0 }.final_hours("Secured Dimensions", &scope), 4.0);
        assert_eq!(TaskRule::Linear { rate: 0.2 }.final_hours("Number of Users", &scope), 4.0);
    }

    #[test]
    fn test_linear_stays_gated_on_own_answer() {
        let scope = table(&[("Secured Dimensions", "NO", 3.0), ("Number of Users", "NO", 50.0)]);
        assert_eq!(TaskRule::Linear { rate: 4.0 }.final_hours("Secured Dimensions", &scope), 0.0);
        assert_eq!(TaskRule::Linear { rate: 0.2 }.final_hours("Number of Users", &scope), 0.0);
    }

    #[test]
    fn test_linear_has_no_positivity_check() {
        let scope = table(&[("Secured Dimensions", "YES", -2.0)]);
        assert_eq!(TaskRule::Linear { rate: 4.0 }.final_hours("Secured Dimensions", &scope), -8.0);
        assert_eq!(
            TaskRule::GatedMultiplier { multiplier: 4.0 }.final_hours("Secured Dimensions", &scope),
            0.0
        );
    }

    #[test]
    fn test_threshold_step() {
        let rule = TaskRule::ThresholdStep {
            threshold: 50.0,
            hours: 8.0,
        };
        assert_eq!(rule.final_hours("Users", &table(&[("Users", "YES", 51.0)])), 8.0);
        assert_eq!(rule.final_hours("Users", &table(&[("Users", "YES", 50.0)])), 0.0);
    }

    #[test]
    fn test_history_parent_ignores_own_answer() {
        let rule = TaskRule::HistoryParent {
            base: 15.0,
            rate: 10.0,
            hours_per_day: 8.0,
        };
        let yes = table(&[("Historical Data Validation", "YES", 2.0)]);
        let no = table(&[("Historical Data Validation", "NO", 2.0)]);
        assert_eq!(rule.final_hours("Historical Data Validation", &yes), 360.0);
        assert_eq!(rule.final_hours("Historical Data Validation", &no), 360.0);

        let zero = table(&[("Historical Data Validation", "YES", 0.0)]);
        assert_eq!(rule.final_hours("Historical Data Validation", &zero), 0.0);
    }

    #[test]
    fn test_parent_quantity_requires_own_yes() {
        let rule = TaskRule::ParentQuantity {
            parent: "Historical Data Validation".to_string(),
            multiplier: 20.0,
        };
        let scope = table(&[
            ("Historical Data Validation", "NO", 3.0),
            ("Historical Journal Conversion", "YES", 0.0),
        ]);
        assert_eq!(rule.final_hours("Historical Journal Conversion", &scope), 60.0);

        let scope = table(&[
            ("Historical Data Validation", "YES", 3.0),
            ("Historical Journal Conversion", "NO", 0.0),
        ]);
        assert_eq!(rule.final_hours("Historical Journal Conversion", &scope), 0.0);
    }

    #[test]
    fn test_sibling_quantity_ignores_own_answer() {
        let rule = TaskRule::SiblingQuantity {
            source: "Entity Alternate Hierarchies".to_string(),
            multiplier: 20.0,
        };
        let scope = table(&[
            ("Entity Alternate Hierarchies", "NO", 2.0),
            ("Data Validation for Entity Alt Hierarchies", "NO", 0.0),
        ]);
        assert_eq!(rule.final_hours("Data Validation for Entity Alt Hierarchies", &scope), 40.0);
        assert!(rule.bypasses_scope_gate());
        assert_eq!(rule.source_item(), Some("Entity Alternate Hierarchies"));
    }

    #[test]
    fn test_rule_deserializes_from_tagged_table() {
        #[derive(Deserialize)]
        struct Entry {
            rule: TaskRule,
        }

        let entry: Entry =
            toml::from_str(r#"rule = { kind = "banded_scaling", rates = [2.0, 3.0, 4.0] }"#).unwrap();
        assert_eq!(entry.rule, TaskRule::BandedScaling { rates: [2.0, 3.0, 4.0] });

        let entry: Entry = toml::from_str(r#"rule = { kind = "not_applicable" }"#).unwrap();
        assert_eq!(entry.rule, TaskRule::NotApplicable);
    }
}
