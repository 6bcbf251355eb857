use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

use crate::domain::model::{AllocationMatrixRow, CategoryDefinition};
use crate::utils::error::{Result, ScopingError};
use crate::utils::validation::validate_range;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AllocationMatrix {
    pub roles: Vec<String>,
    pub rows: Vec<AllocationMatrixRow>,
}

impl AllocationMatrix {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Category name to role fractions, in category order.
    pub fn matrix_view(&self) -> Vec<(&str, BTreeMap<&str, f64>)> {
        self.rows
            .iter()
            .map(|row| {
                let fractions = self
                    .roles
                    .iter()
                    .map(|role| (role.as_str(), row.fraction(role)))
                    .collect();
                (row.category.as_str(), fractions)
            })
            .collect()
    }

    pub fn validate(&self, categories: &[CategoryDefinition]) -> Result<()> {
        let mut seen = HashSet::new();
        for role in &self.roles {
            if !seen.insert(role.as_str()) {
                return Err(ScopingError::catalog(
                    "allocation",
                    format!("role '{}' listed twice", role),
                ));
            }
        }

        if self.rows.len() != categories.len() {
            return Err(ScopingError::catalog(
                "allocation",
                format!(
                    "expected {} rows, one per effort category, found {}",
                    categories.len(),
                    self.rows.len()
                ),
            ));
        }

        for (position, (row, category)) in self.rows.iter().zip(categories).enumerate() {
            if row.index != position || row.category != category.name {
                return Err(ScopingError::catalog(
                    "allocation",
                    format!(
                        "row {} must be '{}' at index {}, found '{}' at index {}",
                        position, category.name, position, row.category, row.index
                    ),
                ));
            }

            for (role, fraction) in &row.fractions {
                if !self.has_role(role) {
                    return Err(ScopingError::catalog(
                        "allocation",
                        format!("unknown role '{}' in row '{}'", role, row.category),
                    ));
                }
                validate_range(&format!("allocation.{}.{}", row.category, role), *fraction, 0.0, 1.0)
                    .map_err(|e| ScopingError::catalog("allocation", e.to_string()))?;
            }
        }

        Ok(())
    }
}
