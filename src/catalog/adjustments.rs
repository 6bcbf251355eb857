use serde::Deserialize;
use std::collections::HashMap;

/// Category-level hours added on top of the baseline, stepped by the
/// engagement's total weightage.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TierAdjustmentTable {
    /// Inclusive ceilings of columns 0, 1 and 2. Column 3 covers the rest.
    pub thresholds: [f64; 3],
    pub categories: HashMap<String, [f64; 4]>,
}

impl TierAdjustmentTable {
    pub fn column_for(&self, weightage: f64) -> usize {
        self.thresholds
            .iter()
            .position(|ceiling| weightage <= *ceiling)
            .unwrap_or(self.thresholds.len())
    }

    /// Categories without a row get no adjustment.
    pub fn adjustment_for(&self, category: &str, weightage: f64) -> f64 {
        self.categories
            .get(category)
            .map(|row| row[self.column_for(weightage)])
            .unwrap_or(0.0)
    }

    pub fn thresholds_increase(&self) -> bool {
        self.thresholds.windows(2).all(|w| w[0] < w[1])
    }
}
