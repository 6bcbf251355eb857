use serde::Deserialize;

use crate::core::formula::Formula;
use crate::utils::error::Result;

#[derive(Debug, Deserialize)]
struct FormulaRow {
    #[serde(rename = "Metric")]
    metric: String,
    #[serde(rename = "Formula", default)]
    formula: String,
}

/// Read the `Metric,Formula` table and compile every formula.
///
/// Rows with an empty metric or empty formula are skipped. Formulas that fail
/// to compile are kept and reported once here.
pub fn load_formulas(source: &str) -> Result<Vec<(String, Formula)>> {
    let mut reader = csv::Reader::from_reader(source.as_bytes());
    let mut formulas = Vec::new();

    for record in reader.deserialize::<FormulaRow>() {
        let row = record?;
        let metric = row.metric.trim();
        let text = row.formula.trim();
        if metric.is_empty() || text.is_empty() {
            continue;
        }

        let formula = Formula::compile(text);
        if let Some(e) = formula.compile_error() {
            tracing::warn!("⚠️ Formula for '{}' does not compile: {}", metric, e);
        }
        formulas.push((metric.to_string(), formula));
    }

    tracing::debug!("Loaded {} weightage formulas", formulas.len());
    Ok(formulas)
}
