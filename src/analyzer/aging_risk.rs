use crate::analyzer::Analyzer;
use crate::model::{AnalysisError, RiskRow, Table};

/// Flags cars held in stock for longer than the threshold (strictly greater).
#[derive(Debug, Clone, Copy)]
pub struct AgingRiskAnalyzer {
    threshold_days: f64,
}

impl Default for AgingRiskAnalyzer {
    fn default() -> Self {
        Self::new(45.0)
    }
}

impl AgingRiskAnalyzer {
    pub const REQUIRED: &'static [&'static str] = &["days_in_inventory"];

    pub fn new(threshold_days: f64) -> Self {
        Self { threshold_days }
    }
}

impl Analyzer for AgingRiskAnalyzer {
    type Output = Vec<RiskRow>;

    fn name(&self) -> &'static str {
        "aging_risk"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        Self::REQUIRED
    }

    fn analyze(&self, table: &Table) -> Result<Self::Output, AnalysisError> {
        let age = table.require("days_in_inventory")?;
        let car_id = table.column_index("car_id");
        let city = table.column_index("city");

        let mut result = Vec::new();
        for row in 0..table.len() {
            let Some(days) = table.number(row, age)? else {
                continue;
            };
            if days > self.threshold_days {
                result.push(RiskRow {
                    car_id: table.optional_label(row, car_id),
                    city: table.optional_label(row, city),
                    days_in_inventory: days,
                });
            }
        }
        result.sort_by(|a, b| b.days_in_inventory.total_cmp(&a.days_in_inventory));
        Ok(result)
    }
}
