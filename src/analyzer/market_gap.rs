use crate::analyzer::Analyzer;
use crate::model::{AnalysisError, MarketGapRow, Table};
use std::collections::HashMap;

/// Aggregates demand and supply per (city, car type) and keeps undersupplied segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketGapAnalyzer;

impl MarketGapAnalyzer {
    pub const REQUIRED: &'static [&'static str] = &["city", "car_type", "demand", "supply"];

    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for MarketGapAnalyzer {
    type Output = Vec<MarketGapRow>;

    fn name(&self) -> &'static str {
        "market_gap"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        Self::REQUIRED
    }

    /// Groups keep first-occurrence order, so equal gaps stay in input order after the
    /// stable descending sort.
    fn analyze(&self, table: &Table) -> Result<Self::Output, AnalysisError> {
        let city = table.require("city")?;
        let car_type = table.require("car_type")?;
        let demand = table.require("demand")?;
        let supply = table.require("supply")?;

        let mut index: HashMap<(String, String), usize> = HashMap::new();
        let mut groups: Vec<MarketGapRow> = Vec::new();

        for row in 0..table.len() {
            let (Some(city), Some(car_type)) = (table.label(row, city), table.label(row, car_type))
            else {
                continue;
            };
            let demand = table.number(row, demand)?.unwrap_or(0.0);
            let supply = table.number(row, supply)?.unwrap_or(0.0);

            let slot = *index
                .entry((city.clone(), car_type.clone()))
                .or_insert_with(|| {
                    groups.push(MarketGapRow {
                        city,
                        car_type,
                        demand_total: 0.0,
                        supply_total: 0.0,
                        gap: 0.0,
                    });
                    groups.len() - 1
                });
            let group = &mut groups[slot];
            group.demand_total += demand;
            group.supply_total += supply;
        }

        let mut result: Vec<MarketGapRow> = groups
            .into_iter()
            .map(|mut g| {
                g.gap = g.demand_total - g.supply_total;
                g
            })
            .filter(|g| g.gap > 0.0)
            .collect();
        result.sort_by(|a, b| b.gap.total_cmp(&a.gap));
        Ok(result)
    }
}
