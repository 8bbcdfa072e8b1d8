use crate::analyzer::Analyzer;
use crate::config::CostConfig;
use crate::model::{AnalysisError, RelocationSuggestion, Table};

/// Suggests relocations whose expected profit outweighs the transport cost.
#[derive(Debug, Clone, Copy)]
pub struct RelocationAnalyzer {
    costs: CostConfig,
}

impl RelocationAnalyzer {
    pub const REQUIRED: &'static [&'static str] =
        &["source_city", "dest_city", "distance_km", "expected_profit"];

    pub fn new(costs: CostConfig) -> Self {
        Self { costs }
    }
}

impl Analyzer for RelocationAnalyzer {
    type Output = Vec<RelocationSuggestion>;

    fn name(&self) -> &'static str {
        "relocation"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        Self::REQUIRED
    }

    /// Keeps rows with a strictly positive net gain, best gain first.
    fn analyze(&self, table: &Table) -> Result<Self::Output, AnalysisError> {
        let source = table.require("source_city")?;
        let dest = table.require("dest_city")?;
        let distance = table.require("distance_km")?;
        let profit = table.require("expected_profit")?;
        let car_id = table.column_index("car_id");

        let mut result = Vec::new();
        for row in 0..table.len() {
            let distance_km = table.number(row, distance)?;
            let expected_profit = table.number(row, profit)?;
            let (Some(distance_km), Some(expected_profit)) = (distance_km, expected_profit) else {
                continue;
            };

            let relocation_cost = self.costs.relocation_cost(distance_km);
            let net_gain = expected_profit - relocation_cost;
            if net_gain > 0.0 {
                result.push(RelocationSuggestion {
                    car_id: table.optional_label(row, car_id),
                    source_city: table.label(row, source),
                    dest_city: table.label(row, dest),
                    relocation_cost,
                    net_gain,
                });
            }
        }
        result.sort_by(|a, b| b.net_gain.total_cmp(&a.net_gain));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;

    const COLUMNS: [&str; 5] = ["car_id", "source_city", "dest_city", "distance_km", "expected_profit"];

    fn row(id: i64, distance: f64, profit: f64) -> Vec<Cell> {
        vec![
            Cell::from(id),
            Cell::from("Delhi"),
            Cell::from("Pune"),
            Cell::from(distance),
            Cell::from(profit),
        ]
    }

    fn analyzer() -> RelocationAnalyzer {
        RelocationAnalyzer::new(CostConfig::default())
    }

    #[test]
    fn unprofitable_move_is_excluded() {
        let table = Table::from_rows(&COLUMNS, vec![row(1, 100.0, 5000.0)]).unwrap();
        assert!(analyzer().analyze(&table).unwrap().is_empty());
    }

    #[test]
    fn profitable_move_is_included() {
        let table = Table::from_rows(&COLUMNS, vec![row(1, 100.0, 8000.0)]).unwrap();
        let out = analyzer().analyze(&table).unwrap();
        assert_eq!(
            out,
            vec![RelocationSuggestion {
                car_id: Some("1".into()),
                source_city: Some("Delhi".into()),
                dest_city: Some("Pune".into()),
                relocation_cost: 5500.0,
                net_gain: 2500.0,
            }]
        );
    }

    #[test]
    fn break_even_is_not_profitable() {
        let table = Table::from_rows(&COLUMNS, vec![row(1, 100.0, 5500.0)]).unwrap();
        assert!(analyzer().analyze(&table).unwrap().is_empty());
    }

    #[test]
    fn sorted_by_net_gain_descending() {
        let table = Table::from_rows(
            &COLUMNS,
            vec![row(1, 10.0, 4000.0), row(2, 0.0, 9000.0), row(3, 50.0, 4500.0)],
        )
        .unwrap();
        let ids: Vec<_> = analyzer()
            .analyze(&table)
            .unwrap()
            .into_iter()
            .map(|s| s.car_id.unwrap())
            .collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn costs_come_from_config() {
        let table = Table::from_rows(&COLUMNS, vec![row(1, 100.0, 5000.0)]).unwrap();
        let cheap = RelocationAnalyzer::new(CostConfig::new(10, 1000).unwrap());
        let out = cheap.analyze(&table).unwrap();
        assert_eq!(out[0].net_gain, 3000.0);
    }

    #[test]
    fn missing_values_and_car_id_column() {
        let table = Table::from_rows(
            &COLUMNS[1..],
            vec![
                vec![Cell::from("A"), Cell::from("B"), Cell::Empty, Cell::from(9000.0)],
                vec![Cell::from("A"), Cell::from("C"), Cell::from(1.0), Cell::from(9000.0)],
            ],
        )
        .unwrap();
        let out = analyzer().analyze(&table).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].car_id, None);
        assert_eq!(out[0].dest_city.as_deref(), Some("C"));
    }

    #[test]
    fn text_distance_is_invalid_data() {
        let mut bad = row(1, 0.0, 8000.0);
        bad[3] = Cell::from("100km");
        let table = Table::from_rows(&COLUMNS, vec![bad]).unwrap();
        assert!(matches!(
            analyzer().analyze(&table),
            Err(AnalysisError::InvalidNumber { row: 0, .. })
        ));
    }
}
