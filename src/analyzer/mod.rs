// Analyzer module: one submodule per decision-support view, plus the shared stage contract.

pub mod aging_risk;
pub mod demand_map;
pub mod market_gap;
pub mod price_prediction;
pub mod relocation;

pub use aging_risk::AgingRiskAnalyzer;
pub use demand_map::DemandMapAnalyzer;
pub use market_gap::MarketGapAnalyzer;
pub use price_prediction::PricePredictor;
pub use relocation::RelocationAnalyzer;

use crate::model::{AnalysisError, Table};
use crate::schema;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Trait defining one independently runnable analysis stage.
pub trait Analyzer {
    type Output;

    fn name(&self) -> &'static str;

    /// Columns that must exist before `analyze` is attempted.
    fn required_columns(&self) -> &'static [&'static str];

    fn analyze(&self, table: &Table) -> Result<Self::Output, AnalysisError>;

    fn can_run(&self, table: &Table) -> bool {
        schema::validate(table, self.required_columns())
    }
}

/// Why a feature produced no output even though nothing went wrong.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "columns", rename_all = "snake_case")]
pub enum SkipReason {
    MissingColumns(Vec<String>),
    MissingTarget,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingColumns(cols) => write!(f, "Columns required: {}", cols.join(", ")),
            SkipReason::MissingTarget => f.write_str("Need either 'expected_price' or 'price' column"),
        }
    }
}

/// Result of running one stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeatureOutcome<T> {
    Ready { rows: T },
    Skipped { reason: SkipReason },
    Failed { reason: String },
}

impl<T> FeatureOutcome<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            FeatureOutcome::Ready { rows } => Some(rows),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, FeatureOutcome::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FeatureOutcome::Failed { .. })
    }
}

/// Runs a stage against the table and folds every non-fatal condition into an outcome.
pub fn evaluate<A, T>(analyzer: &A, table: &Table) -> FeatureOutcome<Vec<T>>
where
    A: Analyzer<Output = Vec<T>>,
{
    let missing = schema::missing_columns(table, analyzer.required_columns());
    if !missing.is_empty() {
        warn!(
            "[{}] skipped, columns required: {} (missing: {})",
            analyzer.name(),
            analyzer.required_columns().join(", "),
            missing.join(", ")
        );
        return FeatureOutcome::Skipped {
            reason: SkipReason::MissingColumns(
                analyzer.required_columns().iter().map(|c| c.to_string()).collect(),
            ),
        };
    }

    match analyzer.analyze(table) {
        Ok(rows) => {
            info!("[{}] produced {} rows", analyzer.name(), rows.len());
            FeatureOutcome::Ready { rows }
        }
        Err(AnalysisError::MissingTarget) => {
            warn!("[{}] skipped: {}", analyzer.name(), AnalysisError::MissingTarget);
            FeatureOutcome::Skipped {
                reason: SkipReason::MissingTarget,
            }
        }
        Err(AnalysisError::MissingColumns(cols)) => {
            warn!("[{}] skipped, missing: {}", analyzer.name(), cols.join(", "));
            FeatureOutcome::Skipped {
                reason: SkipReason::MissingColumns(cols),
            }
        }
        Err(e) => {
            warn!("[{}] invalid data: {}", analyzer.name(), e);
            FeatureOutcome::Failed {
                reason: format!("invalid data: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;

    struct Doubler;

    impl Analyzer for Doubler {
        type Output = Vec<f64>;

        fn name(&self) -> &'static str {
            "doubler"
        }

        fn required_columns(&self) -> &'static [&'static str] {
            &["x"]
        }

        fn analyze(&self, table: &Table) -> Result<Vec<f64>, AnalysisError> {
            let x = table.require("x")?;
            let mut out = Vec::new();
            for row in 0..table.len() {
                if let Some(v) = table.number(row, x)? {
                    out.push(v * 2.0);
                }
            }
            Ok(out)
        }
    }

    #[test]
    fn ready_when_columns_present() {
        let table = Table::from_rows(&["x"], vec![vec![Cell::from(2.0)], vec![Cell::Empty]]).unwrap();
        assert_eq!(evaluate(&Doubler, &table), FeatureOutcome::Ready { rows: vec![4.0] });
        assert!(Doubler.can_run(&table));
    }

    #[test]
    fn skipped_with_required_set_when_column_absent() {
        let table = Table::from_rows(&["y"], vec![]).unwrap();
        let outcome = evaluate(&Doubler, &table);
        assert_eq!(
            outcome,
            FeatureOutcome::Skipped {
                reason: SkipReason::MissingColumns(vec!["x".into()])
            }
        );
        assert!(outcome.is_skipped());
        assert!(!Doubler.can_run(&table));
    }

    #[test]
    fn failed_on_malformed_numbers() {
        let table = Table::from_rows(&["x"], vec![vec![Cell::from("ten")]]).unwrap();
        let outcome = evaluate(&Doubler, &table);
        assert!(outcome.is_failed());
        assert_eq!(outcome.ready(), None);
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let skipped: FeatureOutcome<Vec<f64>> = FeatureOutcome::Skipped {
            reason: SkipReason::MissingTarget,
        };
        let json = serde_json::to_value(&skipped).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["reason"]["kind"], "missing_target");

        let ready = FeatureOutcome::Ready { rows: vec![1.0] };
        assert_eq!(serde_json::to_value(&ready).unwrap()["rows"][0], 1.0);
    }
}
