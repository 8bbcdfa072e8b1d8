use crate::analyzer::Analyzer;
use crate::model::{AnalysisError, PricePrediction, Table};
use crate::regression::{BoostingParams, GradientBoostingRegressor};
use tracing::{debug, info};

pub const FEATURE_COLUMNS: [&str; 2] = ["past_demand", "days_on_platform"];

/// Where the training label comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceTarget {
    /// `expected_price` used as is.
    Expected(usize),
    /// `price` scaled by the markup, used when no explicit target exists.
    Proxy { column: usize, markup: f64 },
}

/// Fits a boosted-tree model on `[past_demand, days_on_platform]` and scores every row.
///
/// The model is fit and evaluated on the same rows, so predictions describe the
/// uploaded snapshot rather than a validated forecast.
#[derive(Debug, Clone)]
pub struct PricePredictor {
    params: BoostingParams,
    markup: f64,
}

impl Default for PricePredictor {
    fn default() -> Self {
        Self::new(BoostingParams::default(), 1.05)
    }
}

impl PricePredictor {
    pub fn new(params: BoostingParams, markup: f64) -> Self {
        Self { params, markup }
    }

    /// `expected_price` wins over `price`; neither means there is nothing to learn from.
    pub fn resolve_target(&self, table: &Table) -> Option<PriceTarget> {
        if let Some(col) = table.column_index("expected_price") {
            return Some(PriceTarget::Expected(col));
        }
        table.column_index("price").map(|column| PriceTarget::Proxy {
            column,
            markup: self.markup,
        })
    }

    fn target_value(table: &Table, row: usize, target: PriceTarget) -> Result<f64, AnalysisError> {
        match target {
            PriceTarget::Expected(col) => table.required_number(row, col),
            PriceTarget::Proxy { column, markup } => Ok(table.required_number(row, column)? * markup),
        }
    }
}

impl Analyzer for PricePredictor {
    type Output = Vec<PricePrediction>;

    fn name(&self) -> &'static str {
        "price_prediction"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &FEATURE_COLUMNS
    }

    fn analyze(&self, table: &Table) -> Result<Self::Output, AnalysisError> {
        let Some(target) = self.resolve_target(table) else {
            return Err(AnalysisError::MissingTarget);
        };
        let past_demand = table.require("past_demand")?;
        let days_on_platform = table.require("days_on_platform")?;
        if table.is_empty() {
            return Ok(Vec::new());
        }

        let mut features = Vec::with_capacity(table.len());
        let mut targets = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            features.push(vec![
                table.required_number(row, past_demand)?,
                table.required_number(row, days_on_platform)?,
            ]);
            targets.push(Self::target_value(table, row, target)?);
        }
        debug!("Fitting price model on {} rows, target {:?}", targets.len(), target);

        let model = GradientBoostingRegressor::fit(&features, &targets, &self.params)?;
        let predicted = model.predict(&features)?;
        info!("Price model fitted with {} stages", model.n_estimators());

        let car_id = table.column_index("car_id");
        let city = table.column_index("city");
        Ok(predicted
            .into_iter()
            .enumerate()
            .map(|(row, predicted_price)| PricePrediction {
                car_id: table.optional_label(row, car_id),
                city: table.optional_label(row, city),
                predicted_price,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;

    fn rows(price: impl Fn(usize) -> Cell) -> Vec<Vec<Cell>> {
        (0..12)
            .map(|i| {
                vec![
                    Cell::from(i as i64 + 100),
                    Cell::from(if i % 2 == 0 { "Delhi" } else { "Pune" }),
                    Cell::from((i * 3) as f64),
                    Cell::from((40 - i) as f64),
                    price(i),
                ]
            })
            .collect()
    }

    fn fast_params() -> BoostingParams {
        BoostingParams {
            n_estimators: 30,
            ..BoostingParams::default()
        }
    }

    #[test]
    fn one_prediction_per_row() {
        let t = Table::from_rows(
            &["car_id", "city", "past_demand", "days_on_platform", "expected_price"],
            rows(|i| Cell::from(400_000.0 + 10_000.0 * i as f64)),
        )
        .unwrap();
        let out = PricePredictor::new(fast_params(), 1.05).analyze(&t).unwrap();
        assert_eq!(out.len(), t.len());
        assert_eq!(out[0].car_id.as_deref(), Some("100"));
        assert_eq!(out[1].city.as_deref(), Some("Pune"));
        assert!(out.iter().all(|p| p.predicted_price.is_finite()));
    }

    #[test]
    fn proxy_target_applies_markup() {
        let t = Table::from_rows(
            &["car_id", "city", "past_demand", "days_on_platform", "price"],
            rows(|_| Cell::from(200_000.0)),
        )
        .unwrap();
        let out = PricePredictor::default().analyze(&t).unwrap();
        for p in out {
            assert!((p.predicted_price - 210_000.0).abs() < 1e-6);
        }
    }

    #[test]
    fn expected_price_takes_precedence() {
        let t = Table::from_rows(
            &["past_demand", "days_on_platform", "price", "expected_price"],
            vec![
                vec![Cell::from(1.0), Cell::from(1.0), Cell::from(10.0), Cell::from(500.0)],
                vec![Cell::from(2.0), Cell::from(2.0), Cell::from(10.0), Cell::from(500.0)],
            ],
        )
        .unwrap();
        let predictor = PricePredictor::default();
        assert_eq!(predictor.resolve_target(&t), Some(PriceTarget::Expected(3)));
        let out = predictor.analyze(&t).unwrap();
        assert!((out[0].predicted_price - 500.0).abs() < 1e-9);
    }

    #[test]
    fn no_target_column_is_reported() {
        let t = Table::from_rows(
            &["past_demand", "days_on_platform"],
            vec![vec![Cell::from(1.0), Cell::from(2.0)]],
        )
        .unwrap();
        assert_eq!(PricePredictor::default().analyze(&t), Err(AnalysisError::MissingTarget));
    }

    #[test]
    fn missing_feature_value_fails() {
        let t = Table::from_rows(
            &["past_demand", "days_on_platform", "price"],
            vec![vec![Cell::Empty, Cell::from(2.0), Cell::from(3.0)]],
        )
        .unwrap();
        assert!(matches!(
            PricePredictor::default().analyze(&t),
            Err(AnalysisError::MissingValue { row: 0, .. })
        ));
    }

    #[test]
    fn reproducible_for_a_fixed_seed() {
        let t = Table::from_rows(
            &["car_id", "city", "past_demand", "days_on_platform", "price"],
            rows(|i| Cell::from(100_000.0 + (i * i) as f64 * 1_000.0)),
        )
        .unwrap();
        let params = BoostingParams {
            subsample: 0.5,
            seed: 3,
            ..fast_params()
        };
        let a = PricePredictor::new(params.clone(), 1.05).analyze(&t).unwrap();
        let b = PricePredictor::new(params, 1.05).analyze(&t).unwrap();
        assert_eq!(a, b);
    }
}
