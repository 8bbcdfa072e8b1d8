use crate::analyzer::{
    AgingRiskAnalyzer, Analyzer, DemandMapAnalyzer, FeatureOutcome, MarketGapAnalyzer,
    PricePredictor, RelocationAnalyzer, evaluate,
};
use crate::config::{AnalysisConfig, CostConfig};
use crate::geocode::CityCoordinates;
use crate::model::{
    CityDemandPoint, MarketGapRow, PricePrediction, RelocationSuggestion, RiskRow, Table,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Everything one run produced, one outcome per feature.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub input_rows: usize,
    pub input_columns: Vec<String>,
    pub relocation: FeatureOutcome<Vec<RelocationSuggestion>>,
    pub market_gap: FeatureOutcome<Vec<MarketGapRow>>,
    pub aging_risk: FeatureOutcome<Vec<RiskRow>>,
    pub pricing: FeatureOutcome<Vec<PricePrediction>>,
    pub demand_map: FeatureOutcome<Vec<CityDemandPoint>>,
}

/// Runs every analyzer over one shared, read-only table.
#[derive(Debug, Clone)]
pub struct Engine {
    costs: CostConfig,
    analysis: AnalysisConfig,
    coordinates: Arc<CityCoordinates>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(CostConfig::default(), AnalysisConfig::default(), CityCoordinates::default())
    }
}

impl Engine {
    pub fn new(costs: CostConfig, analysis: AnalysisConfig, coordinates: CityCoordinates) -> Self {
        Self {
            costs,
            analysis,
            coordinates: Arc::new(coordinates),
        }
    }

    /// Analyzers run concurrently on the blocking pool; a panic in one only fails
    /// that feature.
    pub async fn run(&self, table: Arc<Table>) -> AnalysisReport {
        info!(
            "Analyzing {} rows ({} columns)...",
            table.len(),
            table.columns().len()
        );

        let (relocation, market_gap, aging_risk, pricing, demand_map) = futures::join!(
            spawn_feature(RelocationAnalyzer::new(self.costs), table.clone()),
            spawn_feature(MarketGapAnalyzer::new(), table.clone()),
            spawn_feature(AgingRiskAnalyzer::new(self.analysis.aging_threshold_days), table.clone()),
            spawn_feature(
                PricePredictor::new(self.analysis.model.clone(), self.analysis.price_markup),
                table.clone()
            ),
            spawn_feature(DemandMapAnalyzer::new(self.coordinates.clone()), table.clone()),
        );

        AnalysisReport {
            generated_at: Utc::now(),
            input_rows: table.len(),
            input_columns: table.columns().to_vec(),
            relocation,
            market_gap,
            aging_risk,
            pricing,
            demand_map,
        }
    }
}

async fn spawn_feature<A, T>(analyzer: A, table: Arc<Table>) -> FeatureOutcome<Vec<T>>
where
    A: Analyzer<Output = Vec<T>> + Send + 'static,
    T: Send + 'static,
{
    let name = analyzer.name();
    match tokio::task::spawn_blocking(move || evaluate(&analyzer, &table)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("[{}] analysis task aborted: {}", name, e);
            FeatureOutcome::Failed {
                reason: format!("analysis task aborted: {}", e),
            }
        }
    }
}
