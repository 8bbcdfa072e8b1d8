use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::regression::BoostingParams;

pub const COST_PER_KM_RANGE: (u32, u32) = (10, 100);
pub const OTHER_COSTS_RANGE: (u32, u32) = (1000, 10000);

/// Transport cost tunables for the relocation analysis.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct CostConfig {
    pub cost_per_km: u32,
    pub other_costs: u32,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            cost_per_km: 25,
            other_costs: 3000,
        }
    }
}

impl CostConfig {
    pub fn new(cost_per_km: u32, other_costs: u32) -> Result<Self, ConfigError> {
        let cfg = Self {
            cost_per_km,
            other_costs,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("cost_per_km", self.cost_per_km, COST_PER_KM_RANGE)?;
        check_range("other_costs", self.other_costs, OTHER_COSTS_RANGE)
    }

    /// Total cost of moving one car over `distance_km`.
    pub fn relocation_cost(&self, distance_km: f64) -> f64 {
        distance_km * self.cost_per_km as f64 + self.other_costs as f64
    }
}

fn check_range(field: &'static str, value: u32, (min, max): (u32, u32)) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Policy constants of the analyzers.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub aging_threshold_days: f64,
    pub price_markup: f64,
    pub model: BoostingParams,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            aging_threshold_days: 45.0,
            price_markup: 1.05,
            model: BoostingParams::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub max_rows: usize,
    pub costs: CostConfig,
    pub analysis: AnalysisConfig,
    /// Extra or overriding `city -> [latitude, longitude]` entries.
    pub city_coordinates: HashMap<String, (f64, f64)>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("inventory.csv"),
            output_dir: PathBuf::from("reports"),
            max_rows: 200_000,
            costs: CostConfig::default(),
            analysis: AnalysisConfig::default(),
            city_coordinates: HashMap::new(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.costs.validate()?;
        self.analysis
            .model
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if !self.analysis.price_markup.is_finite() || self.analysis.price_markup <= 0.0 {
            return Err(ConfigError::Invalid("price_markup must be positive".into()));
        }
        if !self.analysis.aging_threshold_days.is_finite() {
            return Err(ConfigError::Invalid("aging_threshold_days must be finite".into()));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
}
