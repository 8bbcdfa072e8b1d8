pub mod analyzer;
pub mod config;
pub mod engine;
pub mod geocode;
pub mod ingest;
pub mod model;
pub mod regression;
pub mod report;
pub mod schema;

pub use config::{AppConfig, CostConfig, load_config};
pub use engine::{AnalysisReport, Engine};
pub use model::{Cell, Table};
