use inventory_optimizer::config::{AppConfig, load_config};
use inventory_optimizer::engine::Engine;
use inventory_optimizer::geocode::CityCoordinates;
use inventory_optimizer::ingest::{CsvSource, TableSource};
use inventory_optimizer::report::{log_summary, write_report};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config = if Path::new(&config_path).exists() {
        match load_config(&config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Config load error: {}", e);
                return;
            }
        }
    } else {
        warn!("{} not found, using defaults", config_path);
        AppConfig::default()
    };

    info!("🚗 Inventory optimizer starting...");
    info!(
        "Costs: {} per km, {} per car | aging threshold: {} days",
        config.costs.cost_per_km, config.costs.other_costs, config.analysis.aging_threshold_days
    );

    let source = CsvSource::new(&config.input_path, config.max_rows);
    let table = match source.load().await {
        Ok(t) => Arc::new(t),
        Err(e) => {
            error!("Failed to load {}: {}", config.input_path.display(), e);
            return;
        }
    };

    let coordinates = CityCoordinates::with_overrides(&config.city_coordinates);
    let engine = Engine::new(config.costs, config.analysis.clone(), coordinates);
    let report = engine.run(table).await;
    log_summary(&report);

    match write_report(&config.output_dir, &report) {
        Ok(paths) => info!("Wrote {} files", paths.len()),
        Err(e) => error!("Report write failed: {}", e),
    }
}
