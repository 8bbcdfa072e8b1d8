// Writing and summarising analysis reports
use crate::analyzer::FeatureOutcome;
use crate::engine::AnalysisReport;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes `report.json` plus one CSV per feature that produced rows.
/// Returns the paths written.
pub fn write_report(dir: &Path, report: &AnalysisReport) -> Result<Vec<PathBuf>, ReportError> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let json_path = dir.join("report.json");
    fs::write(&json_path, serde_json::to_string_pretty(report)?)?;
    written.push(json_path);

    written.extend(write_feature_csv(dir, "relocation", &report.relocation)?);
    written.extend(write_feature_csv(dir, "market_gap", &report.market_gap)?);
    written.extend(write_feature_csv(dir, "aging_risk", &report.aging_risk)?);
    written.extend(write_feature_csv(dir, "pricing", &report.pricing)?);
    written.extend(write_feature_csv(dir, "demand_map", &report.demand_map)?);

    info!("Report written to {}", dir.display());
    Ok(written)
}

fn write_feature_csv<T: Serialize>(
    dir: &Path,
    name: &str,
    outcome: &FeatureOutcome<Vec<T>>,
) -> Result<Option<PathBuf>, ReportError> {
    let Some(rows) = outcome.ready() else {
        return Ok(None);
    };
    let path = dir.join(format!("{}.csv", name));
    let mut wtr = csv::Writer::from_path(&path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(Some(path))
}

/// Logs one line per feature: the row count, or why there is none.
pub fn log_summary(report: &AnalysisReport) {
    info!(
        "Report for {} rows generated at {}",
        report.input_rows, report.generated_at
    );
    log_outcome("Suggested relocations (profitable only)", &report.relocation);
    log_outcome("High-gap segments", &report.market_gap);
    log_outcome("Cars over the aging threshold", &report.aging_risk);
    log_outcome("Predicted optimal prices", &report.pricing);
    log_outcome("City demand points", &report.demand_map);
}

fn log_outcome<T>(title: &str, outcome: &FeatureOutcome<Vec<T>>) {
    match outcome {
        FeatureOutcome::Ready { rows } => info!("{}: {}", title, rows.len()),
        FeatureOutcome::Skipped { reason } => warn!("{}: skipped ({})", title, reason),
        FeatureOutcome::Failed { reason } => warn!("{}: failed ({})", title, reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SkipReason;
    use crate::model::{MarketGapRow, RelocationSuggestion};
    use chrono::Utc;

    fn report() -> AnalysisReport {
        AnalysisReport {
            generated_at: Utc::now(),
            input_rows: 1,
            input_columns: vec!["car_id".into()],
            relocation: FeatureOutcome::Ready {
                rows: vec![RelocationSuggestion {
                    car_id: Some("1".into()),
                    source_city: Some("Delhi".into()),
                    dest_city: None,
                    relocation_cost: 5500.0,
                    net_gain: 2500.0,
                }],
            },
            market_gap: FeatureOutcome::Ready {
                rows: Vec::<MarketGapRow>::new(),
            },
            aging_risk: FeatureOutcome::Skipped {
                reason: SkipReason::MissingColumns(vec!["days_in_inventory".into()]),
            },
            pricing: FeatureOutcome::Skipped {
                reason: SkipReason::MissingTarget,
            },
            demand_map: FeatureOutcome::Failed {
                reason: "invalid data".into(),
            },
        }
    }

    #[test]
    fn writes_json_and_ready_csvs() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_report(dir.path(), &report()).unwrap();
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["report.json", "relocation.csv", "market_gap.csv"]);

        let csv = fs::read_to_string(dir.path().join("relocation.csv")).unwrap();
        assert_eq!(
            csv,
            "car_id,source_city,dest_city,relocation_cost,net_gain\n1,Delhi,,5500.0,2500.0\n"
        );

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
        assert_eq!(json["aging_risk"]["status"], "skipped");
        assert_eq!(json["demand_map"]["status"], "failed");
        assert_eq!(json["relocation"]["rows"][0]["net_gain"], 2500.0);
    }
}
