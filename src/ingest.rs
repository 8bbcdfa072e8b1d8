// Loading the inventory snapshot into a Table
use crate::model::{Cell, Table, TableError};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// Tokens read as a missing value, as spreadsheet exports usually write them.
const NA_TOKENS: [&str; 9] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "<NA>"];

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("input has more than {limit} rows")]
    TooLarge { limit: usize },
}

#[async_trait]
pub trait TableSource: Send + Sync {
    async fn load(&self) -> Result<Table, IngestError>;
}

/// Reads a headed CSV file.
pub struct CsvSource {
    path: PathBuf,
    max_rows: usize,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>, max_rows: usize) -> Self {
        Self {
            path: path.into(),
            max_rows,
        }
    }
}

#[async_trait]
impl TableSource for CsvSource {
    async fn load(&self) -> Result<Table, IngestError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let table = parse_csv(&bytes, self.max_rows)?;
        info!(
            "Loaded {} rows, {} columns from {}",
            table.len(),
            table.columns().len(),
            self.path.display()
        );
        Ok(table)
    }
}

pub fn parse_csv(bytes: &[u8], max_rows: usize) -> Result<Table, IngestError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if rows.len() == max_rows {
            return Err(IngestError::TooLarge { limit: max_rows });
        }
        rows.push(record.iter().map(parse_cell).collect());
    }
    Ok(Table::new(columns, rows)?)
}

pub fn parse_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if NA_TOKENS.contains(&trimmed) {
        return Cell::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(n) => Cell::Number(n),
        Err(_) => Cell::Text(raw.to_string()),
    }
}
