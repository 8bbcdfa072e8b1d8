// Core structs: Cell, Table, derived output rows and error types
use serde::Serialize;
use std::fmt;

use crate::regression::RegressionError;

/// A single value of the input table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// Column-named, row-major snapshot of the uploaded inventory.
///
/// Analyzers only ever borrow it; derived values live in their own outputs.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, TableError> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::RaggedRow {
                    row: i,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Convenience constructor used by tests and in-memory callers.
    pub fn from_rows(columns: &[&str], rows: Vec<Vec<Cell>>) -> Result<Self, TableError> {
        Self::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of a column the caller already validated; reports it as missing otherwise.
    pub fn require(&self, name: &str) -> Result<usize, AnalysisError> {
        self.column_index(name)
            .ok_or_else(|| AnalysisError::MissingColumns(vec![name.to_string()]))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.rows[row][col]
    }

    /// Numeric value of a cell. `Empty` is a missing value, text is invalid data.
    pub fn number(&self, row: usize, col: usize) -> Result<Option<f64>, AnalysisError> {
        match self.cell(row, col) {
            Cell::Number(n) if n.is_nan() => Ok(None),
            Cell::Number(n) => Ok(Some(*n)),
            Cell::Empty => Ok(None),
            Cell::Text(value) => Err(AnalysisError::InvalidNumber {
                column: self.columns[col].clone(),
                row,
                value: value.clone(),
            }),
        }
    }

    /// Like [`Table::number`] but a missing value is an error too.
    pub fn required_number(&self, row: usize, col: usize) -> Result<f64, AnalysisError> {
        self.number(row, col)?.ok_or_else(|| AnalysisError::MissingValue {
            column: self.columns[col].clone(),
            row,
        })
    }

    /// Text rendering of a cell for ids and grouping keys.
    pub fn label(&self, row: usize, col: usize) -> Option<String> {
        match self.cell(row, col) {
            Cell::Empty => None,
            Cell::Number(n) if n.is_nan() => None,
            cell => Some(cell.to_string()),
        }
    }

    /// Label lookup for a projection column that may not exist at all.
    pub fn optional_label(&self, row: usize, col: Option<usize>) -> Option<String> {
        col.and_then(|c| self.label(row, c))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RelocationSuggestion {
    pub car_id: Option<String>,
    pub source_city: Option<String>,
    pub dest_city: Option<String>,
    pub relocation_cost: f64,
    pub net_gain: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarketGapRow {
    pub city: String,
    pub car_type: String,
    pub demand_total: f64,
    pub supply_total: f64,
    pub gap: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RiskRow {
    pub car_id: Option<String>,
    pub city: Option<String>,
    pub days_in_inventory: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PricePrediction {
    pub car_id: Option<String>,
    pub city: Option<String>,
    pub predicted_price: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CityDemandPoint {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub demand_total: f64,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TableError {
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AnalysisError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("need either 'expected_price' or 'price' column")]
    MissingTarget,
    #[error("invalid numeric value {value:?} in column '{column}' at row {row}")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },
    #[error("missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },
    #[error("model fit failed: {0}")]
    Regression(#[from] RegressionError),
}
