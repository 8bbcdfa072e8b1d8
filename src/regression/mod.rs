// Regression module: decision trees and the gradient-boosted ensemble built on them.

pub mod gradient_boosting;
pub mod tree;

pub use gradient_boosting::{BoostingParams, GradientBoostingRegressor};

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum RegressionError {
    #[error("no training samples")]
    EmptyDataset,
    #[error("{features} feature rows but {targets} targets")]
    ShapeMismatch { features: usize, targets: usize },
    #[error("row {row} has {found} features, expected {expected}")]
    FeatureCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("non-finite value at row {row}")]
    NonFinite { row: usize },
    #[error("invalid model parameters: {0}")]
    InvalidParams(String),
}

/// Checks that a feature matrix and its targets line up and hold only finite numbers.
pub(crate) fn check_dataset(features: &[Vec<f64>], targets: &[f64]) -> Result<usize, RegressionError> {
    if features.len() != targets.len() {
        return Err(RegressionError::ShapeMismatch {
            features: features.len(),
            targets: targets.len(),
        });
    }
    let Some(first) = features.first() else {
        return Err(RegressionError::EmptyDataset);
    };
    let width = first.len();
    for (row, (x, y)) in features.iter().zip(targets).enumerate() {
        if x.len() != width {
            return Err(RegressionError::FeatureCount {
                row,
                expected: width,
                found: x.len(),
            });
        }
        if !y.is_finite() || x.iter().any(|v| !v.is_finite()) {
            return Err(RegressionError::NonFinite { row });
        }
    }
    Ok(width)
}
