use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::Deserialize;
use tracing::debug;

use super::tree::{RegressionTree, TreeParams};
use super::{RegressionError, check_dataset};

/// Hyperparameters of the boosted ensemble. Defaults follow the usual
/// least-squares gradient-boosting defaults, plus a fixed seed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub subsample: f64,
    pub seed: u64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
            subsample: 1.0,
            seed: 42,
        }
    }
}

impl BoostingParams {
    pub fn validate(&self) -> Result<(), RegressionError> {
        if self.n_estimators == 0 {
            return Err(RegressionError::InvalidParams("n_estimators must be positive".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(RegressionError::InvalidParams("learning_rate must be positive".into()));
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(RegressionError::InvalidParams("subsample must be in (0, 1]".into()));
        }
        if self.min_samples_leaf == 0 {
            return Err(RegressionError::InvalidParams("min_samples_leaf must be positive".into()));
        }
        if self.min_samples_split < 2 {
            return Err(RegressionError::InvalidParams("min_samples_split must be at least 2".into()));
        }
        Ok(())
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

/// Least-squares gradient boosting over regression trees.
#[derive(Debug, Clone)]
pub struct GradientBoostingRegressor {
    init: f64,
    learning_rate: f64,
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl GradientBoostingRegressor {
    /// Fits the ensemble. Each stage fits a tree to the current residuals; the same seed
    /// on the same data always yields the same model.
    pub fn fit(
        features: &[Vec<f64>],
        targets: &[f64],
        params: &BoostingParams,
    ) -> Result<Self, RegressionError> {
        params.validate()?;
        let n_features = check_dataset(features, targets)?;
        let n = targets.len();

        let init = targets.iter().sum::<f64>() / n as f64;
        let mut current = vec![init; n];
        let mut residuals = vec![0.0; n];
        let mut rng = StdRng::seed_from_u64(params.seed);
        let tree_params = params.tree_params();
        let bag_size = ((params.subsample * n as f64) as usize).clamp(1, n);
        let mut trees = Vec::with_capacity(params.n_estimators);

        for stage in 0..params.n_estimators {
            for i in 0..n {
                residuals[i] = targets[i] - current[i];
            }

            let samples: Vec<usize> = if bag_size < n {
                let mut picked = index::sample(&mut rng, n, bag_size).into_vec();
                picked.sort_unstable();
                picked
            } else {
                (0..n).collect()
            };

            let tree = RegressionTree::fit(features, &residuals, &samples, &tree_params, &mut rng);
            for (i, x) in features.iter().enumerate() {
                current[i] += params.learning_rate * tree.predict(x);
            }
            if stage == 0 || stage + 1 == params.n_estimators {
                let mse = targets
                    .iter()
                    .zip(&current)
                    .map(|(y, p)| (y - p).powi(2))
                    .sum::<f64>()
                    / n as f64;
                debug!("Boosting stage {}: train MSE = {:.4}", stage + 1, mse);
            }
            trees.push(tree);
        }

        Ok(Self {
            init,
            learning_rate: params.learning_rate,
            n_features,
            trees,
        })
    }

    pub fn predict_one(&self, x: &[f64]) -> f64 {
        self.trees
            .iter()
            .fold(self.init, |acc, tree| acc + self.learning_rate * tree.predict(x))
    }

    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, RegressionError> {
        features
            .iter()
            .enumerate()
            .map(|(row, x)| {
                if x.len() != self.n_features {
                    return Err(RegressionError::FeatureCount {
                        row,
                        expected: self.n_features,
                        found: x.len(),
                    });
                }
                Ok(self.predict_one(x))
            })
            .collect()
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }
}
