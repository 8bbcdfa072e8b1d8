use rand::Rng;
use rand::seq::SliceRandom;

/// Growth limits for a single regression tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    sse: f64,
}

/// Least-squares regression tree stored as a flat node arena.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Grows a tree on the given sample indices. Feature order at each node is shuffled
    /// with `rng`, which only matters when two splits are equally good.
    pub fn fit<R: Rng>(
        features: &[Vec<f64>],
        targets: &[f64],
        samples: &[usize],
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let mut tree = RegressionTree { nodes: Vec::new() };
        let width = features.first().map_or(0, |row| row.len());
        let mut order: Vec<usize> = (0..width).collect();
        tree.grow(features, targets, samples.to_vec(), 0, params, &mut order, rng);
        tree
    }

    pub fn predict(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    #[allow(clippy::too_many_arguments)]
    fn grow<R: Rng>(
        &mut self,
        features: &[Vec<f64>],
        targets: &[f64],
        samples: Vec<usize>,
        depth: usize,
        params: &TreeParams,
        order: &mut [usize],
        rng: &mut R,
    ) -> usize {
        let id = self.nodes.len();
        let (mean, sse) = mean_and_sse(targets, &samples);
        self.nodes.push(Node::Leaf { value: mean });

        if depth >= params.max_depth
            || samples.len() < params.min_samples_split
            || samples.len() < 2 * params.min_samples_leaf
            || sse <= f64::EPSILON
        {
            return id;
        }

        order.shuffle(rng);
        let Some(best) = best_split(features, targets, &samples, order, params.min_samples_leaf)
        else {
            return id;
        };
        if best.sse >= sse {
            return id;
        }

        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| features[i][best.feature] <= best.threshold);

        let left = self.grow(features, targets, left_samples, depth + 1, params, order, rng);
        let right = self.grow(features, targets, right_samples, depth + 1, params, order, rng);
        self.nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        id
    }
}

fn mean_and_sse(targets: &[f64], samples: &[usize]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().map(|&i| targets[i]).sum::<f64>() / n;
    let sse = samples.iter().map(|&i| (targets[i] - mean).powi(2)).sum();
    (mean, sse)
}

/// Scans every feature in `order` for the threshold minimising the summed squared error
/// of both children. The first strictly better candidate wins ties.
fn best_split(
    features: &[Vec<f64>],
    targets: &[f64],
    samples: &[usize],
    order: &[usize],
    min_leaf: usize,
) -> Option<SplitCandidate> {
    let n = samples.len();
    let total_sum: f64 = samples.iter().map(|&i| targets[i]).sum();
    let total_sq: f64 = samples.iter().map(|&i| targets[i] * targets[i]).sum();
    let mut best: Option<SplitCandidate> = None;

    for &feature in order {
        let mut sorted = samples.to_vec();
        sorted.sort_by(|&a, &b| features[a][feature].total_cmp(&features[b][feature]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for k in 0..n - 1 {
            let y = targets[sorted[k]];
            left_sum += y;
            left_sq += y * y;

            let left_n = k + 1;
            let right_n = n - left_n;
            if left_n < min_leaf || right_n < min_leaf {
                continue;
            }
            let here = features[sorted[k]][feature];
            let next = features[sorted[k + 1]][feature];
            if here == next {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_n as f64)
                + (right_sq - right_sum * right_sum / right_n as f64);

            if best.is_none_or(|b| sse < b.sse) {
                best = Some(SplitCandidate {
                    feature,
                    threshold: here + (next - here) / 2.0,
                    sse,
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn params(max_depth: usize) -> TreeParams {
        TreeParams {
            max_depth,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }

    #[test]
    fn stump_splits_a_step_function() {
        let features: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64]).collect();
        let targets = vec![1.0, 1.0, 1.0, 9.0, 9.0, 9.0];
        let samples: Vec<usize> = (0..6).collect();
        let mut rng = StdRng::seed_from_u64(0);

        let tree = RegressionTree::fit(&features, &targets, &samples, &params(1), &mut rng);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.predict(&[0.0]), 1.0);
        assert_eq!(tree.predict(&[2.4]), 1.0);
        assert_eq!(tree.predict(&[2.6]), 9.0);
    }

    #[test]
    fn constant_targets_make_a_single_leaf() {
        let features: Vec<Vec<f64>> = (0..4).map(|i| vec![i as f64, 1.0]).collect();
        let targets = vec![3.0; 4];
        let samples: Vec<usize> = (0..4).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let tree = RegressionTree::fit(&features, &targets, &samples, &params(3), &mut rng);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.predict(&[10.0, 1.0]), 3.0);
    }

    #[test]
    fn identical_feature_values_cannot_split() {
        let features = vec![vec![5.0]; 3];
        let targets = vec![1.0, 2.0, 3.0];
        let samples: Vec<usize> = (0..3).collect();
        let mut rng = StdRng::seed_from_u64(1);

        let tree = RegressionTree::fit(&features, &targets, &samples, &params(3), &mut rng);
        assert_eq!(tree.leaf_count(), 1);
        assert!((tree.predict(&[5.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn min_samples_leaf_is_respected() {
        let features: Vec<Vec<f64>> = (0..4).map(|i| vec![i as f64]).collect();
        let targets = vec![0.0, 0.0, 0.0, 100.0];
        let samples: Vec<usize> = (0..4).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let p = TreeParams {
            max_depth: 1,
            min_samples_split: 2,
            min_samples_leaf: 2,
        };

        let tree = RegressionTree::fit(&features, &targets, &samples, &p, &mut rng);
        // the outlier cannot be isolated, so it is averaged with its neighbour
        assert_eq!(tree.predict(&[3.0]), 50.0);
        assert_eq!(tree.predict(&[0.0]), 0.0);
    }
}
