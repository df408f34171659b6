//! Bagged decision-tree ensemble.
//!
//! [`RandomForest<Unfitted>`] carries only its [`ForestConfig`]. Calling
//! [`RandomForest::fit`] grows `n_trees` [`DecisionTree`]s, each on its own
//! bootstrap sample, and returns a [`RandomForest<Fitted>`] which can vote.
//!
//! Randomness comes from a master [`StdRng`] seeded with `config.seed`; it
//! draws one seed per tree, so the same config on the same data always grows
//! the same forest.
//!
//! # Example
//!
//! ```rust
//! use ndarray::array;
//! use potability::model::{RandomForest, Unfitted};
//! use potability::trainer::ForestConfig;
//!
//! let x = array![[1.0, 0.0], [2.0, 0.0], [8.0, 1.0], [9.0, 1.0]];
//! let y = [0u8, 0, 1, 1];
//!
//! let forest = RandomForest::<Unfitted>::new(ForestConfig::builder().n_trees(15).build())
//!     .fit_matrix(x.view(), &y)
//!     .unwrap();
//!
//! let votes = forest.predict_votes(&[8.5, 1.0]);
//! assert_eq!(votes.n_trees(), 15);
//! assert_eq!(votes.majority(), 1);
//! ```

use crate::dataset::TrainingDataset;
use crate::error::{PotabilityError, Result};
use crate::model::state::{Fitted, Unfitted};
use crate::model::tree::{DecisionTree, TreeParams};
use crate::model::InferenceModel;
use crate::trainer::config::{ClassWeight, ForestConfig};
use log::debug;
use ndarray::{Array1, Array2, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::marker::PhantomData;

/// Votes cast by the trees for one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteCount {
    votes: [usize; 2],
}

impl VoteCount {
    /// Votes for class 0 and class 1.
    pub fn votes(&self) -> [usize; 2] {
        self.votes
    }

    pub fn n_trees(&self) -> usize {
        self.votes[0] + self.votes[1]
    }

    /// `[p0, p1]`, each the fraction of trees voting for that class.
    pub fn probabilities(&self) -> [f64; 2] {
        let n = self.n_trees();
        if n == 0 {
            return [0.5, 0.5];
        }
        let p1 = self.votes[1] as f64 / n as f64;
        [1.0 - p1, p1]
    }

    /// Class 1 wins ties.
    pub fn majority(&self) -> u8 {
        u8::from(self.votes[1] >= self.votes[0])
    }
}

/// Ensemble of CART trees, typed by training state.
#[derive(Clone, Debug)]
pub struct RandomForest<S> {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    n_features: usize,
    importances: Vec<f64>,
    _state: PhantomData<S>,
}

/// Per-sample weights `n / (n_present_classes * count_c)`.
fn balanced_weights(y: &[u8]) -> [f64; 2] {
    let counts = y.iter().fold([0usize; 2], |mut acc, &l| {
        acc[usize::from(l)] += 1;
        acc
    });
    let present = counts.iter().filter(|&&c| c > 0).count().max(1);
    let n = y.len() as f64;
    counts.map(|c| {
        if c == 0 {
            0.0
        } else {
            n / (present as f64 * c as f64)
        }
    })
}

impl RandomForest<Unfitted> {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            n_features: 0,
            importances: Vec::new(),
            _state: PhantomData,
        }
    }

    /// Train on an imputed dataset.
    pub fn fit(self, dataset: &TrainingDataset) -> Result<RandomForest<Fitted>> {
        self.fit_matrix(dataset.features().view(), dataset.labels())
    }

    /// Train on a raw matrix with 0/1 labels.
    ///
    /// # Errors
    /// - [`PotabilityError::InvalidParameter`] for an invalid config or label count.
    /// - [`PotabilityError::EmptyData`] for no rows or no columns.
    /// - [`PotabilityError::MissingValues`] if `x` contains `NaN`.
    /// - [`PotabilityError::InvalidLabel`] for a label other than 0 or 1.
    pub fn fit_matrix(self, x: ArrayView2<'_, f64>, y: &[u8]) -> Result<RandomForest<Fitted>> {
        let config = self.config;
        config.validate()?;

        let (n_samples, n_features) = x.dim();
        if n_samples == 0 || n_features == 0 {
            return Err(PotabilityError::EmptyData(format!(
                "cannot fit a forest on a {n_samples}x{n_features} matrix"
            )));
        }
        if y.len() != n_samples {
            return Err(PotabilityError::InvalidParameter(format!(
                "{n_samples} feature rows but {} labels",
                y.len()
            )));
        }
        if x.iter().any(|v| v.is_nan()) {
            return Err(PotabilityError::MissingValues(
                "training matrix contains NaN; impute first".to_string(),
            ));
        }
        if let Some(row) = y.iter().position(|&l| l > 1) {
            return Err(PotabilityError::InvalidLabel {
                row: row + 1,
                value: y[row].to_string(),
            });
        }

        let class_weight = match config.class_weight {
            ClassWeight::Balanced => balanced_weights(y),
            ClassWeight::Uniform => [1.0, 1.0],
        };
        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            min_samples_leaf: config.min_samples_leaf,
            max_features: config.max_features.resolve(n_features),
        };

        let mut master = StdRng::seed_from_u64(config.seed);
        let mut weights = vec![0.0; n_samples];
        let mut trees = Vec::with_capacity(config.n_trees);
        let mut importances = vec![0.0; n_features];

        for t in 0..config.n_trees {
            let mut rng = StdRng::seed_from_u64(master.gen());

            let mut multiplicity = vec![0usize; n_samples];
            if config.bootstrap {
                for _ in 0..n_samples {
                    multiplicity[rng.gen_range(0..n_samples)] += 1;
                }
            } else {
                multiplicity.fill(1);
            }

            let rows: Vec<usize> = (0..n_samples).filter(|&r| multiplicity[r] > 0).collect();
            for (r, w) in weights.iter_mut().enumerate() {
                *w = class_weight[usize::from(y[r])] * multiplicity[r] as f64;
            }

            let tree = DecisionTree::fit(x, y, &weights, rows, &params, &mut rng);
            debug!(
                "tree {}/{}: {} nodes, depth {}",
                t + 1,
                config.n_trees,
                tree.n_nodes(),
                tree.depth()
            );
            for (acc, v) in importances.iter_mut().zip(tree.feature_importances()) {
                *acc += v;
            }
            trees.push(tree);
        }

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|v| *v /= total);
        }

        Ok(RandomForest {
            config,
            trees,
            n_features,
            importances,
            _state: PhantomData,
        })
    }
}

impl<S> RandomForest<S> {
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}

impl RandomForest<Fitted> {
    /// Count tree votes for one sample. `features` must follow the training column order.
    pub fn predict_votes(&self, features: &[f64]) -> VoteCount {
        let mut votes = [0usize; 2];
        for tree in &self.trees {
            votes[usize::from(tree.predict(features))] += 1;
        }
        VoteCount { votes }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Mean decrease in impurity per feature, summing to 1 (all zeros if no tree split).
    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }
}

/// Single sample: feature slice → votes. Batch: one row per sample → `p1` per row.
impl InferenceModel for RandomForest<Fitted> {
    type InputSingle = [f64];
    type OutputSingle = VoteCount;
    type InputBatch = Array2<f64>;
    type OutputBatch = Array1<f64>;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle {
        self.predict_votes(input)
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch {
        input
            .rows()
            .into_iter()
            .map(|row| {
                let values: Vec<f64> = row.iter().copied().collect();
                self.predict_votes(&values).probabilities()[1]
            })
            .collect()
    }
}
