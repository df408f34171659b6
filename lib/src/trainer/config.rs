//! Ensemble hyperparameters.

use crate::error::{PotabilityError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How samples are weighted by class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassWeight {
    /// `n_samples / (n_classes * class_count)`: rarer classes weigh more.
    #[default]
    Balanced,
    /// Every sample weighs 1.
    Uniform,
}

/// Number of features examined when searching for a split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// `floor(sqrt(n_features))`, at least 1.
    #[default]
    Sqrt,
    /// `floor(log2(n_features))`, at least 1.
    Log2,
    /// Every feature.
    All,
    /// A fixed count, capped at `n_features`.
    Count(usize),
}

impl MaxFeatures {
    pub fn resolve(self, n_features: usize) -> usize {
        let n = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2().floor() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Count(count) => count.min(n_features),
        };
        n.max(1)
    }
}

/// Configuration of the bagged decision-tree ensemble.
///
/// Defaults: 100 trees, seed 42, balanced class weights, unlimited depth,
/// `min_samples_split = 2`, `min_samples_leaf = 1`, `sqrt` features per split,
/// bootstrap sampling on.
///
/// Every field is optional in JSON; missing fields take their defaults:
///
/// ```rust
/// use potability::trainer::{ClassWeight, ForestConfig};
///
/// let config: ForestConfig = serde_json::from_str(r#"{ "n_trees": 25 }"#).unwrap();
/// assert_eq!(config.n_trees, 25);
/// assert_eq!(config.seed, 42);
/// assert_eq!(config.class_weight, ClassWeight::Balanced);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub seed: u64,
    pub class_weight: ClassWeight,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
            class_weight: ClassWeight::Balanced,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
        }
    }
}

impl ForestConfig {
    /// Start the builder pattern from the defaults.
    pub fn builder() -> ForestConfigBuilder {
        ForestConfigBuilder::new()
    }

    /// Read a JSON configuration file and validate it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: ForestConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// [`PotabilityError::InvalidParameter`] when a value cannot produce a forest.
    pub fn validate(&self) -> Result<()> {
        if self.n_trees == 0 {
            return Err(PotabilityError::InvalidParameter(
                "n_trees must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(PotabilityError::InvalidParameter(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        if self.min_samples_leaf == 0 {
            return Err(PotabilityError::InvalidParameter(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if self.max_features == MaxFeatures::Count(0) {
            return Err(PotabilityError::InvalidParameter(
                "max_features count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fluent builder for [`ForestConfig`].
#[derive(Clone, Debug, Default)]
pub struct ForestConfigBuilder {
    config: ForestConfig,
}

impl ForestConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_trees(mut self, n_trees: usize) -> Self {
        self.config.n_trees = n_trees;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn class_weight(mut self, class_weight: ClassWeight) -> Self {
        self.config.class_weight = class_weight;
        self
    }

    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn min_samples_split(mut self, n: usize) -> Self {
        self.config.min_samples_split = n;
        self
    }

    pub fn min_samples_leaf(mut self, n: usize) -> Self {
        self.config.min_samples_leaf = n;
        self
    }

    pub fn max_features(mut self, max_features: MaxFeatures) -> Self {
        self.config.max_features = max_features;
        self
    }

    pub fn bootstrap(mut self, bootstrap: bool) -> Self {
        self.config.bootstrap = bootstrap;
        self
    }

    pub fn build(self) -> ForestConfig {
        self.config
    }
}
