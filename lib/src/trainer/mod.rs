//! Turns a [`TrainingDataset`] into an immutable [`TrainedModel`].
//!
//! [`TrainingPipeline`] is configured once (see [`ForestConfig`] and its
//! builder) and can be reused for any number of datasets. Training always
//! uses the whole dataset; held-out evaluation is done by the caller with
//! [`TrainingDataset::subset`].

pub mod config;

pub use config::{ClassWeight, ForestConfig, ForestConfigBuilder, MaxFeatures};

use crate::dataset::schema::FeatureSchema;
use crate::dataset::TrainingDataset;
use crate::error::{PotabilityError, Result};
use crate::feature::Feature;
use crate::model::{Fitted, RandomForest, Unfitted};
use log::info;
use std::time::Instant;

/// A fitted forest together with everything needed to use it correctly.
///
/// Never mutated after training; share it behind an `Arc`.
#[derive(Clone, Debug)]
pub struct TrainedModel {
    forest: RandomForest<Fitted>,
    schema: FeatureSchema,
    features: Vec<Feature>,
    imputation_means: Vec<f64>,
    class_counts: [usize; 2],
    fingerprint: String,
}

impl TrainedModel {
    pub fn forest(&self) -> &RandomForest<Fitted> {
        &self.forest
    }

    /// Column order the forest expects.
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// The measurement behind each schema column, in schema order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn imputation_means(&self) -> &[f64] {
        &self.imputation_means
    }

    /// `[non-potable, potable]` rows seen in training.
    pub fn class_counts(&self) -> [usize; 2] {
        self.class_counts
    }

    /// Fingerprint of the dataset the model was trained on.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn n_trees(&self) -> usize {
        self.forest.n_trees()
    }

    /// Importance of each measurement, in schema order.
    pub fn feature_importances(&self) -> Vec<(Feature, f64)> {
        self.features
            .iter()
            .copied()
            .zip(self.forest.feature_importances().iter().copied())
            .collect()
    }
}

/// Fits the forest on a dataset.
///
/// # Example
///
/// ```rust
/// use ndarray::Array2;
/// use potability::dataset::schema::FeatureSchema;
/// use potability::dataset::TrainingDataset;
/// use potability::trainer::{ForestConfig, TrainingPipeline};
///
/// let x = Array2::from_shape_fn((20, 9), |(r, c)| (r * 9 + c) as f64);
/// let y = (0..20).map(|r| u8::from(r >= 10)).collect();
/// let dataset = TrainingDataset::from_parts(x, y, FeatureSchema::water_quality()).unwrap();
///
/// let pipeline = TrainingPipeline::new(ForestConfig::builder().n_trees(10).build());
/// let model = pipeline.train(&dataset).unwrap();
/// assert_eq!(model.n_trees(), 10);
/// assert_eq!(model.schema(), dataset.schema());
/// ```
#[derive(Clone, Debug, Default)]
pub struct TrainingPipeline {
    config: ForestConfig,
}

impl TrainingPipeline {
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Train on the whole dataset.
    ///
    /// # Errors
    /// - [`PotabilityError::UnknownFeature`] / [`PotabilityError::DuplicateFeature`]
    ///   if the schema is not a set of known measurements
    /// - [`PotabilityError::EmptyData`] for a dataset without rows
    /// - whatever [`RandomForest::fit`] reports for an invalid config
    pub fn train(&self, dataset: &TrainingDataset) -> Result<TrainedModel> {
        let features = dataset.schema().resolve_features()?;
        if dataset.is_empty() {
            return Err(PotabilityError::EmptyData(
                "training dataset has no rows".to_string(),
            ));
        }

        let class_counts = dataset.class_counts();
        info!(
            "training {} trees on {} rows x {} features (class counts {:?})",
            self.config.n_trees,
            dataset.n_samples(),
            dataset.n_features(),
            class_counts
        );

        let start = Instant::now();
        let forest = RandomForest::<Unfitted>::new(self.config.clone()).fit(dataset)?;
        info!("training finished in {:.2?}", start.elapsed());

        Ok(TrainedModel {
            forest,
            schema: dataset.schema().clone(),
            features,
            imputation_means: dataset.imputation_means().to_vec(),
            class_counts,
            fingerprint: dataset.fingerprint().to_string(),
        })
    }
}
