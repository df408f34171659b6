//! # potability
//!
//! Drinking-water safety decisions from two kinds of evidence:
//!
//! - a qualitative **survey** (foaming, discoloration, odours, taste and a
//!   turbidity proxy), scored by fixed rules into a three-tier risk level;
//! - nine **laboratory measurements**, classified as potable or not by a bagged
//!   decision-tree ensemble trained on a labeled tabular dataset.
//!
//! ## Core Design Principles
//!
//! - **Two independent paths**: the survey path never touches data or models
//!   and cannot fail; the measurement path owns all loading and training.
//! - **Stateful Type Safety**: the ensemble carries its training state in the
//!   type system (`RandomForest<Unfitted>` vs `RandomForest<Fitted>`).
//! - **Column order by construction**: the [`dataset::schema::FeatureSchema`]
//!   seen at training travels with the model, and prediction inputs are
//!   assembled from named fields against it.
//! - **Train once**: [`cache::ModelCache`] memoizes one immutable model per
//!   dataset content and shares it by `Arc`.
//!
//! ## Quick Start
//!
//! ```rust
//! use potability::survey::{RiskTier, RuleBasedRiskEvaluator, SurveyAnswer};
//!
//! let survey = RuleBasedRiskEvaluator::default().evaluate(&SurveyAnswer {
//!     odor: true,
//!     turbidity_proxy: 35_000,
//!     ..SurveyAnswer::default()
//! });
//! assert_eq!(survey.tier, RiskTier::Caution);
//!
//! // Measurement path (needs a data file):
//! // let cache = potability::ModelCache::default();
//! // let model = cache.model_for("water_potability.csv")?;
//! // let prediction = PredictionService::predict(&model, &sample)?;
//! ```
//!
//! ## Module Structure
//!
//! - `survey`: rule-based risk evaluation
//! - `locale`: English / Korean display strings
//! - `feature`: the nine measurements and their column names
//! - `dataset`: CSV loading, schema, imputed training table
//! - `preprocessing`: mean imputation
//! - `model`: decision tree and forest with typestate
//! - `trainer`: forest configuration and the training pipeline
//! - `cache`: train-once model cache
//! - `prediction`: named-sample prediction

pub mod cache;

/// Data loading utilities and the training table.
pub mod dataset;

pub mod error;
pub mod feature;
pub mod locale;

/// Decision-tree ensemble with compile-time state safety.
pub mod model;

pub mod prediction;

/// Data preprocessing transformers.
pub mod preprocessing;

pub mod survey;

/// Forest configuration and training orchestration.
pub mod trainer;

pub use cache::{ModelCache, ModelState};
pub use dataset::{DatasetLoader, TrainingDataset};
pub use error::{PotabilityError, Result};
pub use feature::Feature;
pub use locale::Locale;
pub use prediction::{ClassProbabilities, Potability, Prediction, PredictionService, WaterSample};
pub use survey::{RiskAssessment, RiskReason, RiskTier, RuleBasedRiskEvaluator, SurveyAnswer};
pub use trainer::{ForestConfig, TrainedModel, TrainingPipeline};
