//! Train-once cache of [`TrainedModel`]s, keyed by dataset content.
//!
//! The cache is an ordinary value owned by the entry point and passed by
//! reference to whoever needs a model. Each distinct data content (by its
//! SHA-256 fingerprint) moves through
//!
//! ```text
//! Uninitialized --first request--> Training --success--> Ready
//!                                      |
//!                                      +--failure--> Uninitialized
//! ```
//!
//! Concurrent requests for the same content during `Training` block and then
//! share the same `Arc<TrainedModel>`; training runs at most once.
//! [`ModelCache::invalidate`] drops every entry.

use crate::dataset::{DatasetLoader, TrainingDataset};
use crate::error::Result;
use crate::trainer::{TrainedModel, TrainingPipeline};
use log::{debug, info};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Where a given dataset content is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelState {
    Uninitialized,
    Training,
    Ready,
}

#[derive(Default)]
struct Entry {
    model: OnceCell<Arc<TrainedModel>>,
    training: AtomicBool,
}

impl Entry {
    fn state(&self) -> ModelState {
        if self.model.get().is_some() {
            ModelState::Ready
        } else if self.training.load(Ordering::Acquire) {
            ModelState::Training
        } else {
            ModelState::Uninitialized
        }
    }
}

/// Loads a data source, trains on first use and hands out shared models.
pub struct ModelCache {
    loader: DatasetLoader,
    pipeline: TrainingPipeline,
    entries: Mutex<HashMap<String, Arc<Entry>>>,
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new(DatasetLoader::default(), TrainingPipeline::default())
    }
}

impl ModelCache {
    pub fn new(loader: DatasetLoader, pipeline: TrainingPipeline) -> Self {
        Self {
            loader,
            pipeline,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn pipeline(&self) -> &TrainingPipeline {
        &self.pipeline
    }

    /// Model trained on the current content of `path`.
    ///
    /// The source is read on every call so a changed file yields a new model;
    /// unchanged content reuses the cached one.
    ///
    /// # Errors
    /// [`crate::PotabilityError::DataSourceNotFound`] when `path` is absent, and
    /// any loading or training error. A failed training is not cached.
    pub fn model_for<P: AsRef<Path>>(&self, path: P) -> Result<Arc<TrainedModel>> {
        let dataset = self.loader.load(path)?;
        self.model_for_dataset(&dataset)
    }

    /// Model trained on `dataset`, training it if its fingerprint is new.
    pub fn model_for_dataset(&self, dataset: &TrainingDataset) -> Result<Arc<TrainedModel>> {
        let key = dataset.fingerprint();
        let entry = {
            let mut entries = self.entries.lock();
            Arc::clone(entries.entry(key.to_string()).or_default())
        };

        if let Some(model) = entry.model.get() {
            debug!("model cache hit for {}", short(key));
            return Ok(Arc::clone(model));
        }

        let model = entry.model.get_or_try_init(|| {
            entry.training.store(true, Ordering::Release);
            info!("model cache miss for {}; training", short(key));
            let trained = self.pipeline.train(dataset).map(Arc::new);
            entry.training.store(false, Ordering::Release);
            trained
        })?;
        Ok(Arc::clone(model))
    }

    /// Lifecycle state of the model for a dataset fingerprint.
    pub fn state(&self, fingerprint: &str) -> ModelState {
        self.entries
            .lock()
            .get(fingerprint)
            .map_or(ModelState::Uninitialized, |e| e.state())
    }

    /// Forget every model; the next request retrains.
    pub fn invalidate(&self) {
        let mut entries = self.entries.lock();
        info!("invalidating {} cached model(s)", entries.len());
        entries.clear();
    }

    /// Number of models ready to serve.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|e| e.state() == ModelState::Ready)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn short(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}
