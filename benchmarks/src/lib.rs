//! Offline evaluation and benchmark helpers for the potability engine.
//!
//! - Synthetic water-quality tables with missing cells
//! - Seeded train/test splits
//! - Binary classification metrics (accuracy, precision, recall, F1)
//! - Timing utilities

pub mod data;
pub mod metrics;
pub mod split;
pub mod utils;

pub use data::{load_or_synthesize, synthetic_csv};
pub use metrics::{ClassificationMetrics, ConfusionMatrix};
pub use split::train_test_indices;
pub use utils::{repeat_timed, time_fn, TimingStats};
