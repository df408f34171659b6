//! Hold-out evaluation of the potability forest.
//!
//! Loads a labeled table (or generates a synthetic one), splits it 80/20 with a
//! seeded shuffle, fills missing cells of both parts with the training part's
//! column means, trains on the first part and scores the second. Training
//! time, per-sample prediction time and the metrics are printed as JSON.
//!
//! Run with:
//!   cargo run --release -p potability-benchmarks --bin holdout_eval -- --data water_potability.csv

use anyhow::{Context, Result};
use benchmarks::{load_or_synthesize, repeat_timed, time_fn, train_test_indices, ClassificationMetrics};
use clap::Parser;
use log::info;
use potability::prediction::{FeatureVector, PredictionService};
use potability::preprocessing::{MeanImputer, Transformer};
use potability::trainer::{ForestConfig, TrainingPipeline};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Hold-out evaluation of the potability forest", long_about = None)]
struct Cli {
    /// Labeled CSV table; a synthetic table is generated when omitted
    #[arg(long)]
    data: Option<PathBuf>,
    /// Rows of the synthetic table
    #[arg(long, default_value_t = 2000)]
    rows: usize,
    /// Seed for the synthetic table and the split
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Fraction of rows used for training
    #[arg(long, default_value_t = 0.8)]
    train_ratio: f64,
    /// JSON forest configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides n_trees from the configuration
    #[arg(long)]
    trees: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ForestConfig::from_json_file(path)
            .with_context(|| format!("reading forest config {}", path.display()))?,
        None => ForestConfig::default(),
    };
    if let Some(n_trees) = cli.trees {
        config.n_trees = n_trees;
    }

    let raw = load_or_synthesize(cli.data.as_deref(), cli.rows, cli.seed)
        .context("loading training table")?;
    let (train_idx, test_idx) = train_test_indices(raw.n_samples(), cli.train_ratio, cli.seed);
    let (train_raw, test_raw) = (raw.subset(&train_idx), raw.subset(&test_idx));

    let imputer = MeanImputer::new()
        .fit(train_raw.features())
        .context("fitting imputer on the training split")?;
    let train = train_raw.impute_with(&imputer)?;
    let test = test_raw.impute_with(&imputer)?;
    info!("split: {} train / {} test rows", train.n_samples(), test.n_samples());

    let pipeline = TrainingPipeline::new(config);
    let (model, train_time) = time_fn(|| pipeline.train(&train));
    let model = model.context("training")?;

    let vectors: Vec<FeatureVector> = test
        .features()
        .rows()
        .into_iter()
        .map(|row| FeatureVector::new(test.schema().clone(), row.to_vec()))
        .collect::<potability::Result<_>>()?;

    let (predictions, predict_stats) = repeat_timed(3, || {
        vectors
            .iter()
            .map(|v| PredictionService::predict_vector(&model, v).map(|p| p.label.label()))
            .collect::<potability::Result<Vec<u8>>>()
    })
    .context("test split is empty")?;
    let y_pred = predictions?;

    let metrics = ClassificationMetrics::calculate(test.labels(), &y_pred);
    let per_sample_us = if vectors.is_empty() {
        0.0
    } else {
        predict_stats.mean_ms * 1000.0 / vectors.len() as f64
    };

    let report = json!({
        "source": cli.data.as_ref().map_or_else(|| format!("synthetic({} rows, seed {})", cli.rows, cli.seed), |p| p.display().to_string()),
        "train_rows": train.n_samples(),
        "test_rows": test.n_samples(),
        "class_counts": model.class_counts(),
        "config": model.forest().config(),
        "train_time_ms": train_time.as_secs_f64() * 1000.0,
        "predict_time_per_sample_us": per_sample_us,
        "metrics": metrics,
        "feature_importances": model
            .feature_importances()
            .into_iter()
            .map(|(f, v)| (f.column_name().to_string(), v))
            .collect::<std::collections::BTreeMap<_, _>>(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
