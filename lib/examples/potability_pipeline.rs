//! Water Potability Pipeline
//!
//! End-to-end walk through both decision paths:
//! - survey answers scored by the rule-based evaluator
//! - a small water-quality table with missing cells, loaded and mean-imputed
//! - a bagged decision-tree ensemble trained once through the model cache
//! - predictions from named measurements, plus feature importances
//!
//! Run with: cargo run --example potability_pipeline
//! (set RUST_LOG=info to see loading and training logs)

use potability::cache::{ModelCache, ModelState};
use potability::dataset::DatasetLoader;
use potability::locale::Locale;
use potability::prediction::{PredictionService, WaterSample};
use potability::survey::{RuleBasedRiskEvaluator, SurveyAnswer};
use potability::trainer::{ForestConfig, TrainingPipeline};
use std::error::Error;
use std::io::Write;

/// A slice of the reference table. Blank cells are missing measurements.
const WATER_CSV: &str = "\
ph,Hardness,Solids,Chloramines,Sulfate,Conductivity,Organic_carbon,Trihalomethanes,Turbidity,Potability
,204.89,20791.31,7.30,368.51,564.30,10.37,86.99,2.96,0
3.71,129.42,18630.05,6.63,,592.88,15.18,56.32,4.50,0
8.09,224.23,19909.54,9.27,,418.60,16.86,66.42,3.05,0
8.31,214.37,22018.41,8.05,356.88,363.26,18.43,100.34,4.62,0
9.09,181.10,17978.98,6.54,310.13,398.41,11.55,31.99,4.07,0
5.58,188.31,28748.68,7.54,326.67,280.46,8.39,54.91,2.55,0
10.22,248.07,28749.71,7.51,393.66,283.65,13.79,84.60,2.67,0
8.64,203.36,13672.09,4.56,303.31,474.61,12.36,62.80,4.40,0
,118.99,14285.58,7.80,268.64,389.38,12.71,53.93,3.60,0
11.18,227.23,25484.51,9.08,404.04,563.89,17.93,71.98,4.37,0
7.36,165.52,32452.61,7.55,326.62,425.38,15.59,78.74,3.66,1
7.97,218.69,18767.66,8.11,,364.10,14.13,76.49,4.01,1
7.12,156.70,18730.81,3.61,282.34,347.72,15.93,79.50,3.45,1
6.35,186.73,41065.23,9.63,364.49,516.74,11.54,75.07,4.38,1
7.05,211.05,30980.60,10.09,,315.14,20.40,56.65,4.27,1
9.92,202.82,22237.17,7.63,276.38,455.85,14.28,93.05,3.90,1
7.48,224.81,19001.06,8.40,334.94,503.73,9.83,70.26,3.04,1
6.66,247.38,20447.93,6.71,,309.99,16.02,67.26,4.68,1
,186.81,30421.40,8.51,324.07,381.17,13.35,64.57,3.64,1
6.18,201.57,24658.93,7.68,339.87,329.61,14.79,60.41,3.97,1
";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // 1. Survey path: no data, no model.
    let answer = SurveyAnswer {
        foaming: true,
        odor: true,
        turbidity_proxy: 42_000,
        ..SurveyAnswer::default()
    };
    for locale in [Locale::En, Locale::Ko] {
        let assessment = RuleBasedRiskEvaluator::new(locale).evaluate(&answer);
        println!(
            "[{}] {} ({} reasons): {}",
            locale,
            locale.tier_label(assessment.tier),
            assessment.risk_count(),
            assessment.summary
        );
    }

    // 2. Measurement path: write the table to disk and train through the cache.
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(WATER_CSV.as_bytes())?;

    let loader = DatasetLoader::new();
    let raw = loader.read_raw(file.path())?;
    println!(
        "\nLoaded {} rows, {} missing cells (per column: {:?})",
        raw.n_samples(),
        raw.missing_count(),
        raw.missing_per_column()
    );

    let config = ForestConfig::builder().n_trees(50).seed(42).build();
    let cache = ModelCache::new(loader, TrainingPipeline::new(config));

    let model = cache.model_for(file.path())?;
    let again = cache.model_for(file.path())?;
    println!(
        "Model state: {:?}; second request reused it: {}",
        cache.state(model.fingerprint()),
        std::sync::Arc::ptr_eq(&model, &again)
    );
    assert_eq!(cache.state(model.fingerprint()), ModelState::Ready);

    println!("\nFeature importances:");
    for (feature, importance) in model.feature_importances() {
        println!("  {:<16} {:.3}", feature.column_name(), importance);
    }

    // 3. Predict from named measurements.
    let samples = [
        WaterSample {
            ph: 7.2,
            hardness: 190.0,
            solids: 26_000.0,
            chloramines: 8.0,
            sulfate: 330.0,
            conductivity: 400.0,
            organic_carbon: 14.0,
            trihalomethanes: 70.0,
            turbidity: 3.8,
        },
        WaterSample {
            ph: 3.9,
            hardness: 130.0,
            solids: 18_000.0,
            chloramines: 6.5,
            sulfate: 360.0,
            conductivity: 590.0,
            organic_carbon: 15.0,
            trihalomethanes: 57.0,
            turbidity: 4.5,
        },
    ];

    println!();
    for sample in &samples {
        let prediction = PredictionService::predict(&model, sample)?;
        println!(
            "pH {:>4.1} -> {:<12} p0={:.2} p1={:.2}",
            sample.ph,
            Locale::En.potability_label(prediction.label),
            prediction.probability.p0,
            prediction.probability.p1
        );
    }

    Ok(())
}
