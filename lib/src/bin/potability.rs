use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::debug;
use potability::cache::ModelCache;
use potability::dataset::DatasetLoader;
use potability::feature::Feature;
use potability::locale::Locale;
use potability::prediction::{PredictionService, WaterSample};
use potability::survey::{RuleBasedRiskEvaluator, SurveyAnswer, TURBIDITY_PROXY_THRESHOLD};
use potability::trainer::{ForestConfig, TrainedModel, TrainingPipeline};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about = "Water potability decisions from a survey or from lab measurements", long_about = None)]
struct Cli {
    /// Display language for text output (en, ko)
    #[arg(long, global = true, default_value = "en")]
    locale: Locale,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a qualitative water survey
    Survey {
        /// Water foams noticeably
        #[arg(long)]
        foaming: bool,
        /// Water is reddish or brown
        #[arg(long)]
        discoloration: bool,
        /// Strong disinfectant smell
        #[arg(long)]
        chlorine_odor: bool,
        /// Metallic taste
        #[arg(long)]
        metallic_taste: bool,
        /// Any other smell
        #[arg(long)]
        odor: bool,
        /// Stale or unpleasant taste
        #[arg(long)]
        stale_taste: bool,
        /// Cloudiness on the 0-50000 survey scale
        #[arg(long, default_value_t = 0)]
        turbidity_proxy: i64,
    },
    /// Classify lab measurements with a forest trained on a CSV file
    Predict {
        #[command(flatten)]
        model: ModelArgs,
        #[command(flatten)]
        sample: SampleArgs,
    },
    /// Train on a CSV file and print the feature importances
    Importances {
        #[command(flatten)]
        model: ModelArgs,
    },
}

#[derive(Args)]
struct ModelArgs {
    /// Labeled training table
    #[arg(long)]
    data: PathBuf,
    /// JSON forest configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Name of the label column
    #[arg(long, default_value = "Potability")]
    label_column: String,
}

#[derive(Args)]
struct SampleArgs {
    #[arg(long)]
    ph: f64,
    #[arg(long)]
    hardness: f64,
    #[arg(long)]
    solids: f64,
    #[arg(long)]
    chloramines: f64,
    #[arg(long)]
    sulfate: f64,
    #[arg(long)]
    conductivity: f64,
    #[arg(long)]
    organic_carbon: f64,
    #[arg(long)]
    trihalomethanes: f64,
    #[arg(long)]
    turbidity: f64,
}

impl From<SampleArgs> for WaterSample {
    fn from(a: SampleArgs) -> Self {
        WaterSample {
            ph: a.ph,
            hardness: a.hardness,
            solids: a.solids,
            chloramines: a.chloramines,
            sulfate: a.sulfate,
            conductivity: a.conductivity,
            organic_carbon: a.organic_carbon,
            trihalomethanes: a.trihalomethanes,
            turbidity: a.turbidity,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Survey {
            foaming,
            discoloration,
            chlorine_odor,
            metallic_taste,
            odor,
            stale_taste,
            turbidity_proxy,
        } => {
            let answer = SurveyAnswer {
                foaming,
                discoloration,
                chlorine_odor,
                metallic_taste,
                odor,
                stale_taste,
                turbidity_proxy,
            };
            survey(&answer, cli.locale, cli.json)
        }
        Commands::Predict { model, sample } => {
            let trained = train(&model)?;
            predict(&trained, &sample.into(), cli.locale, cli.json)
        }
        Commands::Importances { model } => {
            let trained = train(&model)?;
            importances(&trained, cli.locale, cli.json)
        }
    }
}

fn survey(answer: &SurveyAnswer, locale: Locale, as_json: bool) -> Result<()> {
    let assessment = RuleBasedRiskEvaluator::new(locale).evaluate(answer);

    if as_json {
        let out = json!({
            "tier": assessment.tier,
            "summary": assessment.summary,
            "risk_count": assessment.risk_count(),
            "reasons": assessment.reasons,
            "input": answer,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", locale.tier_label(assessment.tier));
    println!("{}", assessment.summary);
    println!();
    if assessment.reasons.is_empty() {
        println!("{}", locale.all_clear());
    } else {
        println!("{}:", locale.reasons_heading());
        for reason in &assessment.reasons {
            println!("  - {}", locale.reason_text(*reason));
        }
    }
    println!();
    for line in input_summary(answer) {
        println!("  {line}");
    }
    Ok(())
}

/// One line per survey answer, in the order the questions are asked.
fn input_summary(answer: &SurveyAnswer) -> Vec<String> {
    let flags = [
        ("foaming", answer.foaming),
        ("discoloration", answer.discoloration),
        ("chlorine odor", answer.chlorine_odor),
        ("metallic taste", answer.metallic_taste),
        ("other odor", answer.odor),
        ("stale taste", answer.stale_taste),
    ];
    let mut lines: Vec<String> = flags
        .iter()
        .map(|(name, value)| format!("{name:<16} {}", if *value { "yes" } else { "no" }))
        .collect();
    lines.push(format!(
        "{:<16} {} (threshold {})",
        "turbidity proxy", answer.turbidity_proxy, TURBIDITY_PROXY_THRESHOLD
    ));
    lines
}

fn load_config(path: Option<&Path>) -> Result<ForestConfig> {
    match path {
        Some(p) => ForestConfig::from_json_file(p)
            .with_context(|| format!("reading forest config {}", p.display())),
        None => Ok(ForestConfig::default()),
    }
}

fn train(args: &ModelArgs) -> Result<Arc<TrainedModel>> {
    let config = load_config(args.config.as_deref())?;
    debug!("forest config: {config:?}");
    let cache = ModelCache::new(
        DatasetLoader::new().label_column(args.label_column.as_str()),
        TrainingPipeline::new(config),
    );
    cache
        .model_for(&args.data)
        .with_context(|| format!("training on {}", args.data.display()))
}

fn predict(model: &TrainedModel, sample: &WaterSample, locale: Locale, as_json: bool) -> Result<()> {
    let prediction = PredictionService::predict(model, sample)?;

    if as_json {
        let out = json!({
            "label": prediction.label,
            "probability": prediction.probability,
            "n_trees": model.n_trees(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", locale.potability_label(prediction.label));
    println!(
        "p(not potable) = {:.3}, p(potable) = {:.3} ({} trees)",
        prediction.probability.p0,
        prediction.probability.p1,
        model.n_trees()
    );
    println!();
    for feature in Feature::ALL {
        println!(
            "  {:<24} {:>12.3} {}",
            locale.feature_label(feature),
            sample.value(feature),
            feature.unit()
        );
    }
    Ok(())
}

fn importances(model: &TrainedModel, locale: Locale, as_json: bool) -> Result<()> {
    let importances = model.feature_importances();

    if as_json {
        let out: serde_json::Map<String, serde_json::Value> = importances
            .iter()
            .map(|(f, v)| (f.column_name().to_string(), json!(v)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for (feature, value) in importances {
        println!("{:<24} {:.4}", locale.feature_label(feature), value);
    }
    Ok(())
}
