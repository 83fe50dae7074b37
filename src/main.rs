use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use asana_io::{ClassReport, DEFAULT_LABEL_COLUMN, EvaluationReport, ReportWriter, TableReader};
use asana_rf::{Evaluation, RandomForest, RandomForestConfig};

#[derive(Parser)]
#[command(name = "asana")]
#[command(about = "Train and evaluate a Random Forest yoga pose classifier")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Fit a classifier on the training table, score it on the test table, and save it
    Train {
        /// Path to the training CSV file
        #[arg(long, default_value = "train_data.csv")]
        train: PathBuf,

        /// Path to the held-out test CSV file
        #[arg(long, default_value = "test_data.csv")]
        test: PathBuf,

        /// Name of the column holding the pose label
        #[arg(long, default_value = DEFAULT_LABEL_COLUMN)]
        label_column: String,

        /// Where to write the fitted model
        #[arg(long, default_value = "yoga_pose_model.pkl")]
        model_out: PathBuf,

        /// Number of trees in the Random Forest
        #[arg(long, default_value_t = 100)]
        n_trees: usize,

        /// Maximum tree depth (unlimited if not set)
        #[arg(long)]
        max_depth: Option<u16>,

        /// Optional path for a JSON evaluation report
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Score a saved model on a labeled table
    Evaluate {
        /// Path to the saved model
        #[arg(long, default_value = "yoga_pose_model.pkl")]
        model: PathBuf,

        /// Path to the labeled CSV file to score
        #[arg(long, default_value = "test_data.csv")]
        data: PathBuf,

        /// Name of the column holding the pose label
        #[arg(long, default_value = DEFAULT_LABEL_COLUMN)]
        label_column: String,

        /// Optional path for a JSON evaluation report
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

/// Training-side details recorded in the report when this run fitted the model.
struct TrainingInfo {
    seed: u64,
    n_train_samples: usize,
}

fn write_report(
    path: &Path,
    model_path: &Path,
    forest: &RandomForest,
    eval: &Evaluation,
    training: Option<TrainingInfo>,
) -> Result<()> {
    let model_path = model_path.display().to_string();
    let metrics = eval.confusion_matrix.class_metrics();
    let report = EvaluationReport {
        model_path: &model_path,
        n_trees: forest.n_trees(),
        seed: training.as_ref().map(|t| t.seed),
        n_train_samples: training.as_ref().map(|t| t.n_train_samples),
        n_test_samples: eval.n_samples,
        n_features: forest.n_features(),
        accuracy: eval.accuracy,
        classes: eval.confusion_matrix.classes(),
        confusion_matrix: eval.confusion_matrix.as_rows(),
        class_metrics: metrics
            .iter()
            .map(|m| ClassReport {
                class: &m.class,
                precision: m.precision,
                recall: m.recall,
                f1: m.f1,
                support: m.support,
            })
            .collect(),
    };
    ReportWriter::new(path)?
        .write(&report)
        .context("failed to write evaluation report")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Train {
            train,
            test,
            label_column,
            model_out,
            n_trees,
            max_depth,
            report,
        } => {
            // 1. Read both tables
            let train_data = TableReader::new(&train)
                .with_label_column(label_column.as_str())
                .read()
                .context("failed to read training CSV")?;
            let test_data = TableReader::new(&test)
                .with_label_column(label_column.as_str())
                .read()
                .context("failed to read test CSV")?;
            train_data
                .check_schema(&test_data)
                .context("training and test tables have different feature columns")?;
            info!(
                n_train = train_data.n_samples(),
                n_test = test_data.n_samples(),
                n_features = train_data.n_features(),
                "datasets loaded"
            );

            // 2. Fit
            let forest = RandomForestConfig::new(n_trees)?
                .with_max_depth(max_depth)
                .with_seed(cli.seed)
                .fit(
                    train_data.features(),
                    train_data.labels(),
                    train_data.feature_names(),
                )
                .context("model training failed")?;

            // 3. Score on the held-out table
            let eval = forest
                .evaluate(test_data.features(), test_data.labels())
                .context("evaluation failed")?;
            debug!("confusion matrix:\n{}", eval.confusion_matrix);
            println!(
                "✅ Training complete! Accuracy: {:.2}%",
                eval.accuracy * 100.0
            );

            // 4. Save
            forest
                .save(&model_out)
                .context("failed to save model")?;
            println!("Model saved as {}", model_out.display());

            if let Some(report_path) = report {
                let training = TrainingInfo {
                    seed: cli.seed,
                    n_train_samples: train_data.n_samples(),
                };
                write_report(&report_path, &model_out, &forest, &eval, Some(training))?;
            }
        }

        Command::Evaluate {
            model,
            data,
            label_column,
            report,
        } => {
            // 1. Load model
            let forest = RandomForest::load(&model).context("failed to load model")?;
            info!(
                n_trees = forest.n_trees(),
                n_features = forest.n_features(),
                n_classes = forest.n_classes(),
                "model loaded"
            );

            // 2. Read the table and check it against the trained columns
            let dataset = TableReader::new(&data)
                .with_label_column(label_column.as_str())
                .read()
                .context("failed to read CSV")?;
            dataset
                .check_feature_names(forest.feature_names())
                .with_context(|| {
                    format!("feature columns of {} do not match the model", data.display())
                })?;

            // 3. Score
            let eval = forest
                .evaluate(dataset.features(), dataset.labels())
                .context("evaluation failed")?;
            debug!("confusion matrix:\n{}", eval.confusion_matrix);
            println!("Accuracy: {:.2}%", eval.accuracy * 100.0);

            if let Some(report_path) = report {
                write_report(&report_path, &model, &forest, &eval, None)?;
            }
        }
    }

    Ok(())
}
