use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rusty_trees::data::dataset::{Dataset, SplitPolicy};
use rusty_trees::data::predictions::write_predictions;
use rusty_trees::data::reader::DatasetReader;
use rusty_trees::evaluation::harness::{Evaluation, EvaluationReport};
use rusty_trees::evaluation::params::{EvaluationConfig, KeepPredictions};
use rusty_trees::trees::classifier::{Algorithm, Classifier};
use rusty_trees::trees::params::{BranchValues, Id3Params};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "rusty-trees")]
#[command(about = "Induce decision trees on a cleaned CSV and report accuracy over random splits")]
#[command(version)]
struct Cli {
    /// Cleaned CSV file with a header row
    #[arg(long)]
    data: PathBuf,

    /// Column holding the class to predict
    #[arg(long, default_value = "revenue")]
    target: String,

    /// Columns that only identify a row and are never split on
    #[arg(long = "identifier", default_values_t = vec!["title".to_string()])]
    identifiers: Vec<String>,

    /// Tree induction algorithm: "id3" or "cart"
    #[arg(long, default_value = "id3")]
    algorithm: Algorithm,

    /// Number of independent train/test trials
    #[arg(long, default_value_t = 50)]
    trials: usize,

    /// How each trial divides the rows
    #[arg(long, value_enum, default_value_t = SplitArg::Ratio)]
    split: SplitArg,

    /// Fraction of rows used for learning with --split ratio
    #[arg(long, default_value_t = 0.5)]
    train_ratio: f64,

    /// Branch ID3 nodes on every value of the attribute in the learn set
    #[arg(long)]
    domain_branches: bool,

    /// RNG seed for reproducible splits
    #[arg(long)]
    seed: Option<u64>,

    /// Run trials in parallel
    #[arg(long)]
    parallel: bool,

    /// Write the last trial's test rows and predictions to this CSV file
    #[arg(long)]
    results: Option<PathBuf>,

    /// Print the tree induced on the whole dataset
    #[arg(long)]
    show_tree: bool,

    /// Enable verbose (debug-level) logging
    #[arg(long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SplitArg {
    /// Each row goes to the learn set with probability 1/2
    Coin,
    /// Shuffle and cut at --train-ratio
    Ratio,
}

fn evaluation_config(cli: &Cli) -> Result<EvaluationConfig> {
    let mut config = EvaluationConfig::new();
    config.set_trials(cli.trials)?;
    config.set_algorithm(cli.algorithm);
    config.set_split_policy(match cli.split {
        SplitArg::Coin => SplitPolicy::CoinToss,
        SplitArg::Ratio => SplitPolicy::Ratio(cli.train_ratio),
    })?;
    config.set_seed(cli.seed);
    config.set_parallel(cli.parallel);
    if cli.results.is_some() {
        config.set_keep_predictions(KeepPredictions::LastTrial);
    }

    let mut id3_params = Id3Params::new();
    if cli.domain_branches {
        id3_params.set_branch_values(BranchValues::Domain);
    }
    config.set_id3_params(id3_params);
    Ok(config)
}

fn show_tree(dataset: &Dataset, config: &EvaluationConfig) -> Result<()> {
    let mut classifier = config.algorithm().classifier(config.id3_params());
    classifier.fit(dataset)?;
    if let Some(tree) = classifier.describe() {
        println!("{tree}");
    }
    Ok(())
}

fn print_report(report: &EvaluationReport) {
    for trial in &report.trials {
        match &trial.confusion {
            Some(confusion) => println!(
                "Test #{}, accuracy = {}%, precision = {:.3}, recall = {:.3}",
                trial.trial,
                confusion.accuracy() * 100.0,
                confusion.precision(),
                confusion.recall()
            ),
            None => println!("Test #{}, skipped (empty partition)", trial.trial),
        }
    }
    println!(
        "Average over {} trials: {}%",
        report.scored_trials(),
        report.mean_accuracy * 100.0
    );
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

    let reader = cli
        .identifiers
        .iter()
        .fold(DatasetReader::new(&cli.target), |reader, identifier| {
            reader.with_identifier(identifier)
        });
    let dataset = reader
        .from_path(&cli.data)
        .with_context(|| format!("failed to load {}", cli.data.display()))?;

    let config = evaluation_config(&cli)?;
    if cli.show_tree {
        show_tree(&dataset, &config)?;
    }

    println!("\nBuilding decision tree using {} algorithm...\n", config.algorithm());
    let report = Evaluation::new(config).run(&dataset)?;
    print_report(&report);

    if let Some(path) = &cli.results {
        let last = report
            .trials
            .last()
            .and_then(|trial| trial.predictions.as_ref())
            .context("the last trial was skipped, no predictions to write")?;
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        write_predictions(BufWriter::new(file), &last.test, &last.predicted)?;
        info!(path = %path.display(), rows = last.test.len(), "wrote predictions");
    }
    Ok(())
}
