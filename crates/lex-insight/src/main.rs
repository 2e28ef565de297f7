//! CLI entry point for the tabular insight engine.

use anyhow::{Context, Result, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand};
use lex_insight::{
    ActionSpec, AnalysisResult, ChartData, EngineConfig, InsightGenerator, Insights,
    PreprocessingEngine, StatisticalAnalyzer, TableLoader, cleaned_file_name, write_csv,
};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Dataset insights, cleaning and column analysis",
    long_about = "Inspect a CSV dataset, clean it, and analyze its columns.\n\n\
                  EXAMPLES:\n  \
                  # Schema, statistics and missing values\n  \
                  lex-insight insights -i data.csv\n\n  \
                  # Impute, cap outliers and normalize\n  \
                  lex-insight preprocess -i data.csv --impute age=median --outliers age --normalize income\n\n  \
                  # Same request as JSON\n  \
                  lex-insight preprocess -i data.csv --actions '{\"missing_values\": {\"age\": \"mean\"}}'\n\n  \
                  # Statistics and a count chart of a column\n  \
                  lex-insight analyze -i data.csv -c city -k count"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable text
    ///
    /// Disables all progress logs. Useful for piping to other tools.
    #[arg(long, global = true)]
    json: bool,
}

/// Dataset every subcommand reads.
#[derive(ClapArgs, Debug)]
struct InputArgs {
    /// Path to the CSV file to read
    #[arg(short, long)]
    input: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the schema, descriptive statistics and missing-value counts
    Insights {
        #[command(flatten)]
        source: InputArgs,
    },

    /// Clean the dataset and save it as cleaned_<input name>
    Preprocess {
        #[command(flatten)]
        source: InputArgs,

        /// Missing-value handling as column=method (mean, median, mode, remove)
        ///
        /// Repeatable; columns are processed in the order given.
        #[arg(long = "impute", value_name = "COLUMN=METHOD", value_parser = parse_imputation)]
        impute: Vec<(String, String)>,

        /// Column whose outliers are capped at the IQR bounds (repeatable)
        #[arg(long = "outliers", value_name = "COLUMN")]
        outliers: Vec<String>,

        /// Column to min-max normalize (repeatable)
        #[arg(long = "normalize", value_name = "COLUMN")]
        normalize: Vec<String>,

        /// Full request as JSON; flags above are added to it
        #[arg(long)]
        actions: Option<String>,

        /// Output directory for the cleaned dataset
        #[arg(short, long, default_value = "./outputs")]
        output: String,
    },

    /// Compute statistics and a chart specification for one column
    Analyze {
        #[command(flatten)]
        source: InputArgs,

        /// Column to analyze
        #[arg(short, long)]
        column: String,

        /// Chart kind (histogram, boxplot, count)
        #[arg(short, long, default_value = "histogram")]
        kind: String,
    },
}

impl Command {
    fn input(&self) -> &str {
        match self {
            Command::Insights { source }
            | Command::Preprocess { source, .. }
            | Command::Analyze { source, .. } => &source.input,
        }
    }
}

/// Parse `column=method`.
fn parse_imputation(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((column, method)) if !column.is_empty() && !method.is_empty() => {
            Ok((column.to_string(), method.to_string()))
        }
        _ => Err(format!("expected COLUMN=METHOD, got '{}'", value)),
    }
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let input = args.command.input();
    if !Path::new(input).exists() {
        return Err(anyhow!("Input file not found: {}", input));
    }

    let data = TableLoader::from_path(input)?;
    let config = EngineConfig::default();

    match &args.command {
        Command::Insights { .. } => run_insights(&data, config, args.json),
        Command::Preprocess {
            impute,
            outliers,
            normalize,
            actions,
            output,
            ..
        } => {
            let spec = build_action_spec(impute, outliers, normalize, actions.as_deref())?;
            run_preprocess(&data, config, &spec, input, output, args.json)
        }
        Command::Analyze { column, kind, .. } => {
            let result = StatisticalAnalyzer::new(config).analyze(&data, column, kind)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_analysis(&result);
            }
            Ok(())
        }
    }
}

/// Merge the `--actions` JSON with the individual flags.
fn build_action_spec(
    impute: &[(String, String)],
    outliers: &[String],
    normalize: &[String],
    actions: Option<&str>,
) -> Result<ActionSpec> {
    let mut spec = match actions {
        Some(json) => ActionSpec::from_json(json).context("Invalid --actions JSON")?,
        None => ActionSpec::new(),
    };

    for (column, method) in impute {
        spec = spec.impute(column.as_str(), method);
    }
    for column in outliers {
        spec = spec.cap_outliers(column.as_str());
    }
    for column in normalize {
        spec = spec.normalize(column.as_str());
    }

    Ok(spec)
}

fn run_insights(data: &DataFrame, config: EngineConfig, json: bool) -> Result<()> {
    let generator = InsightGenerator::new(config);
    let insights = generator.compute_insights(data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    print_insights(&generator, &insights);
    Ok(())
}

fn run_preprocess(
    data: &DataFrame,
    config: EngineConfig,
    spec: &ActionSpec,
    input: &str,
    output_dir: &str,
    json: bool,
) -> Result<()> {
    if spec.is_empty() {
        info!("No actions requested, the dataset is saved unchanged");
    }

    let mut outcome = PreprocessingEngine::new(config).preprocess(data, spec)?;

    let file_name = Path::new(input)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("dataset.csv");
    let output_path: PathBuf = Path::new(output_dir).join(cleaned_file_name(file_name));
    write_csv(&mut outcome.table, &output_path)?;

    if json {
        let summary = serde_json::json!({
            "log": outcome.log(),
            "actions": outcome.actions,
            "rows_before": outcome.rows_before,
            "rows_after": outcome.rows_after,
            "output_file": output_path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!("{}", "=".repeat(80));
    println!("PREPROCESSING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();
    println!("Output: {}", output_path.display());
    println!(
        "Rows: {} -> {} ({} removed)",
        outcome.rows_before,
        outcome.rows_after,
        outcome.rows_removed()
    );
    println!();

    if outcome.actions.is_empty() {
        println!("No changes were needed.");
    } else {
        println!("Actions Taken:");
        for line in outcome.log() {
            println!("  - {}", line);
        }
    }
    println!("{}", "=".repeat(80));
    Ok(())
}

fn print_insights(generator: &InsightGenerator, insights: &Insights) {
    println!("{}", "=".repeat(80));
    println!("DATASET INFO");
    println!("{}", "-".repeat(40));
    print!("{}", insights.info_report());
    println!();

    println!("DESCRIPTION");
    println!("{}", "-".repeat(40));
    println!("{}", generator.description_text(insights));
    println!();

    println!("MISSING VALUES");
    println!("{}", "-".repeat(40));
    if insights.missing_values.is_empty() {
        println!("  No missing values");
    } else {
        for (column, count) in &insights.missing_values {
            println!("  {:<20} {}", column, count);
        }
    }
    println!("{}", "=".repeat(80));
}

fn print_analysis(result: &AnalysisResult) {
    println!("{}", "=".repeat(80));
    println!("Statistics for '{}'", result.column);
    println!("{}", "-".repeat(40));
    for entry in &result.display {
        println!("  {:<16} {}", entry.label, entry.value);
    }
    println!();

    match &result.chart {
        Some(chart) => {
            println!("{}", chart.title);
            println!("{}", "-".repeat(40));
            match &chart.data {
                ChartData::Histogram { values, bins, .. } => {
                    println!("  {} values in {} bins", values.len(), bins.len());
                    for bin in bins {
                        println!("  [{:>12.2}, {:>12.2})  {}", bin.start, bin.end, bin.count);
                    }
                }
                ChartData::Boxplot { summary, .. } => {
                    println!(
                        "  min {:.2}  q1 {:.2}  median {:.2}  q3 {:.2}  max {:.2}",
                        summary.min, summary.q1, summary.median, summary.q3, summary.max
                    );
                    println!(
                        "  whiskers {:.2} .. {:.2}",
                        summary.lower_whisker, summary.upper_whisker
                    );
                }
                ChartData::Count { categories } => {
                    for category in categories {
                        println!("  {:<20} {}", category.value, category.count);
                    }
                }
            }
        }
        None => println!("No chart produced for this column and chart kind."),
    }
    println!("{}", "=".repeat(80));
}
