//! CLI entry point: load one file, clean it and write the cleaned CSV.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use missing_data_cleaner::export::DEFAULT_SUFFIX;
use missing_data_cleaner::observability::TracingObserver;
use missing_data_cleaner::processing::{
    CleaningOptions, ColumnKind, MissingSummary, Strategy, DEFAULT_KNN_NEIGHBORS,
};
use missing_data_cleaner::session::{Session, SessionOptions};
use serde::Serialize;
use tracing::info;

/// CLI-compatible strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliStrategy {
    /// Drop rows containing any empty field
    Drop,
    /// Fill numeric columns with the column mean
    Mean,
    /// Fill numeric columns with the column median
    Median,
    /// Fill with the most frequent value
    Mode,
    /// Same as mode; --knn-neighbors is accepted but unused
    Knn,
    /// Carry the previous non-empty value down
    Ffill,
    /// Carry the next non-empty value up
    Bfill,
}

impl From<CliStrategy> for Strategy {
    fn from(cli: CliStrategy) -> Self {
        match cli {
            CliStrategy::Drop => Strategy::Drop,
            CliStrategy::Mean => Strategy::Mean,
            CliStrategy::Median => Strategy::Median,
            CliStrategy::Mode => Strategy::Mode,
            CliStrategy::Knn => Strategy::Knn,
            CliStrategy::Ffill => Strategy::ForwardFill,
            CliStrategy::Bfill => Strategy::BackwardFill,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Find and fill missing values in CSV files",
    long_about = "Loads a single .csv or .txt file, reports missing values per column, \
                  cleans it with the chosen strategy and writes <name>_cleaned.csv.\n\n\
                  EXAMPLES:\n  \
                  missing-data-cleaner survey.csv\n  \
                  missing-data-cleaner survey.csv --strategy median -o out/\n  \
                  missing-data-cleaner survey.csv --dry-run"
)]
struct Args {
    /// File to clean (exactly one .csv or .txt)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Cleaning strategy
    #[arg(short, long, value_enum, default_value = "mean")]
    strategy: CliStrategy,

    /// Number of neighbors for the knn strategy
    #[arg(long, default_value_t = DEFAULT_KNN_NEIGHBORS)]
    knn_neighbors: usize,

    /// Only clean these columns (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Output directory for the cleaned file
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Suffix appended to the input file stem
    #[arg(long, default_value = DEFAULT_SUFFIX)]
    suffix: String,

    /// Only report missing values and column profiles; write nothing
    #[arg(long)]
    dry_run: bool,

    /// Print a JSON report to stdout instead of the human-readable summary
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Machine-readable run report for `--json`.
#[derive(Debug, Serialize)]
struct Report {
    file: String,
    strategy: Strategy,
    before: MissingSummary,
    after: Option<MissingSummary>,
    output: Option<PathBuf>,
}

/// Initialize the tracing subscriber for logging.
///
/// Logging is disabled when `json_output` is set so stdout only carries the report.
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
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let mut session = Session::new(SessionOptions {
        observer: Some(Arc::new(TracingObserver)),
        download_suffix: args.suffix.clone(),
        ..Default::default()
    });
    session.load_selection(args.input.as_slice())?;

    let file = session.file_name().unwrap_or_default().to_string();
    let before = session
        .summary()
        .context("no dataset loaded after a successful load")?;

    if args.dry_run {
        if args.json {
            print_json(&Report {
                file,
                strategy: args.strategy.into(),
                before,
                after: None,
                output: None,
            })?;
        } else {
            print_summary("MISSING VALUES", &before);
            print_profiles(&session);
        }
        return Ok(());
    }

    let options = CleaningOptions {
        strategy: args.strategy.into(),
        knn_neighbors: args.knn_neighbors,
        columns: args.columns.clone(),
    };
    session.clean(&options)?;
    let after = session
        .cleaned_summary()
        .context("no cleaned dataset after a successful clean")?;

    let download = session.download()?;
    if !args.output.exists() {
        std::fs::create_dir_all(&args.output)
            .with_context(|| format!("creating {}", args.output.display()))?;
        info!("Created output directory: {}", args.output.display());
    }
    let out_path = args.output.join(&download.file_name);
    std::fs::write(&out_path, &download.bytes)
        .with_context(|| format!("writing {}", out_path.display()))?;
    info!("Cleaned dataset written to {}", out_path.display());

    if args.json {
        print_json(&Report {
            file,
            strategy: options.strategy,
            before,
            after: Some(after),
            output: Some(out_path),
        })?;
    } else {
        print_summary("BEFORE", &before);
        print_summary(&format!("AFTER ({})", options.strategy), &after);
        println!("Written: {}", out_path.display());
    }
    Ok(())
}

fn print_json(report: &Report) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Human-readable summary table.
///
/// Uses `println!` rather than `tracing` so the table shows regardless of log level.
fn print_summary(title: &str, summary: &MissingSummary) {
    println!("{title}");
    println!("{}", "-".repeat(40));
    println!(
        "  Rows: {}  Columns: {}  Missing: {}",
        summary.total_rows,
        summary.total_columns,
        summary.total_missing()
    );
    for col in &summary.per_column {
        println!(
            "  {:<20} {:>6} {:>7.1}%",
            truncate_str(&col.name, 19),
            col.missing_count,
            col.missing_percentage
        );
    }
    println!();
}

fn print_profiles(session: &Session) {
    let Some(profiles) = session.profile() else {
        return;
    };
    println!("COLUMN PROFILES");
    println!("{}", "-".repeat(40));
    for p in &profiles {
        let kind = match p.kind {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
            ColumnKind::Empty => "empty",
        };
        println!("  {:<20} {:<8} unique={}", truncate_str(&p.name, 19), kind, p.unique);
    }
    if let Some(rec) = session.knn_recommendation() {
        match (rec.recommended, rec.n_neighbors) {
            (true, Some(k)) => println!("  knn: recommended with {k} neighbors"),
            _ => println!(
                "  knn: not recommended ({})",
                rec.reason.as_deref().unwrap_or("-")
            ),
        }
    }
    println!();
}

fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}~")
    }
}
