use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use doctriage::operator::StdinPrompt;
use doctriage::pipeline::PipelineConfig;
use doctriage::run::run_scan;

#[derive(Parser)]
#[command(version, about = "Triage a directory of files: dedup, classify, escalate")]
struct Cli {
    /// Directory to scan for files
    #[arg(long)]
    source: PathBuf,

    /// Directory that receives duplicate copies and digest slots
    #[arg(long)]
    duplicates: PathBuf,

    /// Directory for categorized output
    #[arg(long, default_value = "categorized")]
    categorized: PathBuf,

    /// Directory for files deferred by the operator
    #[arg(long, default_value = "review_later")]
    review: PathBuf,

    /// Category definitions, created with defaults if missing
    #[arg(long, default_value = "categories.json")]
    categories: PathBuf,

    /// Worker threads; 0 means one per CPU
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Directory for the rotating log file
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard = doctriage::logging::init(&cli.log_dir).context("installing logging")?;

    if !cli.source.is_dir() {
        bail!("source {} is not a directory", cli.source.display());
    }

    // The review queue must exist even when no file lands there, so an
    // operator can always check it after a run.
    std::fs::create_dir_all(&cli.review)
        .with_context(|| format!("creating review directory {}", cli.review.display()))?;

    let workers = if cli.workers == 0 {
        num_cpus::get()
    } else {
        cli.workers
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        eprintln!("Interrupt received, finishing in-flight files...");
        cancel_flag.store(true, Ordering::Relaxed);
    })
    .context("installing interrupt handler")?;

    let config = PipelineConfig {
        source_directory: cli.source,
        categorized_directory: cli.categorized,
        review_directory: cli.review,
        duplicates_directory: cli.duplicates,
        categories_path: cli.categories,
        preview_limit: doctriage::pipeline::config::DEFAULT_PREVIEW_LIMIT,
    };

    info!("Starting scan of {}", config.source_directory.display());
    let summary = run_scan(config, workers, Box::new(StdinPrompt), cancel)?;

    println!("Files discovered:  {}", summary.total);
    println!("Categorized:       {}", summary.categorized);
    println!("Deferred to review: {}", summary.review);
    println!("Duplicates:        {}", summary.duplicates);
    println!("Failed:            {}", summary.failed);
    if summary.skipped > 0 {
        println!("Skipped (cancelled): {}", summary.skipped);
    }

    // Per-file failures are reported in the summary, not the exit code.
    Ok(())
}
