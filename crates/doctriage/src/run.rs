use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use log::{info, warn};
use tracing::info_span;

use crate::categories::CategoryStore;
use crate::classifier::Classifier;
use crate::error::Result;
use crate::extractor::{PlainTextExtractor, TextExtractor};
use crate::operator::{OperatorDesk, OperatorPrompt};
use crate::pipeline::{Pipeline, PipelineConfig, ProgressCounter};
use crate::worker::job::JobOutcome;
use crate::worker::{DirectoryScanner, WorkerPool};

/// Tally of one scan, one increment per discovered file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub total: usize,
    pub categorized: usize,
    pub review: usize,
    pub duplicates: usize,
    pub failed: usize,
    /// Files discovered but never submitted (cancelled scan).
    pub skipped: usize,
}

impl ScanSummary {
    fn record(&mut self, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Categorized(_) => self.categorized += 1,
            JobOutcome::Review => self.review += 1,
            JobOutcome::Duplicate(_) => self.duplicates += 1,
            JobOutcome::Failed => self.failed += 1,
        }
    }
}

/// Scans the source directory and runs every discovered file through
/// the pipeline on `worker_count` threads.
///
/// Returns once every submitted job has produced a result. A raised
/// `cancel` flag stops submission; jobs already in flight still finish
/// and are tallied.
pub fn run_scan(
    config: PipelineConfig,
    worker_count: usize,
    prompt: Box<dyn OperatorPrompt>,
    cancel: Arc<AtomicBool>,
) -> Result<ScanSummary> {
    let _span = info_span!("scan", source = %config.source_directory.display()).entered();

    let scanner = DirectoryScanner::new(&config.source_directory);
    let jobs = scanner.scan()?;

    let mut summary = ScanSummary {
        total: jobs.len(),
        ..ScanSummary::default()
    };
    if jobs.is_empty() {
        info!("No files found in {}", config.source_directory.display());
        return Ok(summary);
    }
    info!("Found {} files to process", jobs.len());

    let categories = CategoryStore::load(&config.categories_path)?;
    let classifier = Classifier::train(&categories)?;
    let categories = Arc::new(RwLock::new(categories));

    let desk = OperatorDesk::spawn(prompt);
    let extractor: Box<dyn TextExtractor> = Box::new(PlainTextExtractor::new());
    let pipeline = Arc::new(Pipeline::new(
        Arc::new(config),
        categories,
        classifier,
        extractor,
        desk.handle(),
    ));

    let pool = WorkerPool::new(pipeline, worker_count);
    let counter = ProgressCounter::new(jobs.len());
    let submitted = AtomicUsize::new(0);
    let dispatch_done = AtomicBool::new(false);

    // Bounded queues: submission blocks once the queue fills, so it runs
    // on its own thread while this one drains results.
    std::thread::scope(|s| {
        s.spawn(|| {
            for job in jobs {
                if cancel.load(Ordering::Relaxed) {
                    warn!("Scan cancelled, no further files will be submitted");
                    break;
                }
                match pool.submit(job) {
                    Ok(()) => {
                        submitted.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => {
                        warn!("Submission stopped: {}", e);
                        break;
                    }
                }
            }
            dispatch_done.store(true, Ordering::SeqCst);
        });

        loop {
            if dispatch_done.load(Ordering::SeqCst)
                && counter.completed() >= submitted.load(Ordering::SeqCst)
            {
                break;
            }

            let Some(result) = pool.recv_result_timeout(Duration::from_millis(100)) else {
                continue;
            };

            summary.record(&result.outcome);
            let done = counter.record();
            info!(
                "Processed {}/{}: {} -> {:?}",
                done,
                counter.total(),
                result.source_path.display(),
                result.outcome,
            );
        }
    });

    summary.skipped = summary.total - submitted.load(Ordering::SeqCst);

    pool.shutdown();
    pool.wait();
    desk.close();

    info!(
        "Scan complete: {} categorized, {} review, {} duplicates, {} failed, {} skipped",
        summary.categorized, summary.review, summary.duplicates, summary.failed, summary.skipped,
    );

    Ok(summary)
}
