use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tracing::{debug, error, info, info_span, warn};

use crate::categories::CategoryStore;
use crate::classifier::Classifier;
use crate::dedup::{DuplicateStore, Registration};
use crate::extractor::TextExtractor;
use crate::hasher;
use crate::operator::{truncate_preview, Decision, OperatorHandle, Review};
use crate::sanitize;
use crate::storage::Mover;
use crate::worker::job::{Job, JobOutcome, JobResult};

use super::config::PipelineConfig;
use super::context::TaskContext;
use super::error::PipelineError;
use super::progress::{ProgressEvent, ProgressReporter, TaskPhase};

/// The per-file pipeline: hash, classify, route, move, register.
///
/// One instance is shared by all workers. Everything here is either
/// immutable (classifier, config), internally synchronized (category
/// store behind its lock, the operator desk behind its channel), or
/// atomic at the filesystem level (duplicate slots).
pub struct Pipeline {
    config: Arc<PipelineConfig>,
    categories: Arc<RwLock<CategoryStore>>,
    classifier: Classifier,
    extractor: Box<dyn TextExtractor>,
    operator: OperatorHandle,
    mover: Mover,
    dedup: DuplicateStore,
}

impl Pipeline {
    pub fn new(
        config: Arc<PipelineConfig>,
        categories: Arc<RwLock<CategoryStore>>,
        classifier: Classifier,
        extractor: Box<dyn TextExtractor>,
        operator: OperatorHandle,
    ) -> Self {
        let dedup = DuplicateStore::new(&config.duplicates_directory);
        Self {
            config,
            categories,
            classifier,
            extractor,
            operator,
            mover: Mover::new(),
            dedup,
        }
    }

    /// Runs the full pipeline for a single file. Every failure is caught
    /// here and becomes a failed `JobResult`; nothing propagates out to
    /// abort the scan or a sibling task.
    pub fn run(&self, job: Job, progress: &dyn ProgressReporter) -> JobResult {
        let filename = sanitize::redact_path(&job.source_path);
        let _task_span = info_span!("task",
            job_id = %job.id,
            filename = %filename,
            path_hash = %sanitize::hash_path(&job.source_path),
        )
        .entered();

        let mut ctx = TaskContext::new(job);

        // Step 1: digest at the original path, before any move. A failed
        // hash is not fatal — it just disables duplicate detection.
        {
            let _step = info_span!("hash").entered();
            progress.report(ProgressEvent::Phase {
                phase: TaskPhase::Hashing,
                message: "Computing content digest...".to_string(),
            });
            self.step_hash(&mut ctx);
        }

        // Step 2: extract text and predict a label
        {
            let _step = info_span!("classify").entered();
            progress.report(ProgressEvent::Phase {
                phase: TaskPhase::Classifying,
                message: "Extracting text and classifying...".to_string(),
            });
            if let Err(e) = self.step_classify(&mut ctx) {
                return self.fail(&ctx, "classify", e, progress);
            }
        }

        // Step 3: resolve the destination category, consulting the
        // operator when the classifier came up empty
        {
            let _step = info_span!("route").entered();
            self.step_route(&mut ctx, progress);
        }

        // Step 4: one move to the resolved destination
        let destination = {
            let _step = info_span!("move").entered();
            progress.report(ProgressEvent::Phase {
                phase: TaskPhase::Moving,
                message: "Moving file...".to_string(),
            });
            match self.step_move(&mut ctx) {
                Ok(destination) => destination,
                Err(e) => return self.fail(&ctx, "move", e, progress),
            }
        };

        // Step 5: register the digest computed in step 1 against the
        // file's current location
        let (outcome, destination) = {
            let _step = info_span!("register").entered();
            match self.step_register(&mut ctx, destination, progress) {
                Ok(placed) => placed,
                Err(e) => return self.fail(&ctx, "register", e, progress),
            }
        };

        progress.report(ProgressEvent::Completed {
            destination: destination.display().to_string(),
            category: ctx.category.clone(),
            duplicate: matches!(outcome, JobOutcome::Duplicate(_)),
        });

        JobResult::placed(&ctx.job, outcome, destination)
    }

    fn step_hash(&self, ctx: &mut TaskContext) {
        match hasher::digest_file(&ctx.job.source_path) {
            Ok(digest) => ctx.digest = Some(digest),
            Err(e) => {
                // Sentinel semantics: no digest means duplicate
                // detection is skipped for this file.
                warn!("Hash failed, skipping duplicate detection: {}", e);
                ctx.digest = None;
            }
        }
    }

    fn step_classify(&self, ctx: &mut TaskContext) -> Result<(), PipelineError> {
        let text = self.extractor.extract(&ctx.job.source_path)?;
        ctx.predicted = self.classifier.predict(&text);
        ctx.text = Some(text);
        Ok(())
    }

    fn step_route(&self, ctx: &mut TaskContext, progress: &dyn ProgressReporter) {
        // A predicted label only routes if it matches a live category
        // name, so operator-added categories count for later files too.
        if let Some(label) = &ctx.predicted {
            if let Ok(store) = self.categories.read() {
                if let Some(category) = store.match_label(label) {
                    debug!(category = %category, "Classifier matched");
                    ctx.category = Some(category);
                    return;
                }
            }
        }

        progress.report(ProgressEvent::Phase {
            phase: TaskPhase::AwaitingOperator,
            message: "Awaiting operator decision...".to_string(),
        });

        let (preview, truncated) = match ctx.text.as_deref() {
            Some(text) => {
                let preview = truncate_preview(text, self.config.preview_limit);
                let truncated = preview.len() < text.len();
                (preview, truncated)
            }
            None => (String::new(), false),
        };
        let review = Review {
            path: ctx.job.source_path.clone(),
            mime_type: ctx.job.mime_type.clone(),
            preview,
            truncated,
        };

        match self.operator.consult(review) {
            Ok(Decision::NewCategory(name)) => {
                let name = name.trim().to_lowercase();
                self.record_new_category(&name);
                ctx.category = Some(name);
            }
            Ok(Decision::ReviewLater) => {
                ctx.category = None;
            }
            Err(e) => {
                // Desk gone (shutdown mid-scan): defer rather than fail.
                warn!("Operator unavailable, deferring to review: {}", e);
                ctx.category = None;
            }
        }
    }

    /// Adds an operator-supplied category under the write lock and
    /// persists the store wholesale.
    fn record_new_category(&self, name: &str) {
        if name.is_empty() {
            return;
        }
        match self.categories.write() {
            Ok(mut store) => {
                if store.add(name) {
                    info!("Operator added category '{}'", name);
                    if let Err(e) = store.save(&self.config.categories_path) {
                        warn!("Failed to persist categories: {}", e);
                    }
                }
            }
            Err(_) => warn!("Category store lock poisoned, not adding '{}'", name),
        }
    }

    fn step_move(&self, ctx: &mut TaskContext) -> Result<PathBuf, PipelineError> {
        let dest_dir = match &ctx.category {
            Some(category) => self.config.categorized_directory.join(category),
            None => self.config.review_directory.clone(),
        };

        let destination = self
            .mover
            .move_to_dir(&ctx.job.source_path, &dest_dir)
            .map_err(PipelineError::Move)?;

        debug!(
            "Moved {} -> {}",
            sanitize::redact_path(&ctx.job.source_path),
            sanitize::redact_path(&destination),
        );
        ctx.destination = Some(destination.clone());
        Ok(destination)
    }

    fn step_register(
        &self,
        ctx: &mut TaskContext,
        destination: PathBuf,
        progress: &dyn ProgressReporter,
    ) -> Result<(JobOutcome, PathBuf), PipelineError> {
        let placed = match &ctx.category {
            Some(category) => JobOutcome::Categorized(category.clone()),
            None => JobOutcome::Review,
        };

        // No digest: duplicate detection was skipped in step 1.
        let Some(digest) = ctx.digest.clone() else {
            return Ok((placed, destination));
        };

        progress.report(ProgressEvent::Phase {
            phase: TaskPhase::RegisteringDuplicate,
            message: "Registering content digest...".to_string(),
        });

        match self
            .dedup
            .register(&destination, &digest)
            .map_err(PipelineError::DuplicateRegistration)?
        {
            Registration::Canonical => Ok((placed, destination)),
            Registration::Duplicate(relocated) => {
                ctx.destination = Some(relocated.clone());
                Ok((JobOutcome::Duplicate(digest), relocated))
            }
        }
    }

    fn fail(
        &self,
        ctx: &TaskContext,
        stage: &str,
        err: PipelineError,
        progress: &dyn ProgressReporter,
    ) -> JobResult {
        let message = format!("{}: {}", stage, err);
        error!(
            "Task failed at {} for {}: {}",
            stage,
            ctx.job.source_path.display(),
            err
        );
        progress.report(ProgressEvent::Failed {
            error: message.clone(),
        });
        JobResult::failure(&ctx.job, message)
    }
}
