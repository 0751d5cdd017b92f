use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub source_path: PathBuf,
    /// MIME type guessed from the path (e.g., "application/pdf").
    pub mime_type: Option<String>,
}

impl Job {
    pub fn new(source_path: PathBuf) -> Self {
        let mime_type = Self::detect_mime_type(&source_path);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_path,
            mime_type,
        }
    }

    /// Detects MIME type from file path using the mime_guess crate.
    /// Returns `None` for unknown extensions.
    fn detect_mime_type(path: &Path) -> Option<String> {
        mime_guess::from_path(path).first().map(|m| m.to_string())
    }
}

/// Where a finished task's file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Placed under `categorized/<category>`.
    Categorized(String),
    /// Deferred to the review queue.
    Review,
    /// Relocated into the duplicate bucket after an initial placement.
    Duplicate(String),
    /// Task failed; the file stayed wherever the failing stage left it.
    Failed,
}

#[derive(Debug)]
pub struct JobResult {
    pub job_id: String,
    pub source_path: PathBuf,
    pub outcome: JobOutcome,
    /// Final resting place, when a move happened.
    pub destination: Option<PathBuf>,
    pub error: Option<String>,
}

impl JobResult {
    pub fn placed(job: &Job, outcome: JobOutcome, destination: PathBuf) -> Self {
        Self {
            job_id: job.id.clone(),
            source_path: job.source_path.clone(),
            outcome,
            destination: Some(destination),
            error: None,
        }
    }

    pub fn failure(job: &Job, error: String) -> Self {
        Self {
            job_id: job.id.clone(),
            source_path: job.source_path.clone(),
            outcome: JobOutcome::Failed,
            destination: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome != JobOutcome::Failed
    }
}
