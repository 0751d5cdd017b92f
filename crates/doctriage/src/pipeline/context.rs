use std::path::PathBuf;

use crate::worker::job::Job;

/// Per-file task state, mutated in place as pipeline stages attach
/// results. The task ends the moment the file reaches a terminal
/// directory; after that the source path is invalid.
pub struct TaskContext {
    // Input
    pub job: Job,

    // Step 1 result — None means the hash failed and duplicate
    // detection is skipped for this file
    pub digest: Option<String>,

    // Step 2 results
    pub text: Option<String>,
    pub predicted: Option<String>,

    // Step 3 result — None routes to the review queue
    pub category: Option<String>,

    // Step 4 result — where the first move landed
    pub destination: Option<PathBuf>,
}

impl TaskContext {
    pub fn new(job: Job) -> Self {
        Self {
            job,
            digest: None,
            text: None,
            predicted: None,
            category: None,
            destination: None,
        }
    }
}
