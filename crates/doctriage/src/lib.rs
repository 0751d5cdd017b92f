pub mod categories;
pub mod classifier;
pub mod dedup;
pub mod error;
pub mod extractor;
pub mod hasher;
pub mod logging;
pub mod operator;
pub mod pipeline;
pub mod run;
pub mod sanitize;
pub mod storage;
pub mod worker;

pub use categories::CategoryStore;
pub use classifier::Classifier;
pub use dedup::{DuplicateStore, Registration};
pub use error::{
    ClassifierError, ConfigError, ProcessError, Result, StorageError, TriageError, WorkerError,
};
pub use operator::{Decision, OperatorDesk, OperatorHandle, OperatorPrompt, Review, StdinPrompt};
pub use pipeline::{Pipeline, PipelineConfig, TaskContext};
pub use run::{run_scan, ScanSummary};
