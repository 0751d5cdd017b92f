pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod runner;

pub use config::PipelineConfig;
pub use context::TaskContext;
pub use error::PipelineError;
pub use progress::{
    LogProgress, NoopProgress, ProgressCounter, ProgressEvent, ProgressReporter, TaskPhase,
};
pub use runner::Pipeline;
