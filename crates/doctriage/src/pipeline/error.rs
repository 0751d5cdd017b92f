use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Text extraction failed: {0}")]
    Extraction(#[from] crate::error::ProcessError),

    #[error("Move failed: {0}")]
    Move(crate::error::StorageError),

    #[error("Duplicate registration failed: {0}")]
    DuplicateRegistration(crate::error::StorageError),
}
