use std::path::{Path, PathBuf};

/// Characters of extracted text shown to the operator.
pub const DEFAULT_PREVIEW_LIMIT: usize = 500;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root of the unsorted tree being triaged.
    pub source_directory: PathBuf,
    /// Classified files land under `<categorized_directory>/<category>`.
    pub categorized_directory: PathBuf,
    /// Deferred files land here.
    pub review_directory: PathBuf,
    /// Root of the content-addressed duplicate store.
    pub duplicates_directory: PathBuf,
    /// Persisted category definitions (JSON).
    pub categories_path: PathBuf,
    /// Preview truncation for operator prompts.
    pub preview_limit: usize,
}

impl PipelineConfig {
    pub fn new<P: AsRef<Path>>(source_directory: P, duplicates_directory: P) -> Self {
        Self {
            source_directory: source_directory.as_ref().to_path_buf(),
            categorized_directory: PathBuf::from("categorized"),
            review_directory: PathBuf::from("review_later"),
            duplicates_directory: duplicates_directory.as_ref().to_path_buf(),
            categories_path: PathBuf::from("categories.json"),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
        }
    }
}
