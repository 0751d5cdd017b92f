use std::path::Path;

use crate::error::ProcessError;

/// Converts a file into plain text for classification and review.
///
/// This is the seam for OCR/PDF backends; the pipeline only ever sees
/// this trait. The default implementation reads the raw bytes and decodes
/// them lossily, which is sufficient for text-like documents and yields a
/// harmless (if garbled) preview for binary ones.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ProcessError>;
}

pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ProcessError> {
        let bytes = std::fs::read(path).map_err(|e| ProcessError::Extract {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
