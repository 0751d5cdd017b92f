use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::WorkerError;
use crate::worker::job::Job;

pub struct DirectoryScanner {
    source_directory: PathBuf,
}

impl DirectoryScanner {
    pub fn new<P: AsRef<Path>>(source_directory: P) -> Self {
        Self {
            source_directory: source_directory.as_ref().to_path_buf(),
        }
    }

    pub fn source_directory(&self) -> &Path {
        &self.source_directory
    }

    /// Enumerates every regular file under the source root, recursively.
    /// The returned count is also the progress total: one job per file.
    pub fn scan(&self) -> Result<Vec<Job>, WorkerError> {
        let mut jobs = Vec::new();

        for entry in WalkDir::new(&self.source_directory).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    // The root itself is missing or unreadable.
                    return Err(WorkerError::ScanFailed {
                        path: self.source_directory.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    // A vanished or unreadable entry shouldn't sink the
                    // whole scan; it's logged and skipped.
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            debug!("Found file: {}", entry.path().display());
            jobs.push(Job::new(entry.path().to_path_buf()));
        }

        info!(
            "Scanned {} files in {}",
            jobs.len(),
            self.source_directory.display()
        );
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = DirectoryScanner::new(temp_dir.path());

        let jobs = scanner.scan().unwrap();
        assert!(jobs.is_empty());
    }

    #[test]
    fn test_scan_collects_all_regular_files() {
        let temp_dir = TempDir::new().unwrap();

        std::fs::write(temp_dir.path().join("doc1.pdf"), b"PDF content").unwrap();
        std::fs::write(temp_dir.path().join("doc2.txt"), b"Text content").unwrap();
        std::fs::write(temp_dir.path().join("no_extension"), b"bytes").unwrap();

        let scanner = DirectoryScanner::new(temp_dir.path());
        let jobs = scanner.scan().unwrap();

        assert_eq!(jobs.len(), 3);
    }

    #[test]
    fn test_scan_recurses_into_subdirectories() {
        let temp_dir = TempDir::new().unwrap();

        let sub_dir = temp_dir.path().join("a/b");
        std::fs::create_dir_all(&sub_dir).unwrap();
        std::fs::write(sub_dir.join("nested.txt"), b"Nested").unwrap();
        std::fs::write(temp_dir.path().join("top.txt"), b"Top").unwrap();

        let scanner = DirectoryScanner::new(temp_dir.path());
        let jobs = scanner.scan().unwrap();

        assert_eq!(jobs.len(), 2);
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = DirectoryScanner::new(temp_dir.path().join("does-not-exist"));

        assert!(matches!(
            scanner.scan(),
            Err(WorkerError::ScanFailed { .. })
        ));
    }

    #[test]
    fn test_scan_skips_directories_themselves() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("only/dirs/here")).unwrap();

        let scanner = DirectoryScanner::new(temp_dir.path());
        let jobs = scanner.scan().unwrap();

        assert!(jobs.is_empty());
    }
}
