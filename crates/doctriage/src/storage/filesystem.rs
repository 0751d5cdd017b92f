use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Move a file from `src` to `dst`. Uses `rename` first (fast, atomic on
/// same filesystem). Falls back to copy + delete when rename fails — this
/// handles cross-device moves and certain macOS permission scenarios.
fn move_file(src: &Path, dst: &Path) -> Result<(), StorageError> {
    // Fast path: atomic rename
    if std::fs::rename(src, dst).is_ok() {
        return Ok(());
    }

    // Slow path: copy then remove original
    std::fs::copy(src, dst).map_err(|e| StorageError::MoveFile {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source: e,
    })?;
    std::fs::remove_file(src).map_err(|e| StorageError::MoveFile {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Relocates files into destination directories, creating them as needed
/// and resolving filename collisions with numbered suffixes.
pub struct Mover;

impl Mover {
    pub fn new() -> Self {
        Self
    }

    /// Moves `src` into `dest_dir`, keeping its filename. Returns the
    /// final path, which carries a `_2`, `_3`… suffix when the original
    /// name was taken.
    pub fn move_to_dir(&self, src: &Path, dest_dir: &Path) -> Result<PathBuf, StorageError> {
        self.ensure_directory(dest_dir)?;

        let filename = src
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file");

        let dest = self.resolve_conflict(dest_dir, filename)?;
        move_file(src, &dest)?;
        Ok(dest)
    }

    fn ensure_directory(&self, path: &Path) -> Result<(), StorageError> {
        if !path.exists() {
            std::fs::create_dir_all(path).map_err(|e| StorageError::CreateDirectory {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Resolves filename conflicts by finding an available name.
    /// Note: this returns a candidate path. A file created at that path by
    /// another process between the check and the move loses to the move,
    /// which is the same window the rename itself has.
    fn resolve_conflict(&self, directory: &Path, filename: &str) -> Result<PathBuf, StorageError> {
        let path = directory.join(filename);

        // symlink_metadata detects broken symlinks as "taken" too
        if std::fs::symlink_metadata(&path).is_err() {
            return Ok(path);
        }

        let (base, ext) = if let Some(dot_pos) = filename.rfind('.') {
            (&filename[..dot_pos], Some(&filename[dot_pos..]))
        } else {
            (filename, None)
        };

        for counter in 2..=1000 {
            let new_filename = match ext {
                Some(ext) => format!("{}_{}{}", base, counter, ext),
                None => format!("{}_{}", base, counter),
            };

            let new_path = directory.join(&new_filename);
            if std::fs::symlink_metadata(&new_path).is_err() {
                return Ok(new_path);
            }
        }

        Err(StorageError::FileExists(path))
    }
}

impl Default for Mover {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_move_creates_destination_directory() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("doc.txt");
        std::fs::write(&src, b"content").unwrap();

        let dest_dir = tmp.path().join("categorized/finance");
        let moved = Mover::new().move_to_dir(&src, &dest_dir).unwrap();

        assert!(!src.exists());
        assert!(moved.exists());
        assert_eq!(moved, dest_dir.join("doc.txt"));
        assert_eq!(std::fs::read(&moved).unwrap(), b"content");
    }

    #[test]
    fn test_move_resolves_name_collisions() {
        let tmp = TempDir::new().unwrap();
        let dest_dir = tmp.path().join("out");
        let mover = Mover::new();

        for i in 1..=3 {
            let src = tmp.path().join("doc.txt");
            std::fs::write(&src, format!("content {}", i)).unwrap();
            mover.move_to_dir(&src, &dest_dir).unwrap();
        }

        assert!(dest_dir.join("doc.txt").exists());
        assert!(dest_dir.join("doc_2.txt").exists());
        assert!(dest_dir.join("doc_3.txt").exists());
    }

    #[test]
    fn test_move_collision_without_extension() {
        let tmp = TempDir::new().unwrap();
        let dest_dir = tmp.path().join("out");
        let mover = Mover::new();

        for _ in 0..2 {
            let src = tmp.path().join("README");
            std::fs::write(&src, b"x").unwrap();
            mover.move_to_dir(&src, &dest_dir).unwrap();
        }

        assert!(dest_dir.join("README").exists());
        assert!(dest_dir.join("README_2").exists());
    }

    #[test]
    fn test_move_missing_source_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = Mover::new().move_to_dir(&tmp.path().join("nope.txt"), &tmp.path().join("out"));

        assert!(matches!(result, Err(StorageError::MoveFile { .. })));
    }
}
