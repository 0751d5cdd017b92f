use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::storage::Mover;

/// Outcome of registering a file's digest with the store.
#[derive(Debug, PartialEq, Eq)]
pub enum Registration {
    /// First file seen with this digest; it stays where it is.
    Canonical,
    /// The digest was already claimed; the file has been relocated into
    /// the duplicate bucket at the contained path.
    Duplicate(PathBuf),
}

/// Record written into a canonical slot marker.
#[derive(Debug, Serialize, Deserialize)]
struct SlotRecord {
    /// Where the canonical copy lives.
    path: PathBuf,
    /// When the slot was claimed (RFC 3339).
    registered_at: String,
}

/// Content-addressed duplicate store.
///
/// The index is the filesystem itself: a digest's canonical slot is a
/// marker file named by the full digest at the store root. Claiming the
/// slot uses `create_new`, so check-and-create is a single atomic step
/// per digest — two tasks registering the same digest concurrently can
/// never both observe an empty slot. Non-canonical copies are relocated
/// into a two-level hex-prefix bucket beneath the root.
pub struct DuplicateStore {
    root: PathBuf,
    mover: Mover,
}

impl DuplicateStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            mover: Mover::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Registers `path` under `digest`.
    ///
    /// If no canonical slot exists for the digest, a marker recording
    /// `path` is created and the file stays put. Otherwise the file is
    /// moved into `<root>/<hex[0..2]>/<hex[2..4]>/<digest>/`.
    pub fn register(&self, path: &Path, digest: &str) -> Result<Registration, StorageError> {
        if digest.len() < 4 {
            return Err(StorageError::BadDigest(digest.to_string()));
        }

        std::fs::create_dir_all(&self.root).map_err(|e| StorageError::CreateDirectory {
            path: self.root.clone(),
            source: e,
        })?;

        let slot = self.root.join(digest);

        // create_new is the atomic check-and-create: exactly one caller
        // per digest gets Ok here.
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&slot)
        {
            Ok(mut marker) => {
                let record = SlotRecord {
                    path: path.to_path_buf(),
                    registered_at: Utc::now().to_rfc3339(),
                };
                let body =
                    serde_json::to_vec(&record).map_err(|e| StorageError::RegisterSlot {
                        path: slot.clone(),
                        source: e.into(),
                    })?;
                marker
                    .write_all(&body)
                    .map_err(|e| StorageError::RegisterSlot {
                        path: slot.clone(),
                        source: e,
                    })?;

                debug!("Claimed canonical slot {} for {}", digest, path.display());
                Ok(Registration::Canonical)
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                let bucket = self.bucket_dir(digest);
                let moved = self.mover.move_to_dir(path, &bucket)?;
                info!(
                    "Duplicate of {}: {} -> {}",
                    digest,
                    path.display(),
                    moved.display()
                );
                Ok(Registration::Duplicate(moved))
            }
            Err(e) => Err(StorageError::RegisterSlot { path: slot, source: e }),
        }
    }

    /// Bucket directory for non-canonical copies of a digest.
    fn bucket_dir(&self, digest: &str) -> PathBuf {
        self.root.join(&digest[..2]).join(&digest[2..4]).join(digest)
    }
}
