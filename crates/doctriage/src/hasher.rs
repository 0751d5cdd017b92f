use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::ProcessError;

/// Files at or below this size are hashed in full.
pub const FULL_HASH_LIMIT: u64 = 10 * 1024 * 1024;

/// Sample window read from each end of a large file.
const SAMPLE_SIZE: u64 = 8 * 1024;

/// Computes a lowercase hex SHA-256 digest identifying a file's content.
///
/// Files up to [`FULL_HASH_LIMIT`] are hashed byte-for-byte in fixed-size
/// chunks. Larger files are *sampled*: only the first and last
/// [`SAMPLE_SIZE`] bytes enter the digest. This is a deliberate throughput
/// trade-off with a known weakness: two large files that differ only in
/// their interior bytes produce the same digest. The digest is a duplicate
/// heuristic for large files, not a proof of identity.
///
/// Callers must treat a hash failure as "duplicate detection skipped" for
/// this file, never as a valid identity.
pub fn digest_file(path: &Path) -> Result<String, ProcessError> {
    let hash_err = |source: std::io::Error| ProcessError::Hash {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(hash_err)?;
    let len = file.metadata().map_err(hash_err)?.len();

    let mut hasher = Sha256::new();
    let mut buf = [0u8; SAMPLE_SIZE as usize];

    if len > FULL_HASH_LIMIT {
        file.read_exact(&mut buf).map_err(hash_err)?;
        hasher.update(buf);

        file.seek(SeekFrom::End(-(SAMPLE_SIZE as i64)))
            .map_err(hash_err)?;
        file.read_exact(&mut buf).map_err(hash_err)?;
        hasher.update(buf);
    } else {
        loop {
            let n = file.read(&mut buf).map_err(hash_err)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_identical_small_files_share_digest() {
        let tmp = TempDir::new().unwrap();
        let a = write_file(tmp.path(), "a.txt", b"same bytes");
        let b = write_file(tmp.path(), "b.txt", b"same bytes");

        assert_eq!(digest_file(&a).unwrap(), digest_file(&b).unwrap());
    }

    #[test]
    fn test_different_small_files_differ() {
        let tmp = TempDir::new().unwrap();
        let a = write_file(tmp.path(), "a.txt", b"alpha");
        let b = write_file(tmp.path(), "b.txt", b"bravo");

        assert_ne!(digest_file(&a).unwrap(), digest_file(&b).unwrap());
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let tmp = TempDir::new().unwrap();
        let a = write_file(tmp.path(), "a.txt", b"");
        let digest = digest_file(&a).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        // SHA-256 of the empty string
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_large_files_differing_only_in_interior_collide() {
        // Documented sampling limitation: files over the threshold are
        // identified by their first and last 8 KiB only.
        let tmp = TempDir::new().unwrap();
        let size = (FULL_HASH_LIMIT + 4096) as usize;

        let mut first = vec![0u8; size];
        let mut second = vec![0u8; size];
        first[size / 2] = 1;
        second[size / 2] = 2;

        let a = write_file(tmp.path(), "big_a.bin", &first);
        let b = write_file(tmp.path(), "big_b.bin", &second);

        assert_eq!(digest_file(&a).unwrap(), digest_file(&b).unwrap());
    }

    #[test]
    fn test_large_files_differing_at_edges_do_not_collide() {
        let tmp = TempDir::new().unwrap();
        let size = (FULL_HASH_LIMIT + 4096) as usize;

        let first = vec![0u8; size];
        let mut second = vec![0u8; size];
        second[0] = 1;

        let a = write_file(tmp.path(), "big_a.bin", &first);
        let b = write_file(tmp.path(), "big_b.bin", &second);

        assert_ne!(digest_file(&a).unwrap(), digest_file(&b).unwrap());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = digest_file(&tmp.path().join("nope.txt"));
        assert!(matches!(result, Err(ProcessError::Hash { .. })));
    }
}
