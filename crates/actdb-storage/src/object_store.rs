//! The content-addressed blob store.
//!
//! A blob's address is the MD5 key of its canonical JSON bytes, fanned out
//! as `root/prefix/k[0]/k[1]/k[2..].json.gz` to bound per-directory entry
//! counts. Saving is idempotent: a blob that already exists is never
//! rewritten, which is the entire deduplication story — equal content,
//! equal key, one file.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use actdb_core::{CanonicalBytes, ObjectKey};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::StorageError;

/// One gzip blob store under `root/prefix/`.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
    prefix: String,
}

impl ObjectStore {
    /// A store rooted at `root/prefix/`.
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    fn object_path(&self, key: &ObjectKey) -> PathBuf {
        let (a, b, rest) = key.path_segments();
        self.root
            .join(&self.prefix)
            .join(a)
            .join(b)
            .join(format!("{rest}.json.gz"))
    }

    /// Save canonical bytes, returning their content key. A blob that
    /// already exists under the computed key is left untouched.
    pub fn save(&self, data: &CanonicalBytes) -> Result<ObjectKey, StorageError> {
        let key = ObjectKey::compute(data);
        let path = self.object_path(&key);
        if path.exists() {
            return Ok(key);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_gz(&path, data.as_bytes())?;
        Ok(key)
    }

    /// Load the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// `StorageError::NotFound` when no such blob exists.
    pub fn load(&self, key: &ObjectKey) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(key);
        if !path.exists() {
            return Err(StorageError::NotFound(key.clone()));
        }
        read_gz(&path)
    }
}

/// Write gzip-compressed bytes to `path`.
pub(crate) fn write_gz(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let file = fs::File::create(path)?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()?;
    Ok(())
}

/// Read gzip-compressed bytes from `path`.
pub(crate) fn read_gz(path: &Path) -> Result<Vec<u8>, StorageError> {
    let file = fs::File::open(path)?;
    let mut decoder = GzDecoder::new(file);
    let mut buf = Vec::new();
    decoder.read_to_end(&mut buf)?;
    Ok(buf)
}
