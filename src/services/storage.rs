//! Object storage for uploaded images.
//!
//! The blob store is an external collaborator reached through
//! [`ObjectStore`]. [`LocalObjectStore`] keeps objects under a directory on
//! disk, which is what the server uses unless another backend is wired in.

use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use sha2::{Digest, Sha256};

/// An object read back from storage.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub content_type: String,
    pub etag: String,
    pub bytes: Vec<u8>,
}

impl StoredObject {
    pub fn new(key: &str, bytes: Vec<u8>) -> Self {
        Self {
            key: key.to_string(),
            content_type: content_type_for(key).to_string(),
            etag: etag_for(&bytes),
            bytes,
        }
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any previous object.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> io::Result<()>;

    /// Fetch an object. Unknown or malformed keys yield `None`.
    async fn get(&self, key: &str) -> io::Result<Option<StoredObject>>;
}

/// Object keys are flat file names: ASCII alphanumerics, `-`, `_` and `.`,
/// never starting with a dot.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 200
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Content type guessed from the key's extension.
pub fn content_type_for(key: &str) -> &'static str {
    let extension = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Content hash used for the `ETag` and the served file name.
pub fn etag_for(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(&digest[..16])
}

/// Disk-backed store rooted at a directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> io::Result<()> {
        if !is_valid_key(key) {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "invalid object key"));
        }

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(key), bytes).await
    }

    async fn get(&self, key: &str) -> io::Result<Option<StoredObject>> {
        if !is_valid_key(key) {
            return Ok(None);
        }

        match tokio::fs::read(self.root.join(key)).await {
            Ok(bytes) => Ok(Some(StoredObject::new(key, bytes))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// In-process store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: std::sync::Mutex<std::collections::HashMap<String, Vec<u8>>>,
}

#[cfg(test)]
#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> io::Result<()> {
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> io::Result<Option<StoredObject>> {
        let objects = self.objects.lock().unwrap();
        Ok(objects.get(key).map(|bytes| StoredObject::new(key, bytes.clone())))
    }
}
