//! Object storage boundary.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

/// Blob store error.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("blob not found: {0}")]
    NotFound(String),
    #[error("invalid blob path: {0}")]
    InvalidPath(String),
    #[error("blob io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads named blobs to local paths.
///
/// Upload and existence checks live with the request handlers that accept
/// uploads; the workers only ever pull.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn download(&self, remote_path: &str, dest: &Path) -> Result<(), BlobError>;
}

/// Directory-backed blob store for dev and tests.
///
/// Blob names map to paths under `root`; names may not escape it.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn download(&self, remote_path: &str, dest: &Path) -> Result<(), BlobError> {
        if remote_path.split('/').any(|part| part == "..") {
            return Err(BlobError::InvalidPath(remote_path.to_string()));
        }

        let source = self.root.join(remote_path);
        debug!(blob = remote_path, dest = %dest.display(), "downloading blob");

        match tokio::fs::copy(&source, dest).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(remote_path.to_string()))
            }
            Err(e) => Err(BlobError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn downloads_existing_blob() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("rooms/a")).unwrap();
        std::fs::write(root.path().join("rooms/a/lec.mp3"), b"audio").unwrap();

        let store = LocalBlobStore::new(root.path());
        let dest_dir = tempfile::tempdir().unwrap();
        let dest = dest_dir.path().join("source.mp3");

        store.download("rooms/a/lec.mp3", &dest).await.unwrap();
        assert_eq!(std::fs::read(dest).unwrap(), b"audio");
    }

    #[tokio::test]
    async fn missing_blob_is_not_found() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(root.path());
        let dest_dir = tempfile::tempdir().unwrap();

        let err = store
            .download("nope.mp3", &dest_dir.path().join("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::NotFound(_)));
    }

    #[tokio::test]
    async fn rejects_path_escape() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(root.path());
        let dest_dir = tempfile::tempdir().unwrap();

        let err = store
            .download("../etc/passwd", &dest_dir.path().join("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::InvalidPath(_)));
    }
}
