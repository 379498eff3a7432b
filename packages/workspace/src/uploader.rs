//! Image upload collaborator.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs as tokio_fs;
use tracing::debug;

use crate::gateway::validate_tenant;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UploadError {
    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Image is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("Upload transport failed: {0}")]
    Transport(String),
}

/// Stores image bytes somewhere public and returns the URL
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, tenant_id: &str, file_name: &str, bytes: Vec<u8>) -> Result<String, UploadError>;
}

/// Writes images under `<dir>/<tenant>/` and serves them from `base_url`.
///
/// File names are prefixed with a CRC32 of the content, so re-uploading the
/// same image yields the same URL.
pub struct LocalImageUploader {
    dir: PathBuf,
    base_url: String,
    max_bytes: usize,
}

impl LocalImageUploader {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_bytes: 5 * 1024 * 1024,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

fn sanitize_file_name(file_name: &str) -> String {
    let name: String = file_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '-' })
        .collect();
    let name = name.trim_start_matches('.');
    if name.is_empty() {
        "image".to_string()
    } else {
        name.to_string()
    }
}

#[async_trait]
impl ImageUploader for LocalImageUploader {
    async fn upload(&self, tenant_id: &str, file_name: &str, bytes: Vec<u8>) -> Result<String, UploadError> {
        validate_tenant(tenant_id).map_err(|err| UploadError::Rejected(err.to_string()))?;
        if bytes.is_empty() {
            return Err(UploadError::Rejected("empty image".to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                size: bytes.len(),
                limit: self.max_bytes,
            });
        }

        let name = format!("{:08x}-{}", crc32fast::hash(&bytes), sanitize_file_name(file_name));
        let dir = self.dir.join(tenant_id);
        tokio_fs::create_dir_all(&dir)
            .await
            .map_err(|err| UploadError::Transport(err.to_string()))?;
        tokio_fs::write(dir.join(&name), &bytes)
            .await
            .map_err(|err| UploadError::Transport(err.to_string()))?;

        debug!(tenant = %tenant_id, file = %name, size = bytes.len(), "Image stored");
        Ok(format!("{}/{}/{}", self.base_url, tenant_id, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("hero banner.png"), "hero-banner.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name(".."), "image");
        assert_eq!(sanitize_file_name(""), "image");
    }

    #[tokio::test]
    async fn test_local_upload_is_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let uploader = LocalImageUploader::new(dir.path(), "/assets/");

        let first = uploader.upload("acme", "logo.png", vec![1, 2, 3]).await.unwrap();
        let again = uploader.upload("acme", "logo.png", vec![1, 2, 3]).await.unwrap();

        assert_eq!(first, again);
        assert!(first.starts_with("/assets/acme/"));
        assert!(first.ends_with("-logo.png"));
        let stored = first.trim_start_matches("/assets/");
        assert_eq!(std::fs::read(dir.path().join(stored)).unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_limits() {
        let dir = tempfile::tempdir().unwrap();
        let uploader = LocalImageUploader::new(dir.path(), "/assets").with_max_bytes(2);

        assert_eq!(
            uploader.upload("acme", "a.png", vec![0; 3]).await,
            Err(UploadError::TooLarge { size: 3, limit: 2 })
        );
        assert!(matches!(
            uploader.upload("acme", "a.png", Vec::new()).await,
            Err(UploadError::Rejected(_))
        ));
    }
}
