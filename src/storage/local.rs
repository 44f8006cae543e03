use std::path::PathBuf;

use async_trait::async_trait;

use crate::{
    config::LocalStorageConfig,
    error::{InviteError, Result},
    storage::traits::{object_key, ImageSink},
};

/// Writes images below a directory that a static file server exposes.
pub struct LocalImageSink {
    root_dir: PathBuf,
    public_base_url: String,
}

impl LocalImageSink {
    pub async fn new(config: LocalStorageConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.root_dir)
            .await
            .map_err(|e| {
                InviteError::StorageError(format!(
                    "cannot create {}: {}",
                    config.root_dir.display(),
                    e
                ))
            })?;

        Ok(Self {
            root_dir: config.root_dir,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ImageSink for LocalImageSink {
    async fn persist(&self, bytes: Vec<u8>, category: &str) -> Result<String> {
        let key = object_key(category);
        let path = self.root_dir.join(&key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| InviteError::StorageError(e.to_string()))?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| InviteError::StorageError(format!("write {}: {}", path.display(), e)))?;

        log::debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(format!("{}/{}", self.public_base_url, key))
    }

    fn name(&self) -> &str {
        "local"
    }
}
