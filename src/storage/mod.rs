pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;
pub mod traits;

use crate::{
    config::{StorageConfig, StorageKind},
    error::{InviteError, Result},
};
use std::sync::Arc;

pub use local::LocalImageSink;
pub use memory::MemoryImageSink;
#[cfg(feature = "s3")]
pub use s3::S3ImageSink;
pub use traits::{object_key, ImageSink};

pub struct ImageStorageManager {
    backend: Arc<dyn ImageSink>,
}

impl ImageStorageManager {
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let backend: Arc<dyn ImageSink> = match config.kind {
            StorageKind::S3 => {
                #[cfg(feature = "s3")]
                {
                    Arc::new(S3ImageSink::new(config.s3).await?)
                }
                #[cfg(not(feature = "s3"))]
                {
                    return Err(InviteError::ConfigError("S3 feature not enabled".into()));
                }
            }
            StorageKind::Local => Arc::new(LocalImageSink::new(config.local).await?),
            StorageKind::Memory => Arc::new(MemoryImageSink::new()),
        };

        log::info!("Image storage backend: {}", backend.name());
        Ok(Self { backend })
    }

    pub fn from_sink(backend: Arc<dyn ImageSink>) -> Self {
        Self { backend }
    }

    pub fn sink(&self) -> Arc<dyn ImageSink> {
        Arc::clone(&self.backend)
    }

    pub async fn persist(&self, bytes: Vec<u8>, category: &str) -> Result<String> {
        if bytes.is_empty() {
            return Err(InviteError::StorageError("refusing to store an empty image".into()));
        }
        self.backend.persist(bytes, category).await
    }
}
