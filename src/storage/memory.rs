use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    error::{InviteError, Result},
    storage::traits::{object_key, ImageSink},
};

pub const MEMORY_URL_PREFIX: &str = "memory://";

/// Keeps images in process memory. Used for dry runs and tests.
#[derive(Clone, Default)]
pub struct MemoryImageSink {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryImageSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, url: &str) -> Option<Vec<u8>> {
        let key = url.strip_prefix(MEMORY_URL_PREFIX)?;
        self.objects.lock().ok()?.get(key).cloned()
    }
}

#[async_trait]
impl ImageSink for MemoryImageSink {
    async fn persist(&self, bytes: Vec<u8>, category: &str) -> Result<String> {
        let key = object_key(category);
        let mut objects = self
            .objects
            .lock()
            .map_err(|e| InviteError::StorageError(format!("memory sink poisoned: {}", e)))?;
        objects.insert(key.clone(), bytes);
        Ok(format!("{}{}", MEMORY_URL_PREFIX, key))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identical_bytes_get_distinct_urls() {
        let sink = MemoryImageSink::new();
        let first = sink.persist(vec![1, 2, 3], "design").await.unwrap();
        let second = sink.persist(vec![1, 2, 3], "design").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.get(&first), Some(vec![1, 2, 3]));
        assert!(first.starts_with("memory://design/"));
    }
}
