use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

/// Durable home for generated images.
///
/// Every call stores a new object under a fresh key, so identical bytes
/// persisted twice produce two objects and two URLs.
#[async_trait]
pub trait ImageSink: Send + Sync {
    async fn persist(&self, bytes: Vec<u8>, category: &str) -> Result<String>;

    fn name(&self) -> &str;
}

/// `{category}/{uuid}.png`, with the category reduced to a safe path segment.
pub fn object_key(category: &str) -> String {
    let category: String = category
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let category = if category.is_empty() {
        "design".to_string()
    } else {
        category
    };
    format!("{}/{}.png", category, Uuid::new_v4())
}
