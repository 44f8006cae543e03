use async_trait::async_trait;
use reqwest::Client;

use crate::error::{InviteError, Result};

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetches caller-supplied or previously generated images over HTTP.
#[derive(Clone)]
pub struct ImageDownloader {
    client: Client,
}

impl ImageDownloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for ImageDownloader {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(InviteError::DownloadError(format!("unsupported URL: {}", url)));
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| InviteError::DownloadError(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(InviteError::DownloadError(format!(
                "{}: HTTP {}",
                url,
                response.status().as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| InviteError::DownloadError(format!("{}: {}", url, e)))?;
        log::debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_non_http_urls() {
        let downloader = ImageDownloader::new(Client::new());
        let err = downloader.download("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, InviteError::DownloadError(_)));
    }
}
