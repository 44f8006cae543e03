pub mod backend;
pub mod disabled;
pub mod gemini_image_client;
pub mod http;
pub mod imagen_client;
pub mod text_client;
pub mod traits;

use std::sync::Arc;

use crate::{config::GenAiConfig, error::Result};

pub use backend::{BackendRegistry, ImageBackend, FALLBACK_BACKEND};
pub use disabled::DisabledGenerator;
pub use gemini_image_client::GeminiImageClient;
pub use http::{build_http_client, GeminiHttp};
pub use imagen_client::ImagenClient;
pub use text_client::TextClient;
pub use traits::{BackendCapabilities, PageGenerator, TextGenerator};

/// Every generative client the service talks to, sharing one HTTP client.
#[derive(Clone)]
pub struct GenAiClient {
    text_client: TextClient,
    imagen_client: ImagenClient,
    gemini_image_client: GeminiImageClient,
}

impl GenAiClient {
    pub fn new(config: &GenAiConfig, http_client: reqwest::Client) -> Result<Self> {
        let http = GeminiHttp::new(http_client, config)?;

        log::info!(
            "Generative clients ready (text: {}, image: {}, imagen: {})",
            config.text_model,
            config.image_model,
            config.imagen_model
        );

        Ok(Self {
            text_client: TextClient::new(http.clone(), config),
            imagen_client: ImagenClient::new(http.clone(), config),
            gemini_image_client: GeminiImageClient::new(http, config),
        })
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }

    pub fn imagen(&self) -> &ImagenClient {
        &self.imagen_client
    }

    pub fn gemini_image(&self) -> &GeminiImageClient {
        &self.gemini_image_client
    }

    /// Dispatch table with all three backends registered.
    pub fn backends(&self) -> BackendRegistry {
        BackendRegistry::new()
            .register(Arc::new(self.imagen_client.clone()))
            .register(Arc::new(self.gemini_image_client.clone()))
            .register(Arc::new(DisabledGenerator::new("nanobanana")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_backend() {
        let config = GenAiConfig::new().with_api_key("test-key");
        let client = GenAiClient::new(&config, reqwest::Client::new()).unwrap();
        assert_eq!(client.backends().list(), ImageBackend::ALL.to_vec());
        assert_eq!(client.imagen().model(), "imagen-4.0-generate-001");
    }
}
