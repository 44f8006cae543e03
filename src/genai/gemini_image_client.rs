use async_trait::async_trait;

use crate::{
    config::GenAiConfig,
    error::{InviteError, Result},
    genai::{
        backend::ImageBackend,
        http::GeminiHttp,
        traits::{BackendCapabilities, PageGenerator},
    },
    models::{
        decode_base64, encode_base64,
        gemini::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part},
        sniff_mime_type,
    },
};

/// Text-and-image backend: a multimodal chat model asked for mixed output.
#[derive(Clone)]
pub struct GeminiImageClient {
    http: GeminiHttp,
    model: String,
}

impl GeminiImageClient {
    pub fn new(http: GeminiHttp, config: &GenAiConfig) -> Self {
        Self {
            http,
            model: config.image_model.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(
        &self,
        prompt: &str,
        content_image: Option<&[u8]>,
        style_image: Option<&[u8]>,
    ) -> GenerateContentRequest {
        let mut parts = vec![Part::text(prompt)];
        if let Some(style) = style_image {
            parts.push(Part::text("Style reference image:"));
            parts.push(Part::image(sniff_mime_type(style), encode_base64(style)));
        }
        if let Some(content) = content_image {
            parts.push(Part::text("Content image to place on the page:"));
            parts.push(Part::image(sniff_mime_type(content), encode_base64(content)));
        }

        GenerateContentRequest {
            contents: vec![Content::user(parts)],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
                ..Default::default()
            }),
        }
    }
}

/// Pulls the first inline image out of a mixed-modality answer.
pub fn extract_image(model: &str, response: &GenerateContentResponse) -> Result<Vec<u8>> {
    match response.first_inline_data() {
        Some(inline) => decode_base64(&inline.data),
        None => {
            if let Some(text) = response.text() {
                log::warn!("{} answered with text only: {}", model, text);
            }
            Err(InviteError::NoImagePartReturned(model.to_string()))
        }
    }
}

#[async_trait]
impl PageGenerator for GeminiImageClient {
    fn backend(&self) -> ImageBackend {
        ImageBackend::TextAndImage
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            accepts_style_image: true,
            accepts_content_image: true,
            mixed_output: true,
        }
    }

    async fn generate_page(
        &self,
        prompt: &str,
        content_image: Option<&[u8]>,
        style_image: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        let request = self.build_request(prompt, content_image, style_image);

        log::info!("Generating page image with model: {}", self.model);

        let response: GenerateContentResponse = self
            .http
            .post(&self.model, "generateContent", &request)
            .await
            .map_err(|e| {
                InviteError::UpstreamImageGenerationError(format!("{}: {}", self.model, e))
            })?;

        extract_image(&self.model, &response)
    }
}
