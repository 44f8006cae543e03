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
        gemini::{PredictImage, PredictInstance, PredictParameters, PredictRequest, PredictResponse},
    },
};

const SAMPLE_COUNT: u32 = 1;
const ASPECT_RATIO: &str = "3:4";
const SAFETY_SETTING: &str = "block_some";

/// Image-only backend: a dedicated text-to-image model behind `predict`.
#[derive(Clone)]
pub struct ImagenClient {
    http: GeminiHttp,
    model: String,
    person_generation: String,
}

impl ImagenClient {
    pub fn new(http: GeminiHttp, config: &GenAiConfig) -> Self {
        Self {
            http,
            model: config.imagen_model.clone(),
            person_generation: config.person_generation.clone(),
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
    ) -> PredictRequest {
        // The content image rides inside the style reference, never alone.
        if content_image.is_some() && style_image.is_none() {
            log::debug!(
                "{} takes a content image only inside a style reference; sending prompt only",
                self.model
            );
        }
        let image = style_image.map(|style| PredictImage {
            bytes_base64_encoded: encode_base64(style),
            content_image: content_image.map(|content| {
                Box::new(PredictImage {
                    bytes_base64_encoded: encode_base64(content),
                    content_image: None,
                })
            }),
        });

        PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
                image,
            }],
            parameters: PredictParameters {
                sample_count: SAMPLE_COUNT,
                aspect_ratio: ASPECT_RATIO.to_string(),
                person_generation: self.person_generation.clone(),
                safety_setting: SAFETY_SETTING.to_string(),
            },
        }
    }
}

#[async_trait]
impl PageGenerator for ImagenClient {
    fn backend(&self) -> ImageBackend {
        ImageBackend::ImageOnly
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            accepts_style_image: true,
            accepts_content_image: true,
            mixed_output: false,
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

        let response: PredictResponse = self
            .http
            .post(&self.model, "predict", &request)
            .await
            .map_err(|e| {
                InviteError::UpstreamImageGenerationError(format!("{}: {}", self.model, e))
            })?;

        let encoded = response
            .predictions
            .into_iter()
            .find_map(|p| p.bytes_base64_encoded)
            .ok_or_else(|| {
                InviteError::UpstreamImageGenerationError(format!(
                    "{} returned no predictions (likely filtered by safety settings)",
                    self.model
                ))
            })?;

        let bytes = decode_base64(&encoded)?;
        if bytes.is_empty() {
            return Err(InviteError::UpstreamImageGenerationError(format!(
                "{} returned an empty image",
                self.model
            )));
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;
    use crate::genai::http::stub_server;

    fn client() -> ImagenClient {
        let config = GenAiConfig::new().with_api_key("test-key");
        let http = GeminiHttp::new(Client::new(), &config).unwrap();
        ImagenClient::new(http, &config)
    }

    #[test]
    fn request_nests_content_image_in_style_reference() {
        let request = client().build_request("cover page", Some(b"photo"), Some(b"style"));
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["parameters"]["sampleCount"], 1);
        assert_eq!(value["parameters"]["aspectRatio"], "3:4");
        assert_eq!(value["parameters"]["personGeneration"], "allow_all");
        assert_eq!(
            value["instances"][0]["image"]["bytesBase64Encoded"],
            encode_base64(b"style")
        );
        assert_eq!(
            value["instances"][0]["image"]["contentImage"]["bytesBase64Encoded"],
            encode_base64(b"photo")
        );
    }

    #[test]
    fn request_without_style_is_prompt_only() {
        let request = client().build_request("closing page", Some(b"photo"), None);
        let value = serde_json::to_value(&request).unwrap();
        assert!(value["instances"][0].get("image").is_none());
        assert_eq!(value["instances"][0]["prompt"], "closing page");
    }

    fn client_at(api_base: &str) -> ImagenClient {
        let config = GenAiConfig::new()
            .with_api_key("test-key")
            .with_api_base(format!("{}/v1beta", api_base));
        let http = GeminiHttp::new(Client::new(), &config).unwrap();
        ImagenClient::new(http, &config)
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_image_failure() {
        let err = client_at(stub_server::UNREACHABLE)
            .generate_page("cover page", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, InviteError::UpstreamImageGenerationError(_)));
    }

    #[tokio::test]
    async fn error_status_is_image_failure() {
        let base = stub_server::respond_with(500, r#"{"error":"internal"}"#).await;
        let err = client_at(&base)
            .generate_page("cover page", None, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InviteError::UpstreamImageGenerationError(msg) if msg.contains("HTTP 500")
        ));
    }

    #[tokio::test]
    async fn filtered_prediction_is_image_failure() {
        let base = stub_server::respond_with(200, r#"{"predictions":[]}"#).await;
        let err = client_at(&base)
            .generate_page("cover page", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, InviteError::UpstreamImageGenerationError(_)));
    }
}
