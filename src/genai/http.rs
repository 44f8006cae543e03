use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::GenAiConfig,
    error::{InviteError, Result},
};

/// Failure of a single REST call, before it is mapped to a caller-specific
/// error kind.
#[derive(Debug)]
pub enum CallError {
    Transport(String),
    Status(u16, String),
    Decode(String),
}

impl std::fmt::Display for CallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallError::Transport(msg) => write!(f, "transport error: {}", msg),
            CallError::Status(code, body) => write!(f, "HTTP {}: {}", code, truncate(body, 300)),
            CallError::Decode(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Builds the process-wide HTTP client. Every generative call inherits its
/// timeout.
pub fn build_http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| InviteError::ConfigError(format!("cannot build HTTP client: {}", e)))
}

/// Thin wrapper over the Generative Language REST surface.
#[derive(Clone)]
pub struct GeminiHttp {
    client: Client,
    api_base: String,
    api_key: String,
}

impl GeminiHttp {
    pub fn new(client: Client, config: &GenAiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| InviteError::ConfigError("GEMINI_API_KEY is required".into()))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn endpoint(&self, model: &str, method: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:{}", self.api_base, model, method)
    }

    pub async fn post<B, R>(
        &self,
        model: &str,
        method: &str,
        body: &B,
    ) -> std::result::Result<R, CallError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(model, method);
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(CallError::Status(status.as_u16(), text));
        }

        serde_json::from_str(&text).map_err(|e| CallError::Decode(e.to_string()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn http(api_base: &str) -> GeminiHttp {
        let config = GenAiConfig::new().with_api_key("k").with_api_base(api_base);
        GeminiHttp::new(Client::new(), &config).unwrap()
    }

    #[test]
    fn endpoint_accepts_prefixed_model_names() {
        let http = http("https://api.test/v1beta/");
        assert_eq!(
            http.endpoint("models/gemini-3-pro-image-preview", "generateContent"),
            "https://api.test/v1beta/models/gemini-3-pro-image-preview:generateContent"
        );
        assert_eq!(
            http.endpoint("imagen-4.0-generate-001", "predict"),
            "https://api.test/v1beta/models/imagen-4.0-generate-001:predict"
        );
    }

    #[test]
    fn missing_api_key_is_config_error() {
        assert!(matches!(
            GeminiHttp::new(Client::new(), &GenAiConfig::new()),
            Err(InviteError::ConfigError(_))
        ));
    }

    #[test]
    fn status_error_truncates_body() {
        let body = "x".repeat(1000);
        let msg = CallError::Status(429, body).to_string();
        assert!(msg.starts_with("HTTP 429: "));
        assert!(msg.len() < 400);
    }

    #[tokio::test]
    async fn post_reports_transport_status_and_decode_failures() {
        let body = serde_json::json!({});

        let err = http(stub_server::UNREACHABLE)
            .post::<_, serde_json::Value>("m", "generateContent", &body)
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::Transport(_)));

        let base = stub_server::respond_with(503, r#"{"error":"overloaded"}"#).await;
        let err = http(&base)
            .post::<_, serde_json::Value>("m", "generateContent", &body)
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::Status(503, ref b) if b.contains("overloaded")));

        let base = stub_server::respond_with(200, "not json").await;
        let err = http(&base)
            .post::<_, serde_json::Value>("m", "generateContent", &body)
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::Decode(_)));
    }
}
