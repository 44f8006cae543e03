use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{InviteError, Result};

pub const REQUIRED_TEXT_KEYS: [&str; 4] = ["greeting", "invitation", "location", "closing"];

/// The four message blocks the text model writes for one invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTexts {
    pub greeting: String,
    pub invitation: String,
    pub location: String,
    pub closing: String,
}

impl GeneratedTexts {
    /// Reads the required keys out of a model-produced JSON object.
    ///
    /// A key holding an array (some prompts ask for alternatives) yields its
    /// first string element. Missing or blank keys are an upstream failure.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            InviteError::UpstreamTextGenerationError("model answer is not a JSON object".into())
        })?;

        let field = |key: &str| -> Result<String> {
            object
                .get(key)
                .and_then(first_string)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    InviteError::UpstreamTextGenerationError(format!(
                        "model answer is missing a non-empty '{}'",
                        key
                    ))
                })
        };

        Ok(Self {
            greeting: field("greeting")?,
            invitation: field("invitation")?,
            location: field("location")?,
            closing: field("closing")?,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "greeting" => Some(&self.greeting),
            "invitation" => Some(&self.invitation),
            "location" => Some(&self.location),
            "closing" => Some(&self.closing),
            _ => None,
        }
    }
}

fn first_string(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        Value::Array(items) => items.iter().find_map(Value::as_str),
        _ => None,
    }
}

/// Free-form design hints supplied by the couple alongside the facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignOptions {
    #[serde(default)]
    pub extra_message: Option<String>,
    #[serde(default)]
    pub additional_request: Option<String>,
    #[serde(default)]
    pub frame: Option<String>,
}

impl DesignOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_message(mut self, message: impl Into<String>) -> Self {
        self.extra_message = Some(message.into());
        self
    }

    pub fn with_additional_request(mut self, request: impl Into<String>) -> Self {
        self.additional_request = Some(request.into());
        self
    }

    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.frame = Some(frame.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_all_four_keys() {
        let texts = GeneratedTexts::from_json(&json!({
            "greeting": "서로가 마주보며 다져온 사랑을",
            "invitation": "저희 두 사람의 첫 걸음에 함께해 주세요",
            "location": "서울 웨딩홀 3층",
            "closing": "감사합니다",
            "extra": "ignored"
        }))
        .unwrap();

        assert_eq!(texts.closing, "감사합니다");
        assert_eq!(texts.get("location"), Some("서울 웨딩홀 3층"));
        assert_eq!(texts.get("unknown"), None);
    }

    #[test]
    fn array_values_use_first_candidate() {
        let texts = GeneratedTexts::from_json(&json!({
            "greeting": ["첫 번째 인사", "두 번째 인사"],
            "invitation": ["초대합니다"],
            "location": "오시는 길",
            "closing": ["감사합니다"]
        }))
        .unwrap();
        assert_eq!(texts.greeting, "첫 번째 인사");
    }

    #[test]
    fn blank_or_missing_key_is_upstream_failure() {
        let err = GeneratedTexts::from_json(&json!({
            "greeting": "안녕하세요",
            "invitation": "  ",
            "location": "서울",
            "closing": "감사합니다"
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            InviteError::UpstreamTextGenerationError(msg) if msg.contains("invitation")
        ));

        let err = GeneratedTexts::from_json(&json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(err, InviteError::UpstreamTextGenerationError(_)));
    }
}
