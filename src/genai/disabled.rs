use async_trait::async_trait;

use crate::{
    error::{InviteError, Result},
    genai::{
        backend::ImageBackend,
        traits::{BackendCapabilities, PageGenerator},
    },
};

/// The third-party "nanobanana" integration. It stays selectable so callers
/// naming it get a clean fallback instead of a validation error, but it never
/// makes a network call.
pub struct DisabledGenerator {
    name: String,
}

impl DisabledGenerator {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl PageGenerator for DisabledGenerator {
    fn backend(&self) -> ImageBackend {
        ImageBackend::Disabled
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
        _prompt: &str,
        _content_image: Option<&[u8]>,
        _style_image: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        Err(InviteError::BackendDisabledError(self.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_fails_with_disabled_error() {
        let generator = DisabledGenerator::new("nanobanana");
        let err = generator
            .generate_page("cover", Some(b"photo"), Some(b"style"))
            .await
            .unwrap_err();
        assert!(matches!(err, InviteError::BackendDisabledError(name) if name == "nanobanana"));
    }
}
