use async_trait::async_trait;

use crate::{
    error::Result,
    genai::backend::ImageBackend,
    models::{CeremonyFacts, GeneratedTexts},
};

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_texts(&self, facts: &CeremonyFacts) -> Result<GeneratedTexts>;
}

/// What a page generator can consume and emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendCapabilities {
    pub accepts_style_image: bool,
    pub accepts_content_image: bool,
    pub mixed_output: bool,
}

/// One image-generation backend. Implementations never retry; fallback is
/// the orchestrator's job.
#[async_trait]
pub trait PageGenerator: Send + Sync {
    fn backend(&self) -> ImageBackend;

    fn capabilities(&self) -> BackendCapabilities;

    async fn generate_page(
        &self,
        prompt: &str,
        content_image: Option<&[u8]>,
        style_image: Option<&[u8]>,
    ) -> Result<Vec<u8>>;
}
