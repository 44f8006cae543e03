use std::sync::Arc;

use crate::{
    config::Config,
    download::ImageDownloader,
    editor::InvitationEditor,
    error::Result,
    genai::{build_http_client, GenAiClient, ImageBackend, TextGenerator},
    maps::MapClient,
    models::{CeremonyFacts, DesignOptions, InvitationResult},
    orchestrator::PageOrchestrator,
    storage::ImageStorageManager,
};

/// One invitation request end to end: texts first, then the five pages.
#[derive(Clone)]
pub struct InvitationPipeline {
    text: Arc<dyn TextGenerator>,
    orchestrator: PageOrchestrator,
    editor: Option<InvitationEditor>,
}

impl InvitationPipeline {
    pub fn new(text: Arc<dyn TextGenerator>, orchestrator: PageOrchestrator) -> Self {
        Self {
            text,
            orchestrator,
            editor: None,
        }
    }

    pub fn with_editor(mut self, editor: InvitationEditor) -> Self {
        self.editor = Some(editor);
        self
    }

    /// Wires the live clients: Gemini for texts and images, the configured
    /// storage sink, and Static Maps.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let http_client = build_http_client(config.genai.timeout_secs)?;
        let genai = GenAiClient::new(&config.genai, http_client.clone())?;
        let storage = Arc::new(ImageStorageManager::new(config.storage.clone()).await?);
        let maps = Arc::new(MapClient::new(&config.maps, http_client.clone()));

        let orchestrator = PageOrchestrator::new(
            genai.backends(),
            Arc::clone(&storage),
            maps,
            config.placeholder_url.clone(),
        );
        let editor = InvitationEditor::new(
            Arc::new(ImageDownloader::new(http_client)),
            Arc::new(genai.gemini_image().clone()),
            storage,
        );

        Ok(Self::new(Arc::new(genai.text().clone()), orchestrator).with_editor(editor))
    }

    pub fn orchestrator(&self) -> &PageOrchestrator {
        &self.orchestrator
    }

    pub fn editor(&self) -> Option<&InvitationEditor> {
        self.editor.as_ref()
    }

    pub async fn create_invitation(
        &self,
        facts: &CeremonyFacts,
        style_image: Option<Vec<u8>>,
        photo_image: Option<Vec<u8>>,
        design: &DesignOptions,
        backend_name: &str,
    ) -> Result<InvitationResult> {
        let backend: ImageBackend = backend_name.parse()?;
        facts.validate()?;

        log::info!(
            "Creating invitation for {} & {} at {} (backend: {})",
            facts.groom.name,
            facts.bride.name,
            facts.venue.name,
            backend
        );

        let texts = self.text.generate_texts(facts).await?;

        self.orchestrator
            .generate_invitation(style_image, photo_image, texts, &facts.venue, design, backend)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InviteError;
    use crate::genai::{BackendCapabilities, BackendRegistry, PageGenerator};
    use crate::maps::MapFetcher;
    use crate::models::{GeneratedTexts, PageSource, Person, Venue};
    use crate::storage::{ImageSink, MemoryImageSink};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedTexts {
        fail: bool,
    }

    #[async_trait]
    impl TextGenerator for CannedTexts {
        async fn generate_texts(&self, facts: &CeremonyFacts) -> Result<GeneratedTexts> {
            if self.fail {
                return Err(InviteError::UpstreamTextGenerationError("HTTP 500".into()));
            }
            Ok(GeneratedTexts {
                greeting: "따뜻한 봄날에 인사드립니다".into(),
                invitation: format!("{}와 {}가 결혼합니다", facts.groom.name, facts.bride.name),
                location: format!("{} {}", facts.venue.name, facts.venue.address),
                closing: "함께해 주셔서 감사합니다".into(),
            })
        }
    }

    struct CountingImagen {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageGenerator for CountingImagen {
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
            _prompt: &str,
            _content_image: Option<&[u8]>,
            _style_image: Option<&[u8]>,
        ) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![0x89, b'P', b'N', b'G'])
        }
    }

    struct NoMap;

    #[async_trait]
    impl MapFetcher for NoMap {
        async fn fetch_map(&self, _lat: f64, _lon: f64, _label: &str) -> Result<Vec<u8>> {
            Err(InviteError::UpstreamMapError("not expected".into()))
        }
    }

    fn facts() -> CeremonyFacts {
        CeremonyFacts::new(
            Person::new("철수"),
            Person::new("영희"),
            Venue::new("서울 웨딩홀", "서울시 강남구"),
            "2025-05-01",
            "13:00",
        )
    }

    fn pipeline(
        text_fails: bool,
        sink: &MemoryImageSink,
    ) -> (InvitationPipeline, Arc<CountingImagen>) {
        let imagen = Arc::new(CountingImagen {
            calls: AtomicUsize::new(0),
        });
        let storage = Arc::new(ImageStorageManager::from_sink(
            Arc::new(sink.clone()) as Arc<dyn ImageSink>
        ));
        let orchestrator = PageOrchestrator::new(
            BackendRegistry::new().register(imagen.clone()),
            storage,
            Arc::new(NoMap),
            "https://placehold.example/blank.png",
        );
        (
            InvitationPipeline::new(Arc::new(CannedTexts { fail: text_fails }), orchestrator),
            imagen,
        )
    }

    #[tokio::test]
    async fn creates_five_stored_pages() {
        let sink = MemoryImageSink::new();
        let (pipeline, _) = pipeline(false, &sink);

        let result = pipeline
            .create_invitation(&facts(), None, None, &DesignOptions::new(), "imagen")
            .await
            .unwrap();

        assert_eq!(result.pages.len(), 5);
        assert_eq!(result.backend_used, "image-only");
        assert_eq!(result.texts.invitation, "철수와 영희가 결혼합니다");
        assert!(result.pages.iter().all(|p| p.source == PageSource::Primary));
        assert!(result
            .image_urls()
            .iter()
            .all(|u| u.starts_with("memory://design/") && u.ends_with(".png")));
        assert_eq!(sink.len(), 5);
    }

    #[tokio::test]
    async fn text_failure_stops_before_any_image_work() {
        let sink = MemoryImageSink::new();
        let (pipeline, imagen) = pipeline(true, &sink);

        let err = pipeline
            .create_invitation(&facts(), None, None, &DesignOptions::new(), "imagen")
            .await
            .unwrap_err();

        assert!(matches!(err, InviteError::UpstreamTextGenerationError(_)));
        assert_eq!(imagen.calls.load(Ordering::SeqCst), 0);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn unknown_backend_name_is_invalid_input() {
        let sink = MemoryImageSink::new();
        let (pipeline, imagen) = pipeline(false, &sink);

        let err = pipeline
            .create_invitation(&facts(), None, None, &DesignOptions::new(), "dall-e")
            .await
            .unwrap_err();

        assert!(matches!(err, InviteError::InvalidInputError(_)));
        assert_eq!(imagen.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn from_config_with_memory_storage() {
        let config = Config::new()
            .with_genai(crate::config::GenAiConfig::new().with_api_key("test-key"))
            .with_storage(crate::config::StorageConfig::new().in_memory());

        let pipeline = InvitationPipeline::from_config(&config).await.unwrap();
        assert!(pipeline.editor().is_some());
        assert_eq!(
            pipeline.orchestrator().placeholder_url(),
            crate::config::DEFAULT_PLACEHOLDER_URL
        );
    }
}
