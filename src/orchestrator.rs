use std::sync::Arc;

use futures::future::join_all;

use crate::{
    error::{InviteError, Result},
    genai::{BackendRegistry, ImageBackend, PageGenerator, FALLBACK_BACKEND},
    logger,
    maps::MapFetcher,
    models::{
        DesignOptions, GeneratedTexts, InvitationResult, PageDescriptor, PageRole, PageSource,
        Venue,
    },
    prompt::{build_page_prompt, PromptContext},
    storage::ImageStorageManager,
};

pub const DESIGN_CATEGORY: &str = "design";

/// Turns generated texts and reference images into five persisted pages.
///
/// Each page runs as its own task: generate with the requested backend,
/// on failure try [`FALLBACK_BACKEND`] once, and if that fails too use the
/// placeholder URL. Page failures never fail the invitation.
#[derive(Clone)]
pub struct PageOrchestrator {
    backends: BackendRegistry,
    storage: Arc<ImageStorageManager>,
    maps: Arc<dyn MapFetcher>,
    placeholder_url: String,
}

/// Everything one page task owns.
struct PageJob {
    role: PageRole,
    prompt: String,
    content_image: Option<Arc<Vec<u8>>>,
    style_image: Option<Arc<Vec<u8>>>,
}

impl PageOrchestrator {
    pub fn new(
        backends: BackendRegistry,
        storage: Arc<ImageStorageManager>,
        maps: Arc<dyn MapFetcher>,
        placeholder_url: impl Into<String>,
    ) -> Self {
        Self {
            backends,
            storage,
            maps,
            placeholder_url: placeholder_url.into(),
        }
    }

    pub fn placeholder_url(&self) -> &str {
        &self.placeholder_url
    }

    /// Generates all five pages concurrently and returns them in page order.
    ///
    /// Only a failed map snapshot fails the call; it is fetched before any
    /// page work starts, and only when the venue has coordinates.
    pub async fn generate_invitation(
        &self,
        style_image: Option<Vec<u8>>,
        photo_image: Option<Vec<u8>>,
        texts: GeneratedTexts,
        venue: &Venue,
        design: &DesignOptions,
        backend: ImageBackend,
    ) -> Result<InvitationResult> {
        let _timer = logger::timer(&format!("invitation via {}", backend));

        let map_image = match venue.coordinates {
            Some(coords) => Some(
                self.maps
                    .fetch_map(coords.latitude, coords.longitude, &venue.name)
                    .await?,
            ),
            None => {
                log::info!("No coordinates for {}, location page gets no map", venue.name);
                None
            }
        };

        let style_image = style_image.map(Arc::new);
        let photo_image = photo_image.map(Arc::new);
        let map_image = map_image.map(Arc::new);

        let jobs: Vec<PageJob> = PageRole::ALL
            .into_iter()
            .map(|role| {
                let content_image = match role {
                    PageRole::Cover => photo_image.clone(),
                    PageRole::Location => map_image.clone(),
                    _ => None,
                };
                let ctx = PromptContext {
                    venue,
                    design,
                    has_style_image: style_image.is_some(),
                    has_content_image: content_image.is_some(),
                };
                PageJob {
                    role,
                    prompt: build_page_prompt(role, &texts, &ctx),
                    content_image,
                    style_image: style_image.clone(),
                }
            })
            .collect();

        // Join barrier: every task resolves to a page before assembly, and
        // none is cancelled once spawned.
        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                let orchestrator = self.clone();
                let role = job.role;
                (role, tokio::spawn(async move { orchestrator.run_page(job, backend).await }))
            })
            .collect();

        let (roles, handles): (Vec<PageRole>, Vec<_>) = handles.into_iter().unzip();
        let joined = join_all(handles).await;

        let mut pages: Vec<PageDescriptor> = roles
            .into_iter()
            .zip(joined)
            .map(|(role, outcome)| match outcome {
                Ok(page) => page,
                Err(e) => {
                    log::error!("Page task for {} did not complete: {}", role, e);
                    self.placeholder(role)
                }
            })
            .collect();
        pages.sort_by_key(|p| p.page_number);

        let placeholders = pages.iter().filter(|p| p.is_placeholder()).count();
        if placeholders > 0 {
            log::warn!(
                "{} of {} pages fell back to the placeholder image",
                placeholders,
                pages.len()
            );
        }

        Ok(InvitationResult {
            pages,
            texts,
            backend_used: backend.to_string(),
        })
    }

    async fn run_page(&self, job: PageJob, backend: ImageBackend) -> PageDescriptor {
        let _timer = logger::timer(&format!("page {} ({})", job.role.page_number(), job.role));

        match self.attempt(&job, backend).await {
            Ok(url) => return PageDescriptor::new(job.role, url, PageSource::Primary),
            Err(e) if e.is_image_failure() => {
                log::warn!("Page {} failed on {}: {}", job.role, backend, e)
            }
            Err(e) => log::error!(
                "Page {} hit an unexpected error on {}: {}",
                job.role,
                backend,
                e
            ),
        }

        if backend == FALLBACK_BACKEND {
            return self.placeholder(job.role);
        }

        log::info!("Retrying page {} with fallback backend {}", job.role, FALLBACK_BACKEND);
        match self.attempt(&job, FALLBACK_BACKEND).await {
            Ok(url) => PageDescriptor::new(job.role, url, PageSource::Fallback),
            Err(e) => {
                log::warn!("Fallback for page {} failed: {}", job.role, e);
                self.placeholder(job.role)
            }
        }
    }

    /// One generate-then-persist cycle against a single backend.
    async fn attempt(&self, job: &PageJob, backend: ImageBackend) -> Result<String> {
        let generator = self.backends.get(backend)?;
        let (content_image, style_image) = select_images(generator.as_ref(), job);

        let bytes = generator
            .generate_page(&job.prompt, content_image, style_image)
            .await?;
        if bytes.is_empty() {
            return Err(InviteError::UpstreamImageGenerationError(format!(
                "{} returned an empty image",
                backend
            )));
        }

        self.storage.persist(bytes, DESIGN_CATEGORY).await
    }

    fn placeholder(&self, role: PageRole) -> PageDescriptor {
        PageDescriptor::new(role, self.placeholder_url.clone(), PageSource::Placeholder)
    }
}

/// Drops the images a backend cannot take.
fn select_images<'a>(
    generator: &dyn PageGenerator,
    job: &'a PageJob,
) -> (Option<&'a [u8]>, Option<&'a [u8]>) {
    let caps = generator.capabilities();
    let content = job.content_image.as_deref().map(Vec::as_slice);
    let style = job.style_image.as_deref().map(Vec::as_slice);

    if content.is_some() && !caps.accepts_content_image {
        log::debug!("{} ignores the content image for {}", generator.backend(), job.role);
    }
    if style.is_some() && !caps.accepts_style_image {
        log::debug!("{} ignores the style image for {}", generator.backend(), job.role);
    }

    (
        content.filter(|_| caps.accepts_content_image),
        style.filter(|_| caps.accepts_style_image),
    )
}
