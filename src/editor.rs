use std::sync::Arc;

use futures::future::join_all;

use crate::{
    download::ImageFetcher,
    error::{InviteError, Result},
    genai::PageGenerator,
    logger,
    models::{EditedPage, PageDescriptor, PageSource},
    prompt::build_edit_prompt,
    storage::ImageStorageManager,
};

pub const EDITED_CATEGORY: &str = "edited";

/// Regenerates already published pages from a free-form edit request.
#[derive(Clone)]
pub struct InvitationEditor {
    fetcher: Arc<dyn ImageFetcher>,
    generator: Arc<dyn PageGenerator>,
    storage: Arc<ImageStorageManager>,
}

impl InvitationEditor {
    pub fn new(
        fetcher: Arc<dyn ImageFetcher>,
        generator: Arc<dyn PageGenerator>,
        storage: Arc<ImageStorageManager>,
    ) -> Self {
        Self {
            fetcher,
            generator,
            storage,
        }
    }

    /// Edits every page concurrently. A page that cannot be edited keeps its
    /// original URL and is reported with `edited = false`.
    pub async fn edit_invitation(
        &self,
        pages: Vec<PageDescriptor>,
        edit_request: &str,
        reference_image: Option<Vec<u8>>,
    ) -> Result<Vec<EditedPage>> {
        if edit_request.trim().is_empty() {
            return Err(InviteError::InvalidInputError("edit request is empty".into()));
        }

        let _timer = logger::timer("invitation edit");
        let prompt = build_edit_prompt(edit_request, reference_image.is_some());
        let reference = reference_image.as_deref();

        let edits = pages.into_iter().map(|page| {
            let prompt = prompt.as_str();
            async move {
                let outcome = self.edit_page(&page, prompt, reference).await;
                match outcome {
                    Ok(url) => EditedPage {
                        page: PageDescriptor {
                            image_url: url,
                            source: PageSource::Edited,
                            ..page
                        },
                        edited: true,
                    },
                    Err(e) => {
                        log::warn!("Keeping original page {}: {}", page.page_number, e);
                        EditedPage { page, edited: false }
                    }
                }
            }
        });

        let mut edited = join_all(edits).await;
        edited.sort_by_key(|e| e.page.page_number);
        Ok(edited)
    }

    async fn edit_page(
        &self,
        page: &PageDescriptor,
        prompt: &str,
        reference: Option<&[u8]>,
    ) -> Result<String> {
        let original = self.fetcher.download(&page.image_url).await?;
        let bytes = self
            .generator
            .generate_page(prompt, Some(&original), reference)
            .await?;
        self.storage.persist(bytes, EDITED_CATEGORY).await
    }
}
