use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    error::{InviteError, Result},
    genai::traits::PageGenerator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageBackend {
    /// Dedicated image model (Imagen `predict`).
    ImageOnly,
    /// Multimodal chat model answering with mixed text and image parts.
    TextAndImage,
    /// Third-party endpoint that stays selectable but is switched off.
    Disabled,
}

/// Tried once after any other backend fails.
pub const FALLBACK_BACKEND: ImageBackend = ImageBackend::ImageOnly;

impl ImageBackend {
    pub const ALL: [ImageBackend; 3] = [
        ImageBackend::ImageOnly,
        ImageBackend::TextAndImage,
        ImageBackend::Disabled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageBackend::ImageOnly => "image-only",
            ImageBackend::TextAndImage => "text-and-image",
            ImageBackend::Disabled => "disabled",
        }
    }
}

impl fmt::Display for ImageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageBackend {
    type Err = InviteError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let name = name.strip_prefix("models/").unwrap_or(&name);

        match name {
            "image-only" | "imagen" | "flash2.5" => Ok(ImageBackend::ImageOnly),
            n if n.starts_with("imagen-") => Ok(ImageBackend::ImageOnly),
            "text-and-image" | "gemini" | "gemini3.0" => Ok(ImageBackend::TextAndImage),
            n if n.starts_with("gemini-") && n.contains("image") => Ok(ImageBackend::TextAndImage),
            "disabled" | "nanobanana" => Ok(ImageBackend::Disabled),
            other => Err(InviteError::InvalidInputError(format!(
                "Unsupported image backend: {} (expected one of: {})",
                other,
                ImageBackend::ALL.map(|b| b.as_str()).join(", ")
            ))),
        }
    }
}

/// Dispatch table from backend selector to generator.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    generators: HashMap<ImageBackend, Arc<dyn PageGenerator>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, generator: Arc<dyn PageGenerator>) -> Self {
        self.generators.insert(generator.backend(), generator);
        self
    }

    pub fn get(&self, backend: ImageBackend) -> Result<Arc<dyn PageGenerator>> {
        self.generators.get(&backend).cloned().ok_or_else(|| {
            InviteError::UpstreamImageGenerationError(format!(
                "no generator registered for backend {}",
                backend
            ))
        })
    }

    pub fn list(&self) -> Vec<ImageBackend> {
        ImageBackend::ALL
            .into_iter()
            .filter(|b| self.generators.contains_key(b))
            .collect()
    }
}
