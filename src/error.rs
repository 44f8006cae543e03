use thiserror::Error;

#[derive(Debug, Error)]
pub enum InviteError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInputError(String),
    #[error("Text generation failed: {0}")]
    UpstreamTextGenerationError(String),
    #[error("Image generation failed: {0}")]
    UpstreamImageGenerationError(String),
    #[error("Model {0} returned no image part")]
    NoImagePartReturned(String),
    #[error("Backend {0} is disabled")]
    BackendDisabledError(String),
    #[error("Map snapshot failed: {0}")]
    UpstreamMapError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Download failed: {0}")]
    DownloadError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl InviteError {
    /// True for the per-page image failures the orchestrator absorbs.
    pub fn is_image_failure(&self) -> bool {
        matches!(
            self,
            InviteError::UpstreamImageGenerationError(_)
                | InviteError::NoImagePartReturned(_)
                | InviteError::BackendDisabledError(_)
                | InviteError::StorageError(_)
        )
    }
}

impl From<serde_json::Error> for InviteError {
    fn from(e: serde_json::Error) -> Self {
        InviteError::SerializationError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InviteError>;
