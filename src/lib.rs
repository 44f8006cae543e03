pub mod config;
pub mod download;
pub mod editor;
pub mod error;
pub mod genai;
pub mod logger;
pub mod maps;
pub mod models;
pub mod orchestrator;
pub mod pipeline;
pub mod prompt;
pub mod storage;

pub use config::{Config, GenAiConfig, MapsConfig, StorageConfig};
pub use editor::InvitationEditor;
pub use error::{InviteError, Result};
pub use genai::{
    BackendRegistry, GenAiClient, ImageBackend, PageGenerator, TextGenerator, FALLBACK_BACKEND,
};
pub use maps::{MapClient, MapFetcher};
pub use models::{
    CeremonyFacts, DesignOptions, EditedPage, GeneratedTexts, InvitationResult, PageDescriptor,
    PageRole, PageSource, Person, Tone, Venue,
};
pub use orchestrator::PageOrchestrator;
pub use pipeline::InvitationPipeline;
pub use storage::{ImageSink, ImageStorageManager};
