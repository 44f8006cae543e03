use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::InviteError;

pub const DEFAULT_PLACEHOLDER_URL: &str =
    "https://placehold.co/600x800/png?text=Wedding+Invitation";

#[derive(Debug, Clone)]
pub struct GenAiConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub text_model: String,
    pub image_model: String,
    pub imagen_model: String,
    pub person_generation: String,
    pub json_mode: bool,
    pub timeout_secs: u64,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        GenAiConfig {
            api_key: None,
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-3-pro-image-preview".to_string(),
            imagen_model: "imagen-4.0-generate-001".to_string(),
            person_generation: "allow_all".to_string(),
            json_mode: true,
            timeout_secs: 120,
        }
    }
}

impl GenAiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .ok();

        GenAiConfig {
            api_key,
            api_base: env::var("GEMINI_API_BASE").unwrap_or(defaults.api_base),
            text_model: env::var("GEMINI_TEXT_MODEL").unwrap_or(defaults.text_model),
            image_model: env::var("GEMINI_IMAGE_MODEL").unwrap_or(defaults.image_model),
            imagen_model: env::var("IMAGEN_MODEL").unwrap_or(defaults.imagen_model),
            person_generation: env::var("IMAGEN_PERSON_GENERATION")
                .unwrap_or(defaults.person_generation),
            json_mode: env::var("GEMINI_TEXT_JSON_MODE")
                .ok()
                .map_or(true, |val| val != "false"),
            timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_models(
        mut self,
        text_model: impl Into<String>,
        image_model: impl Into<String>,
        imagen_model: impl Into<String>,
    ) -> Self {
        self.text_model = text_model.into();
        self.image_model = image_model.into();
        self.imagen_model = imagen_model.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    S3,
    Local,
    Memory,
}

impl FromStr for StorageKind {
    type Err = InviteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(StorageKind::S3),
            "local" | "disk" => Ok(StorageKind::Local),
            "memory" => Ok(StorageKind::Memory),
            other => Err(InviteError::ConfigError(format!(
                "Unknown storage backend: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub cdn_base_url: Option<String>,
}

impl Default for S3Config {
    fn default() -> Self {
        S3Config {
            bucket: "wedding-invitation-images".to_string(),
            region: "ap-northeast-2".to_string(),
            access_key: None,
            secret_key: None,
            cdn_base_url: None,
        }
    }
}

impl S3Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        S3Config {
            bucket: env::var("S3_BUCKET_NAME").unwrap_or(defaults.bucket),
            region: env::var("AWS_REGION").unwrap_or(defaults.region),
            access_key: env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
            cdn_base_url: env::var("CDN_BASE_URL").ok(),
        }
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_cdn(mut self, base_url: impl Into<String>) -> Self {
        self.cdn_base_url = Some(base_url.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct LocalStorageConfig {
    pub root_dir: PathBuf,
    pub public_base_url: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        LocalStorageConfig {
            root_dir: PathBuf::from("static/generated_images"),
            public_base_url: "http://localhost:8000/static/generated_images".to_string(),
        }
    }
}

impl LocalStorageConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        LocalStorageConfig {
            root_dir: env::var("LOCAL_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.root_dir),
            public_base_url: env::var("PUBLIC_BASE_URL").unwrap_or(defaults.public_base_url),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub kind: StorageKind,
    pub s3: S3Config,
    pub local: LocalStorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            kind: StorageKind::S3,
            s3: S3Config::default(),
            local: LocalStorageConfig::default(),
        }
    }
}

impl StorageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self, InviteError> {
        let kind = match env::var("STORAGE_BACKEND") {
            Ok(val) => val.parse()?,
            Err(_) => StorageKind::S3,
        };

        Ok(StorageConfig {
            kind,
            s3: S3Config::from_env(),
            local: LocalStorageConfig::from_env(),
        })
    }

    pub fn with_s3(mut self, config: S3Config) -> Self {
        self.s3 = config;
        self.kind = StorageKind::S3;
        self
    }

    pub fn with_local(mut self, config: LocalStorageConfig) -> Self {
        self.local = config;
        self.kind = StorageKind::Local;
        self
    }

    pub fn in_memory(mut self) -> Self {
        self.kind = StorageKind::Memory;
        self
    }
}

#[derive(Debug, Clone)]
pub struct MapsConfig {
    pub api_key: Option<String>,
    pub static_maps_url: String,
}

impl Default for MapsConfig {
    fn default() -> Self {
        MapsConfig {
            api_key: None,
            static_maps_url: "https://maps.googleapis.com/maps/api/staticmap".to_string(),
        }
    }
}

impl MapsConfig {
    pub fn from_env() -> Self {
        MapsConfig {
            api_key: env::var("GOOGLE_MAPS_API_KEY").ok(),
            static_maps_url: env::var("STATIC_MAPS_URL")
                .unwrap_or_else(|_| Self::default().static_maps_url),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub genai: GenAiConfig,
    pub storage: StorageConfig,
    pub maps: MapsConfig,
    pub placeholder_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            genai: GenAiConfig::default(),
            storage: StorageConfig::default(),
            maps: MapsConfig::default(),
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self, InviteError> {
        Ok(Config {
            genai: GenAiConfig::from_env(),
            storage: StorageConfig::from_env()?,
            maps: MapsConfig::from_env(),
            placeholder_url: env::var("PLACEHOLDER_IMAGE_URL")
                .unwrap_or_else(|_| DEFAULT_PLACEHOLDER_URL.to_string()),
        })
    }

    pub fn with_genai(mut self, config: GenAiConfig) -> Self {
        self.genai = config;
        self
    }

    pub fn with_storage(mut self, config: StorageConfig) -> Self {
        self.storage = config;
        self
    }

    pub fn with_maps(mut self, config: MapsConfig) -> Self {
        self.maps = config;
        self
    }

    pub fn with_placeholder_url(mut self, url: impl Into<String>) -> Self {
        self.placeholder_url = url.into();
        self
    }
}
