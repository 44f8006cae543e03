use async_trait::async_trait;
use aws_sdk_s3::{primitives::ByteStream, Client};

use crate::{
    config::S3Config,
    error::{InviteError, Result},
    storage::traits::{object_key, ImageSink},
};

pub struct S3ImageSink {
    client: Client,
    bucket: String,
    region: String,
    cdn_base_url: Option<String>,
}

impl S3ImageSink {
    pub async fn new(config: S3Config) -> Result<Self> {
        let region = aws_sdk_s3::config::Region::new(config.region.clone());
        let loader = aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

        let loader = if let (Some(access_key), Some(secret_key)) =
            (&config.access_key, &config.secret_key)
        {
            loader.credentials_provider(aws_sdk_s3::config::Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "invitegen",
            ))
        } else {
            loader
        };

        let aws_config = loader.load().await;

        Ok(Self {
            client: Client::new(&aws_config),
            bucket: config.bucket,
            region: config.region,
            cdn_base_url: config
                .cdn_base_url
                .map(|url| url.trim_end_matches('/').to_string()),
        })
    }

    pub fn public_url(&self, key: &str) -> String {
        public_url(&self.bucket, &self.region, self.cdn_base_url.as_deref(), key)
    }
}

fn public_url(bucket: &str, region: &str, cdn_base_url: Option<&str>, key: &str) -> String {
    match cdn_base_url {
        Some(base) => format!("{}/{}", base, key),
        None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}

#[async_trait]
impl ImageSink for S3ImageSink {
    async fn persist(&self, bytes: Vec<u8>, category: &str) -> Result<String> {
        let key = object_key(category);
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type("image/png")
            .send()
            .await
            .map_err(|e| {
                log::error!("S3 upload of {} failed: {:?}", key, e);
                InviteError::StorageError(format!("S3 put_object failed: {}", e))
            })?;

        log::info!("Uploaded {} bytes to s3://{}/{}", size, self.bucket, key);
        Ok(self.public_url(&key))
    }

    fn name(&self) -> &str {
        "s3"
    }
}
