// src/services/storage.rs
//
// S3-backed blob storage for profile pictures. The service exposes the
// two-method contract the user service relies on: upload a blob, get its
// public URL.

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use serde::Serialize;
use std::env;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage credentials not configured")]
    NotConfigured,

    #[error("invalid storage configuration: {0}")]
    InvalidConfig(String),

    #[error("upload failed: {0}")]
    UploadFailed(String),
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket_name: String,
    pub cloudfront_domain: Option<String>,
}

impl StorageConfig {
    /// Load the storage configuration from environment variables.
    pub fn from_env() -> Result<Self, StorageError> {
        let access_key_id =
            env::var("AWS_ACCESS_KEY_ID").map_err(|_| StorageError::NotConfigured)?;
        let secret_access_key =
            env::var("AWS_SECRET_ACCESS_KEY").map_err(|_| StorageError::NotConfigured)?;
        let region = env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let bucket_name = env::var("AWS_S3_BUCKET_NAME").unwrap_or_default();
        let cloudfront_domain = env::var("AWS_CLOUDFRONT_DOMAIN").ok().filter(|d| !d.is_empty());

        Ok(Self {
            access_key_id,
            secret_access_key,
            region,
            bucket_name,
            cloudfront_domain,
        })
    }
}

/// An uploaded blob: its public URI and the key it was stored under.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedBlob {
    pub uri: String,
    pub name: String,
}

#[derive(Debug)]
pub struct StorageService {
    config: StorageConfig,
}

impl StorageService {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Initialize an S3 client with the configured credentials
    async fn get_s3_client(&self) -> Result<(S3Client, String), StorageError> {
        if self.config.bucket_name.is_empty() {
            return Err(StorageError::InvalidConfig(
                "S3 bucket name not configured".to_string(),
            ));
        }

        let credentials = Credentials::new(
            &self.config.access_key_id,
            &self.config.secret_access_key,
            None,
            None,
            "env",
        );

        let region = Region::new(self.config.region.clone());

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials)
            .load()
            .await;

        let client = S3Client::new(&aws_config);

        Ok((client, self.config.bucket_name.clone()))
    }

    /// Upload a blob and return its public URI and stored key
    pub async fn upload(
        &self,
        file_data: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadedBlob, StorageError> {
        let (client, bucket) = self.get_s3_client().await?;

        let body = ByteStream::from(Bytes::from(file_data));

        client
            .put_object()
            .bucket(&bucket)
            .key(file_name)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, key = %file_name, "Failed to upload file to S3");
                StorageError::UploadFailed(e.to_string())
            })?;

        info!(key = %file_name, bucket = %bucket, "File uploaded to S3 successfully");

        Ok(UploadedBlob {
            uri: self.file_url(file_name),
            name: file_name.to_string(),
        })
    }

    /// Public URL for a stored key (CloudFront when configured)
    pub fn file_url(&self, key: &str) -> String {
        if let Some(cloudfront_domain) = &self.config.cloudfront_domain {
            return format!("https://{}/{}", cloudfront_domain, key);
        }

        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.config.bucket_name, self.config.region, key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> StorageConfig {
        StorageConfig {
            access_key_id: "test_key".to_string(),
            secret_access_key: "test_secret".to_string(),
            region: "us-east-1".to_string(),
            bucket_name: "my-bucket".to_string(),
            cloudfront_domain: None,
        }
    }

    #[test]
    fn test_file_url_standard() {
        let storage = StorageService::new(test_config());
        assert_eq!(
            storage.file_url("avatars/pic.png"),
            "https://my-bucket.s3.us-east-1.amazonaws.com/avatars/pic.png"
        );
    }

    #[test]
    fn test_file_url_cloudfront() {
        let mut config = test_config();
        config.cloudfront_domain = Some("d123456.cloudfront.net".to_string());
        let storage = StorageService::new(config);
        assert_eq!(
            storage.file_url("avatars/pic.png"),
            "https://d123456.cloudfront.net/avatars/pic.png"
        );
    }

    #[tokio::test]
    async fn test_missing_bucket_is_invalid_config() {
        let mut config = test_config();
        config.bucket_name = String::new();
        let storage = StorageService::new(config);
        let result = storage.get_s3_client().await;
        assert!(matches!(result, Err(StorageError::InvalidConfig(_))));
    }
}
