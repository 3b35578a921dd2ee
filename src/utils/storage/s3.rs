use super::{Error, ObjectStorage};
use crate::types::StorageConfig;
use async_trait::async_trait;
use aws_sdk_s3::{config::Credentials, primitives::ByteStream, Client};
use serde_json::json;

/// S3-compatible backend (MinIO locally, any S3 provider in production).
pub struct S3Storage {
    client: Client,
    bucket: String,
    public_base: String,
}

impl S3Storage {
    /// Builds the client and makes sure the bucket exists and is publicly
    /// readable.
    pub async fn connect(cfg: &StorageConfig) -> Result<Self, Error> {
        let credentials = Credentials::new(
            cfg.access_key.clone(),
            cfg.secret_key.clone(),
            None,
            None,
            "environment",
        );

        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(cfg.region.clone()))
            .endpoint_url(cfg.endpoint.clone())
            .credentials_provider(credentials)
            .load()
            .await;
        let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
            .force_path_style(true)
            .build();

        let storage = Self {
            client: Client::from_conf(s3_config),
            bucket: cfg.bucket.clone(),
            public_base: cfg.public_base.trim_end_matches('/').to_string(),
        };

        storage.ensure_bucket().await?;

        tracing::info!(
            "Object storage ready: endpoint={}, bucket={}",
            cfg.endpoint,
            cfg.bucket
        );

        Ok(storage)
    }

    async fn ensure_bucket(&self) -> Result<(), Error> {
        if self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_err()
        {
            self.client
                .create_bucket()
                .bucket(&self.bucket)
                .send()
                .await
                .map_err(|err| {
                    tracing::error!("Failed to create bucket {}: {:?}", self.bucket, err);
                    Error::Unavailable(err.to_string())
                })?;

            tracing::info!("Created bucket {}", self.bucket);
        }

        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Allow",
                "Principal": "*",
                "Action": "s3:GetObject",
                "Resource": format!("arn:aws:s3:::{}/*", self.bucket),
            }],
        });

        self.client
            .put_bucket_policy()
            .bucket(&self.bucket)
            .policy(policy.to_string())
            .send()
            .await
            .map_err(|err| {
                tracing::error!("Failed to set policy on bucket {}: {:?}", self.bucket, err);
                Error::Unavailable(err.to_string())
            })?;

        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn upload(&self, key: &str, contents: Vec<u8>, content_type: &str) -> Result<(), Error> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(contents))
            .send()
            .await
            .map_err(|err| {
                tracing::error!("Error occurred while trying to upload {}: {:?}", key, err);
                Error::UploadFailed(err.to_string())
            })?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                tracing::error!("Failed to delete object {}: {:?}", key, err);
                Error::DeleteFailed(err.to_string())
            })?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key)
    }
}
