use aws_sdk_s3::{Client, config::Region, config::Credentials, config::BehaviorVersion};
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::primitives::ByteStream;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

use super::{ObjectStore, StorageError};

#[derive(Clone)]
pub struct StorageService {
    client: Client,
}

impl StorageService {
    pub async fn new(endpoint: &str, access_key: &str, secret_key: &str) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            .force_path_style(true) // Required for MinIO
            .build();

        let client = Client::from_conf(config);

        info!("✅ Connected to S3 (MinIO)");

        Self { client }
    }
}

#[async_trait]
impl ObjectStore for StorageService {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StorageError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(ctx)) if matches!(ctx.err(), HeadBucketError::NotFound(_)) => {
                Ok(false)
            }
            Err(err) => Err(StorageError::Transfer(err.to_string())),
        }
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| match &err {
                SdkError::ServiceError(ctx) if matches!(ctx.err(), GetObjectError::NoSuchKey(_)) => {
                    StorageError::NotFound(key.to_string())
                }
                _ => StorageError::Transfer(err.to_string()),
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|err| StorageError::Transfer(err.to_string()))?;

        Ok(data.into_bytes())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|err| StorageError::Transfer(err.to_string()))?;

        Ok(())
    }
}
