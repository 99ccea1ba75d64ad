//! AWS S3 log source.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;

use crate::error::{AppError, Result};
use crate::models::ObjectRef;
use crate::storage::LogSource;

/// Reads log objects with `GetObject`.
#[derive(Clone)]
pub struct S3LogSource {
    client: Client,
}

impl S3LogSource {
    /// Create a source around an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a source from the shared AWS configuration.
    pub fn from_conf(config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

#[async_trait]
impl LogSource for S3LogSource {
    async fn fetch_bytes(&self, object: &ObjectRef) -> Result<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .send()
            .await
            .map_err(|e| AppError::S3(format!("{}: {}", object, DisplayErrorContext(&e))))?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| AppError::S3(format!("{}: reading body: {}", object, e)))?;

        Ok(bytes.into_bytes().to_vec())
    }
}
