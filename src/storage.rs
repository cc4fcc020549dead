//! Object storage
//!
//! Provisions the target bucket and uploads raw weather payloads to
//! S3-compatible storage.

use async_trait::async_trait;
use s3::bucket_ops::BucketConfiguration;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::StorageError;

/// Outcome of provisioning the bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketStatus {
    Exists,
    Created,
}

/// Bucket-scoped object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket this store writes into
    fn bucket_name(&self) -> &str;

    /// Create the bucket unless it already exists.
    ///
    /// Only a "not found" answer leads to creation; any other failure is
    /// returned so a bucket owned by someone else is never recreated.
    async fn ensure_bucket(&self) -> Result<BucketStatus, StorageError>;

    /// Upload `body` as JSON under `key`
    async fn put_json(&self, key: &str, body: &Value) -> Result<(), StorageError>;
}

/// Object key used for a city's current conditions
pub fn weather_object_key(city: &str) -> String {
    format!("{city}_weather.json")
}

/// Upload a city's current conditions, logging instead of failing.
///
/// Returns `true` when the upload succeeded.
pub async fn save_weather<S>(store: &S, city: &str, data: &Value) -> bool
where
    S: ObjectStore + ?Sized,
{
    let key = weather_object_key(city);
    match store.put_json(&key, data).await {
        Ok(()) => {
            info!(city = %city, key = %key, "Successfully saved data to S3");
            true
        }
        Err(e) => {
            warn!(city = %city, key = %key, error = %e, "Error saving to S3");
            false
        }
    }
}

/// S3 store backed by `rust-s3`
#[derive(Debug)]
pub struct S3Store {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    path_style: bool,
}

impl S3Store {
    /// Builds a bucket handle from `config`.
    ///
    /// Credentials come from the environment or the shared profile. When
    /// none are available the store uses anonymous credentials so that
    /// requests fail at call time instead of at startup.
    pub fn connect(config: &Config) -> Result<Self, StorageError> {
        let credentials = Credentials::default().or_else(|e| {
            warn!(error = %e, "No AWS credentials found, using anonymous access");
            Credentials::anonymous()
        });
        let credentials = credentials.map_err(|e| StorageError::Config(e.to_string()))?;

        let region = if let Some(ref endpoint) = config.endpoint {
            Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            }
        } else {
            config
                .region
                .parse()
                .map_err(|e| StorageError::Config(format!("Invalid S3 region: {e}")))?
        };

        Self::with_credentials(&config.bucket_name, region, credentials)
    }

    /// Builds a bucket handle with explicit region and credentials.
    ///
    /// Custom regions use path-style addressing, which MinIO and most
    /// S3-compatible services require.
    pub fn with_credentials(
        bucket_name: &str,
        region: Region,
        credentials: Credentials,
    ) -> Result<Self, StorageError> {
        let path_style = matches!(region, Region::Custom { .. });

        let mut bucket = Bucket::new(bucket_name, region.clone(), credentials.clone())?;
        if path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            region,
            credentials,
            path_style,
        })
    }

    async fn create_bucket(&self) -> Result<(), StorageError> {
        let name = self.bucket.name.clone();
        let response = if self.path_style {
            Bucket::create_with_path_style(
                &name,
                self.region.clone(),
                self.credentials.clone(),
                BucketConfiguration::default(),
            )
            .await?
        } else {
            Bucket::create(
                &name,
                self.region.clone(),
                self.credentials.clone(),
                BucketConfiguration::default(),
            )
            .await?
        };

        if !response.success() {
            return Err(StorageError::Status {
                code: response.response_code,
                body: response.response_text,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn bucket_name(&self) -> &str {
        &self.bucket.name
    }

    async fn ensure_bucket(&self) -> Result<BucketStatus, StorageError> {
        // HEAD on the bucket root is a HeadBucket request
        let (_, code) = self.bucket.head_object("/").await?;
        match code {
            200..=299 | 301 => return Ok(BucketStatus::Exists),
            404 => debug!(bucket = %self.bucket.name, "Bucket not found"),
            code => {
                return Err(StorageError::Status {
                    code,
                    body: String::new(),
                })
            }
        }

        self.create_bucket().await?;
        info!(bucket = %self.bucket.name, "Bucket created");
        Ok(BucketStatus::Created)
    }

    async fn put_json(&self, key: &str, body: &Value) -> Result<(), StorageError> {
        let payload = serde_json::to_vec(body)?;

        let response = self
            .bucket
            .put_object_with_content_type(key, &payload, "application/json")
            .await?;

        if response.status_code() != 200 {
            return Err(StorageError::Status {
                code: response.status_code(),
                body: String::from_utf8_lossy(response.as_slice()).into_owned(),
            });
        }
        Ok(())
    }
}
