// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blob store access for credential objects.

use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use tracing::debug;

use crate::credential::BlobLocation;
use crate::error::BlobError;

/// Reads whole objects out of a blob store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn fetch(&self, location: &BlobLocation) -> Result<Vec<u8>, BlobError>;
}

/// [`BlobStore`] backed by Amazon S3.
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
}

impl S3BlobStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS configuration (environment,
    /// profile, or execution role).
    pub async fn from_env() -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(aws_sdk_s3::Client::new(&config))
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn fetch(&self, location: &BlobLocation) -> Result<Vec<u8>, BlobError> {
        debug!(versioned = location.version_id.is_some(), "fetching object from s3");
        let output = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .set_version_id(location.version_id.clone())
            .send()
            .await
            .map_err(classify)?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| BlobError::Unexpected(format!("could not read object body: {e}")))?;
        Ok(body.into_bytes().to_vec())
    }
}

fn classify(err: SdkError<GetObjectError, HttpResponse>) -> BlobError {
    let status = err.raw_response().map(|raw| raw.status().as_u16());
    match err {
        SdkError::ServiceError(service) if service.err().is_no_such_key() => BlobError::NotFound,
        _ => match status {
            Some(404) => BlobError::NotFound,
            Some(code) if !(200..300).contains(&code) => BlobError::Status(code),
            _ => BlobError::Unexpected("unexpected response received".to_owned()),
        },
    }
}
