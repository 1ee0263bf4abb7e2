//! Photo storage port

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::DomainError;

/// Image payload handed to the storage provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Location of a stored asset and the provider reference needed to delete it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPhoto {
    pub url: String,
    pub public_id: Option<String>,
}

/// Binary storage for member photos. Failures come back as
/// [`DomainError::StorageError`] carrying the provider's message; nothing is
/// retried here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn upload(&self, upload: PhotoUpload) -> Result<UploadedPhoto, DomainError>;
    async fn delete(&self, public_id: &str) -> Result<(), DomainError>;
}
