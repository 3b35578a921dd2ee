pub mod s3;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use rand::RngCore;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Object storage capability. Any provider honoring these three operations can
/// back avatar uploads.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, key: &str, contents: Vec<u8>, content_type: &str) -> Result<(), Error>;

    async fn delete(&self, key: &str) -> Result<(), Error>;

    /// Browser-reachable URL for `key`.
    fn public_url(&self, key: &str) -> String;
}

/// `{account_id}/{32 hex chars}{extension}`
pub fn avatar_key(account_id: &str, extension: &str) -> String {
    let mut random = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut random);
    format!("{}/{}{}", account_id, hex::encode(random), extension)
}
