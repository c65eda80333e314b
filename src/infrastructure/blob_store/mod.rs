pub mod github;
#[cfg(test)]
pub mod memory;

use crate::domain::error::Result;
use crate::domain::store_config::StoreConfig;
use async_trait::async_trait;

pub use github::{GitHubContentsClient, GitHubStoreFactory};

/// Current state of a file in the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredBlob {
    Missing,
    Present { version: String, content: String },
}

impl StoredBlob {
    pub fn version(&self) -> Option<&str> {
        match self {
            StoredBlob::Missing => None,
            StoredBlob::Present { version, .. } => Some(version),
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            StoredBlob::Missing => None,
            StoredBlob::Present { content, .. } => Some(content),
        }
    }
}

/// Path-keyed blob store with optimistic concurrency. The branch is fixed by
/// the store's configuration.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<StoredBlob>;

    /// Writes `content` at `path`. `version` must be the token from the last
    /// fetch when the file exists, and `None` when creating it.
    async fn store(
        &self,
        path: &str,
        content: &str,
        version: Option<&str>,
        message: &str,
    ) -> Result<()>;
}

/// Builds a store for the credentials read on the current request.
pub trait BlobStoreFactory: Send + Sync {
    fn connect(&self, config: &StoreConfig) -> Box<dyn BlobStore>;
}
