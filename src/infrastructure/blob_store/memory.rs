use super::{BlobStore, StoredBlob};
use crate::domain::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-process store that enforces version tokens the way GitHub does.
#[derive(Default)]
pub struct MemoryBlobStore {
    files: Mutex<HashMap<String, (String, u64)>>,
    next_version: Mutex<u64>,
    writes: Mutex<usize>,
    fail_fetch_with: Option<u16>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_fetch(status: u16) -> Self {
        Self {
            fail_fetch_with: Some(status),
            ..Self::default()
        }
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        let version = self.bump_version();
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), (content.to_string(), version));
        self
    }

    pub fn content(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|(content, _)| content.clone())
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    fn bump_version(&self) -> u64 {
        let mut next = self.next_version.lock().unwrap();
        *next += 1;
        *next
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn fetch(&self, path: &str) -> Result<StoredBlob> {
        if let Some(status) = self.fail_fetch_with {
            return Err(AppError::UpstreamError(format!("GitHub GET failed: {}", status)));
        }
        Ok(match self.files.lock().unwrap().get(path) {
            Some((content, version)) => StoredBlob::Present {
                version: format!("v{}", version),
                content: content.clone(),
            },
            None => StoredBlob::Missing,
        })
    }

    async fn store(
        &self,
        path: &str,
        content: &str,
        version: Option<&str>,
        _message: &str,
    ) -> Result<()> {
        let current = self
            .files
            .lock()
            .unwrap()
            .get(path)
            .map(|(_, v)| format!("v{}", v));

        if current.as_deref() != version {
            return Err(AppError::UpstreamError(format!(
                "GitHub PUT failed: 409 {} does not match {:?}",
                path, version
            )));
        }

        let next = self.bump_version();
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), (content.to_string(), next));
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}
