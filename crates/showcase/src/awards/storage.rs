use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::domain::{Award, AwardId};
use crate::competitions::repository::RepositoryError;

/// Award storage.
pub trait AwardRepository: Send + Sync {
    fn insert_award(&self, award: Award) -> Result<Award, RepositoryError>;
    fn fetch_award(&self, id: &AwardId) -> Result<Option<Award>, RepositoryError>;
    fn list_awards(&self) -> Result<Vec<Award>, RepositoryError>;
    fn delete_award(&self, id: &AwardId) -> Result<Award, RepositoryError>;

    /// Apply `change` to the stored award as one atomic read-modify-write. The stored record is
    /// left untouched when `change` fails.
    fn modify_award<T, F>(&self, id: &AwardId, change: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Award) -> Result<T, RepositoryError>,
        Self: Sized;
}

/// Object storage capability used for award documents and photos.
pub trait BlobStore: Send + Sync {
    /// Store the bytes and return the URL they can be fetched from.
    fn upload(&self, name: &str, content_type: &str, bytes: &[u8]) -> Result<String, BlobError>;
    fn remove(&self, url: &str) -> Result<(), BlobError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("attachment is empty")]
    Empty,
    #[error("attachment {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
    #[error("blob {0} not found")]
    NotFound(String),
    #[error("blob store unavailable: {0}")]
    Unavailable(String),
}

/// Stored object kept by `MemoryBlobStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

const MEMORY_BLOB_LIMIT: usize = 10 * 1024 * 1024;

/// In-process blob store addressing objects as `memory://awards/<key>`.
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    objects: Arc<Mutex<BTreeMap<String, StoredBlob>>>,
    sequence: Arc<AtomicU64>,
}

impl MemoryBlobStore {
    pub fn get(&self, url: &str) -> Option<StoredBlob> {
        self.objects
            .lock()
            .expect("blob mutex poisoned")
            .get(url)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().expect("blob mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for MemoryBlobStore {
    fn upload(&self, name: &str, content_type: &str, bytes: &[u8]) -> Result<String, BlobError> {
        if bytes.is_empty() {
            return Err(BlobError::Empty);
        }
        if bytes.len() > MEMORY_BLOB_LIMIT {
            return Err(BlobError::TooLarge {
                size: bytes.len(),
                limit: MEMORY_BLOB_LIMIT,
            });
        }

        let key = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let url = format!("memory://awards/{key:06}/{name}");
        self.objects.lock().expect("blob mutex poisoned").insert(
            url.clone(),
            StoredBlob {
                name: name.to_string(),
                content_type: content_type.to_string(),
                bytes: bytes.to_vec(),
            },
        );
        Ok(url)
    }

    fn remove(&self, url: &str) -> Result<(), BlobError> {
        match self.objects.lock().expect("blob mutex poisoned").remove(url) {
            Some(_) => Ok(()),
            None => Err(BlobError::NotFound(url.to_string())),
        }
    }
}
