//! In-process document store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::DocumentStore;
use crate::errors::AppError;

/// Keeps documents in a map for the lifetime of the process.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.documents
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.documents.write().await.remove(key);
        Ok(())
    }
}
