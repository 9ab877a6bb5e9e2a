// src/circle/store.rs
use crate::error::{TrustError, TrustResult};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Persistent key-value store backing the trusted-circle cache. The cache
/// treats this as a single JSON blob and does its own per-address keying
/// inside it. Injected explicitly so tests can substitute an in-memory store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self) -> TrustResult<Option<Value>>;
    async fn update(&self, state: Value) -> TrustResult<()>;
}

/// In-memory store.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<Option<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self) -> TrustResult<Option<Value>> {
        Ok(self.state.read().await.clone())
    }

    async fn update(&self, state: Value) -> TrustResult<()> {
        *self.state.write().await = Some(state);
        Ok(())
    }
}

/// File-backed store: one JSON document on disk. A missing file reads as
/// empty rather than an error.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self) -> TrustResult<Option<Value>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TrustError::CacheUnavailable(e.to_string())),
        };
        let value = serde_json::from_slice(&bytes)
            .map_err(|e| TrustError::CacheUnavailable(e.to_string()))?;
        Ok(Some(value))
    }

    async fn update(&self, state: Value) -> TrustResult<()> {
        let bytes = serde_json::to_vec(&state)
            .map_err(|e| TrustError::CacheUnavailable(e.to_string()))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| TrustError::CacheUnavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get().await.unwrap().is_none());

        store.update(json!({"a": 1})).await.unwrap();
        assert_eq!(store.get().await.unwrap(), Some(json!({"a": 1})));

        store.update(json!({"b": 2})).await.unwrap();
        assert_eq!(store.get().await.unwrap(), Some(json!({"b": 2})));
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("circle.json"));
        assert!(store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("circle.json");
        let store = FileStore::new(&path);

        store.update(json!({"0xabc": {"contacts": []}})).await.unwrap();

        // A fresh handle over the same path sees the write
        let reread = FileStore::new(&path);
        assert_eq!(
            reread.get().await.unwrap(),
            Some(json!({"0xabc": {"contacts": []}}))
        );
    }

    #[tokio::test]
    async fn test_file_store_corrupt_file_is_cache_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("circle.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = FileStore::new(&path);
        let err = store.get().await.unwrap_err();
        assert!(matches!(err, TrustError::CacheUnavailable(_)));
        assert!(err.is_best_effort());
    }
}
