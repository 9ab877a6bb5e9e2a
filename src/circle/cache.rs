// src/circle/cache.rs
use crate::circle::store::KeyValueStore;
use crate::types::{TrustedContact, normalize_address};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Trusted-circle entries live for one hour.
pub const CIRCLE_TTL_SECONDS: i64 = 3600;

/// One user's cached trusted circle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleEntry {
    pub contacts: Vec<TrustedContact>,
    pub cached_at: DateTime<Utc>,
}

type CircleMap = HashMap<String, CircleEntry>;

/// TTL cache of trusted circles, keyed by lowercase user address, layered
/// over an injected blob store.
///
/// The cache is an optimization, never a source of truth: every store error
/// is swallowed and reported as a miss (on read) or a no-op (on write).
/// Staleness is detected lazily on read; a stale entry stays in place until
/// the next write overwrites it.
#[derive(Clone)]
pub struct TrustedCircleCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl TrustedCircleCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            ttl: Duration::seconds(CIRCLE_TTL_SECONDS),
        }
    }

    pub fn with_ttl(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Cached contacts for a user, or None on miss, staleness, or store error.
    pub async fn get(&self, user_address: &str) -> Option<Vec<TrustedContact>> {
        let key = normalize_address(user_address);
        let map = self.read_map().await?;
        let entry = map.get(&key)?;

        let age = Utc::now().signed_duration_since(entry.cached_at);
        if age >= self.ttl {
            return None;
        }
        Some(entry.contacts.clone())
    }

    /// Write a fresh entry for one user, preserving all other entries.
    pub async fn set(&self, user_address: &str, contacts: Vec<TrustedContact>) {
        let key = normalize_address(user_address);
        let mut map = self.read_map().await.unwrap_or_default();
        map.insert(
            key,
            CircleEntry {
                contacts,
                cached_at: Utc::now(),
            },
        );
        self.write_map(map).await;
    }

    /// Remove one user's entry, or every entry when no address is given.
    pub async fn clear(&self, user_address: Option<&str>) {
        match user_address {
            Some(address) => {
                let key = normalize_address(address);
                let mut map = self.read_map().await.unwrap_or_default();
                map.remove(&key);
                self.write_map(map).await;
            }
            None => self.write_map(CircleMap::new()).await,
        }
    }

    // Best-effort read: any failure becomes a miss.
    async fn read_map(&self) -> Option<CircleMap> {
        let value = match self.store.get().await {
            Ok(value) => value?,
            Err(e) => {
                tracing::debug!(error = %e, "circle cache read failed, treating as miss");
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(map) => Some(map),
            Err(e) => {
                tracing::debug!(error = %e, "circle cache blob malformed, treating as miss");
                None
            }
        }
    }

    // Best-effort write: any failure becomes a no-op.
    async fn write_map(&self, map: CircleMap) {
        let value = match serde_json::to_value(&map) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "circle cache serialization failed, skipping write");
                return;
            }
        };
        if let Err(e) = self.store.update(value).await {
            tracing::debug!(error = %e, "circle cache write failed, skipping");
        }
    }
}
