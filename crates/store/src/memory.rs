//! In-memory content store for testing and development
//!
//! Provides simple map-based storage without external dependencies.

use crate::{ContentStore, Result, StoreError};
use dcr_core::{is_slug_variant, ContentKind, ContentRecord, ContentStatus, RecordId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// In-memory content store
///
/// Records live in a `BTreeMap` keyed by id so iteration order is
/// deterministic; the query methods use stable sorts on top of it, which
/// makes creation-time ties resolve to the lowest id.
#[derive(Clone)]
pub struct InMemoryContentStore {
    records: Arc<RwLock<BTreeMap<RecordId, ContentRecord>>>,
    next_id: Arc<AtomicU64>,
    base_url: String,
}

impl InMemoryContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_base_url("http://localhost")
    }

    /// Create an empty store emitting permalinks under the given base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            base_url: base_url.into(),
        }
    }

    /// Insert a fully-formed record, keeping the id counter ahead of it.
    pub fn insert(&self, record: ContentRecord) {
        self.next_id.fetch_max(record.id.0 + 1, Ordering::SeqCst);
        self.records.write().insert(record.id, record);
    }

    /// Create a record with the next free id and return that id.
    pub fn create(
        &self,
        title: impl Into<String>,
        slug: impl Into<String>,
        kind: ContentKind,
        status: ContentStatus,
        created_at: DateTime<Utc>,
    ) -> RecordId {
        let id = RecordId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let record =
            ContentRecord::new(id, title, slug, kind, created_at).with_status(status);
        self.records.write().insert(id, record);
        id
    }

    /// Get number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn published_of_kind(&self, kind: ContentKind) -> Vec<ContentRecord> {
        self.records
            .read()
            .values()
            .filter(|r| r.is_published() && r.kind == kind)
            .cloned()
            .collect()
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn get(&self, id: RecordId) -> Result<Option<ContentRecord>> {
        Ok(self.records.read().get(&id).cloned())
    }

    async fn list_published(&self, kinds: &[ContentKind]) -> Result<Vec<ContentRecord>> {
        let mut records: Vec<ContentRecord> = self
            .records
            .read()
            .values()
            .filter(|r| r.is_published() && kinds.contains(&r.kind))
            .cloned()
            .collect();

        records.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn query_by_base(&self, kind: ContentKind, base: &str) -> Result<Vec<ContentRecord>> {
        let mut records: Vec<ContentRecord> = self
            .published_of_kind(kind)
            .into_iter()
            .filter(|r| is_slug_variant(&r.slug, base))
            .collect();

        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    async fn query_by_title(&self, kind: ContentKind, title: &str) -> Result<Vec<ContentRecord>> {
        let mut records: Vec<ContentRecord> = self
            .published_of_kind(kind)
            .into_iter()
            .filter(|r| r.title == title)
            .collect();

        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    async fn delete(&self, id: RecordId) -> Result<bool> {
        Ok(self.records.write().remove(&id).is_some())
    }

    async fn permalink(&self, id: RecordId) -> Result<String> {
        let records = self.records.read();
        let record = records
            .get(&id)
            .ok_or(StoreError::RecordNotFound(id))?;
        Ok(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            record.slug
        ))
    }
}
