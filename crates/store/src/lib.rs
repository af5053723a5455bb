//! Content store abstraction
//!
//! The store is an external collaborator: the duplicate detection core
//! queries it and invokes a single mutating operation (delete). This crate
//! owns the trait boundary plus an in-memory implementation used by tests
//! and the bundled server.

pub mod memory;

use dcr_core::{ContentKind, ContentRecord, RecordId};
use async_trait::async_trait;

pub use memory::InMemoryContentStore;

/// Store errors
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Read interface over content records, plus the one delete operation the
/// administrative flow needs.
///
/// Ordering contracts matter: the grouper's single-pass scan is only
/// correct over the `(title, id)` ascending order `list_published`
/// promises, and the resolver's earliest-wins rule leans on the
/// created-at ascending order of the two query methods.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch one record by id.
    async fn get(&self, id: RecordId) -> Result<Option<ContentRecord>>;

    /// All published records of the given kinds, sorted by `(title, id)`
    /// ascending.
    async fn list_published(&self, kinds: &[ContentKind]) -> Result<Vec<ContentRecord>>;

    /// Published records of `kind` whose slug equals `base` or starts with
    /// `base-`, sorted by creation time ascending. Tie order on equal
    /// timestamps is store-defined.
    async fn query_by_base(&self, kind: ContentKind, base: &str) -> Result<Vec<ContentRecord>>;

    /// Published records of `kind` with exactly this title, sorted by
    /// creation time ascending.
    async fn query_by_title(&self, kind: ContentKind, title: &str) -> Result<Vec<ContentRecord>>;

    /// Delete a record. Returns `false` when the id is already absent;
    /// that case is a no-op, not an error, so a stale admin listing can
    /// still be submitted.
    async fn delete(&self, id: RecordId) -> Result<bool>;

    /// Public URL for a record.
    async fn permalink(&self, id: RecordId) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::RecordNotFound(RecordId(7));
        assert!(err.to_string().contains("record not found"));
    }
}
