//! Content record snapshot

use crate::slug;
use crate::types::{ContentKind, ContentStatus, RecordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable snapshot of one content record as fetched from the store.
///
/// The duplicate detection core never mutates records; the only write in
/// its vicinity is the explicit delete call on the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Store-assigned identifier
    pub id: RecordId,

    /// Human-visible title
    pub title: String,

    /// URL slug, unique within the store
    pub slug: String,

    /// Post or page
    pub kind: ContentKind,

    /// Publication status
    pub status: ContentStatus,

    /// Creation timestamp, drives the earliest-wins canonical policy
    pub created_at: DateTime<Utc>,
}

impl ContentRecord {
    /// Create a published record.
    pub fn new(
        id: RecordId,
        title: impl Into<String>,
        slug: impl Into<String>,
        kind: ContentKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            slug: slug.into(),
            kind,
            status: ContentStatus::Published,
            created_at,
        }
    }

    /// Same as [`ContentRecord::new`] but with an explicit status.
    pub fn with_status(mut self, status: ContentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }

    /// Base identity of this record's slug (trailing `-<digits>` stripped).
    pub fn base_slug(&self) -> &str {
        slug::base_slug(&self.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = ContentRecord::new(
            RecordId(1),
            "Hello World",
            "hello-world-2",
            ContentKind::Post,
            Utc::now(),
        );

        assert!(record.is_published());
        assert_eq!(record.base_slug(), "hello-world");
    }

    #[test]
    fn test_draft_is_not_published() {
        let record = ContentRecord::new(
            RecordId(2),
            "Draft",
            "draft",
            ContentKind::Page,
            Utc::now(),
        )
        .with_status(ContentStatus::Draft);

        assert!(!record.is_published());
    }
}
