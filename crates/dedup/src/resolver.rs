//! Online canonical resolution for a single content view.
//!
//! Runs per request, one record at a time, re-deriving its duplicate set
//! from the live store so the answer tracks deletions immediately. Slug
//! variants are checked first; exact-title matching is only a fallback
//! when the slug query finds nothing beyond the record itself.

use crate::policy::CanonicalPolicy;
use crate::Result;
use dcr_core::{base_slug, ContentRecord, RecordId};
use dcr_store::ContentStore;
use tracing::debug;

/// Outcome of resolving one record against the current store state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalDecision {
    /// The record is its own group's original, or belongs to no group.
    Canonical,

    /// The record duplicates an earlier original and should point at it.
    DuplicateOf(RecordId),
}

impl CanonicalDecision {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateOf(_))
    }

    pub fn canonical_id(&self) -> Option<RecordId> {
        match self {
            Self::DuplicateOf(id) => Some(*id),
            Self::Canonical => None,
        }
    }
}

/// Decides whether a record defers to an earlier record sharing its
/// identity.
///
/// Deterministic for a given store state; zero or one matches is a valid
/// non-duplicate outcome, never an error.
#[derive(Debug, Clone, Copy)]
pub struct CanonicalResolver {
    policy: CanonicalPolicy,
}

impl CanonicalResolver {
    /// Resolver with the earliest-created-wins policy.
    pub fn new() -> Self {
        Self {
            policy: CanonicalPolicy::CreationTime,
        }
    }

    pub fn with_policy(policy: CanonicalPolicy) -> Self {
        Self { policy }
    }

    /// Resolve `record` against the store.
    pub async fn resolve<S: ContentStore>(
        &self,
        store: &S,
        record: &ContentRecord,
    ) -> Result<CanonicalDecision> {
        let base = base_slug(&record.slug);

        let candidates = store.query_by_base(record.kind, base).await?;
        if candidates.len() > 1 {
            return Ok(self.decide(record, &candidates));
        }

        let by_title = store.query_by_title(record.kind, &record.title).await?;
        if by_title.len() > 1 {
            return Ok(self.decide(record, &by_title));
        }

        Ok(CanonicalDecision::Canonical)
    }

    fn decide(&self, record: &ContentRecord, candidates: &[ContentRecord]) -> CanonicalDecision {
        match self.policy.original(candidates) {
            Some(original) if original.id != record.id => {
                debug!(
                    record = %record.id,
                    canonical = %original.id,
                    "record defers to earlier original"
                );
                CanonicalDecision::DuplicateOf(original.id)
            }
            _ => CanonicalDecision::Canonical,
        }
    }
}

impl Default for CanonicalResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dcr_core::{ContentKind, RecordId};
    use dcr_store::InMemoryContentStore;

    fn rec(id: u64, title: &str, slug: &str, created: i64) -> ContentRecord {
        ContentRecord::new(
            RecordId(id),
            title,
            slug,
            ContentKind::Post,
            Utc.timestamp_opt(created, 0).unwrap(),
        )
    }

    fn slug_variant_store() -> (InMemoryContentStore, ContentRecord, ContentRecord) {
        let store = InMemoryContentStore::new();
        let newest = rec(1, "Foo", "foo", 3);
        let earliest = rec(2, "Foo", "foo-2", 1);
        store.insert(newest.clone());
        store.insert(earliest.clone());
        store.insert(rec(3, "Foo", "foo-3", 2));
        (store, newest, earliest)
    }

    #[tokio::test]
    async fn test_earliest_created_wins() {
        let (store, newest, earliest) = slug_variant_store();
        let resolver = CanonicalResolver::new();

        let decision = resolver.resolve(&store, &newest).await.unwrap();

        assert!(decision.is_duplicate());
        assert_eq!(decision.canonical_id(), Some(earliest.id));
    }

    #[tokio::test]
    async fn test_original_is_canonical() {
        let (store, _, earliest) = slug_variant_store();
        let resolver = CanonicalResolver::new();

        let decision = resolver.resolve(&store, &earliest).await.unwrap();

        assert_eq!(decision, CanonicalDecision::Canonical);
        assert_eq!(decision.canonical_id(), None);
    }

    #[tokio::test]
    async fn test_title_fallback_when_slugs_unrelated() {
        let store = InMemoryContentStore::new();
        let earlier = rec(1, "Same Title", "welcome", 1);
        let later = rec(2, "Same Title", "intro", 2);
        store.insert(earlier.clone());
        store.insert(later.clone());

        let resolver = CanonicalResolver::new();

        let decision = resolver.resolve(&store, &later).await.unwrap();
        assert_eq!(decision, CanonicalDecision::DuplicateOf(earlier.id));

        let decision = resolver.resolve(&store, &earlier).await.unwrap();
        assert_eq!(decision, CanonicalDecision::Canonical);
    }

    #[tokio::test]
    async fn test_slug_match_skips_title_fallback() {
        // A slug-variant group is decided on its own; an unrelated record
        // with the same title never enters the picture.
        let store = InMemoryContentStore::new();
        let original = rec(1, "Foo", "foo", 2);
        let variant = rec(2, "Foo", "foo-2", 3);
        store.insert(original.clone());
        store.insert(variant.clone());
        store.insert(rec(3, "Foo", "unrelated", 1));

        let resolver = CanonicalResolver::new();

        let decision = resolver.resolve(&store, &variant).await.unwrap();
        assert_eq!(decision, CanonicalDecision::DuplicateOf(original.id));
    }

    #[tokio::test]
    async fn test_lone_record_is_canonical() {
        let store = InMemoryContentStore::new();
        let record = rec(1, "Only", "only", 1);
        store.insert(record.clone());

        let resolver = CanonicalResolver::new();
        let decision = resolver.resolve(&store, &record).await.unwrap();

        assert_eq!(decision, CanonicalDecision::Canonical);
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let (store, newest, _) = slug_variant_store();
        let resolver = CanonicalResolver::new();

        let first = resolver.resolve(&store, &newest).await.unwrap();
        let second = resolver.resolve(&store, &newest).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_kinds_are_scoped() {
        let store = InMemoryContentStore::new();
        let post = rec(1, "Foo", "foo", 2);
        store.insert(post.clone());
        store.insert(ContentRecord::new(
            RecordId(2),
            "Foo",
            "foo-2",
            ContentKind::Page,
            Utc.timestamp_opt(1, 0).unwrap(),
        ));

        let resolver = CanonicalResolver::new();
        let decision = resolver.resolve(&store, &post).await.unwrap();

        assert_eq!(decision, CanonicalDecision::Canonical);
    }
}
