//! Dedup manager - unified interface for duplicate content operations
//!
//! Composes the store, the batch grouper, and the online resolver into the
//! two flows the host application wires up at startup: the admin listing
//! with bulk removal, and per-view canonical-link emission.

pub mod config;

use dcr_core::RecordId;
use dcr_dedup::{
    find_duplicate_groups, CanonicalDecision, CanonicalResolver, DedupError, DuplicateGroup,
};
use dcr_store::{ContentStore, StoreError};
use dashmap::DashMap;
use std::sync::Arc;

pub use config::ManagerConfig;

/// Dedup manager errors
#[derive(thiserror::Error, Debug)]
pub enum ManagerError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("dedup error: {0}")]
    Dedup(#[from] DedupError),

    #[error("record not found: {0}")]
    RecordNotFound(RecordId),
}

pub type Result<T> = std::result::Result<T, ManagerError>;

/// One page of the duplicate report.
#[derive(Debug, Clone)]
pub struct DuplicatePage {
    pub groups: Vec<DuplicateGroup>,
    pub page: usize,
    pub total_groups: usize,
    pub total_pages: usize,
}

/// Canonical link derived for one content view.
#[derive(Debug, Clone)]
pub struct CanonicalLink {
    pub decision: CanonicalDecision,
    /// URL to emit, if any: the original's permalink for duplicates, the
    /// record's own permalink when default emission is enabled.
    pub href: Option<String>,
}

/// Per-id outcomes of a bulk deletion.
///
/// The deletion loop is not atomic: each id is processed independently and
/// a failure never rolls back or stops the rest.
#[derive(Debug, Clone, Default)]
pub struct DeletionReport {
    pub deleted: Vec<RecordId>,
    pub missing: Vec<RecordId>,
    pub failed: Vec<(RecordId, String)>,
}

/// Statistics about dedup manager operations
#[derive(Debug, Clone, Default)]
pub struct ManagerStats {
    pub scans_run: u64,
    pub groups_found: u64,
    pub records_deleted: u64,
    pub resolutions: u64,
}

/// The dedup manager coordinating all duplicate content operations
pub struct DedupManager<S: ContentStore> {
    /// Content store backend
    store: Arc<S>,

    /// Online canonical resolver
    resolver: CanonicalResolver,

    /// Configuration
    config: ManagerConfig,

    /// Statistics
    stats: Arc<DashMap<String, u64>>,
}

impl<S: ContentStore> DedupManager<S> {
    /// Create a new dedup manager
    pub fn new(store: S, config: ManagerConfig) -> Self {
        Self::with_store(Arc::new(store), config)
    }

    /// Create a manager sharing an existing store handle
    pub fn with_store(store: Arc<S>, config: ManagerConfig) -> Self {
        Self {
            store,
            resolver: CanonicalResolver::new(),
            config,
            stats: Arc::new(DashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Run a full duplicate scan over the configured kinds.
    pub async fn duplicate_report(&self) -> Result<Vec<DuplicateGroup>> {
        let records = self.store.list_published(&self.config.kinds).await?;
        let groups = find_duplicate_groups(&records)?;

        self.increment_stat("scans_run", 1);
        self.increment_stat("groups_found", groups.len() as u64);

        tracing::debug!(groups = groups.len(), "duplicate report ready");
        Ok(groups)
    }

    /// One page of the duplicate report.
    ///
    /// `page` is 1-based and clamped to a minimum of 1; a page past the
    /// end yields an empty group list with the totals intact.
    pub async fn duplicates_page(&self, page: usize) -> Result<DuplicatePage> {
        let groups = self.duplicate_report().await?;

        let page = page.max(1);
        let page_size = self.config.page_size;
        let total_groups = groups.len();
        let total_pages = total_groups.div_ceil(page_size);
        let start = (page - 1).saturating_mul(page_size);

        let groups: Vec<DuplicateGroup> =
            groups.into_iter().skip(start).take(page_size).collect();

        Ok(DuplicatePage {
            groups,
            page,
            total_groups,
            total_pages,
        })
    }

    /// Resolve the canonical link for one content view.
    ///
    /// Drafts get no link: only published records take part in duplicate
    /// detection, and the store queries would otherwise mark a draft as a
    /// duplicate of its own published sibling.
    pub async fn canonical_link(&self, id: RecordId) -> Result<CanonicalLink> {
        let record = self
            .store
            .get(id)
            .await?
            .ok_or(ManagerError::RecordNotFound(id))?;

        if !record.is_published() {
            return Ok(CanonicalLink {
                decision: CanonicalDecision::Canonical,
                href: None,
            });
        }

        let decision = self.resolver.resolve(self.store.as_ref(), &record).await?;
        self.increment_stat("resolutions", 1);

        let href = match decision {
            CanonicalDecision::DuplicateOf(canonical) => {
                Some(self.store.permalink(canonical).await?)
            }
            CanonicalDecision::Canonical if self.config.emit_default_canonical => {
                Some(self.store.permalink(id).await?)
            }
            CanonicalDecision::Canonical => None,
        };

        Ok(CanonicalLink { decision, href })
    }

    /// Delete the selected records, one by one.
    ///
    /// Irreversible. Absent ids are no-ops, failures are recorded and the
    /// loop keeps going; the report says what actually happened.
    pub async fn delete_records(&self, ids: &[RecordId]) -> DeletionReport {
        let mut report = DeletionReport::default();

        for &id in ids {
            match self.store.delete(id).await {
                Ok(true) => {
                    tracing::debug!(%id, "record deleted");
                    report.deleted.push(id);
                }
                Ok(false) => {
                    tracing::debug!(%id, "record already absent, skipping");
                    report.missing.push(id);
                }
                Err(e) => {
                    tracing::warn!(%id, error = %e, "deletion failed, continuing");
                    report.failed.push((id, e.to_string()));
                }
            }
        }

        self.increment_stat("records_deleted", report.deleted.len() as u64);
        report
    }

    /// Get dedup manager statistics
    pub fn stats(&self) -> ManagerStats {
        ManagerStats {
            scans_run: self.get_stat("scans_run"),
            groups_found: self.get_stat("groups_found"),
            records_deleted: self.get_stat("records_deleted"),
            resolutions: self.get_stat("resolutions"),
        }
    }

    fn increment_stat(&self, key: &str, by: u64) {
        self.stats
            .entry(key.to_string())
            .and_modify(|v| *v += by)
            .or_insert(by);
    }

    fn get_stat(&self, key: &str) -> u64 {
        self.stats.get(key).map(|v| *v).unwrap_or(0)
    }
}
