//! Single-pass duplicate grouping over a sorted batch listing.
//!
//! The scan is an adjacency check, not a full group-by: it only compares
//! each record to its predecessor, which is why the `(title, id)` sort
//! order is a hard precondition. Violations fail fast instead of quietly
//! splitting groups.

use crate::{DedupError, Result};
use dcr_core::{base_slug, is_slug_variant, ContentRecord};
use serde::Serialize;
use tracing::debug;

/// A run of published records sharing a base identity or exact title.
///
/// Holds at least two records. The first is the original under
/// [`CanonicalPolicy::SortOrder`](crate::CanonicalPolicy); the rest are
/// candidates for deletion.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    records: Vec<ContentRecord>,
}

impl DuplicateGroup {
    fn new(records: Vec<ContentRecord>) -> Self {
        debug_assert!(records.len() >= 2);
        Self { records }
    }

    /// The group member kept by the batch listing.
    pub fn original(&self) -> &ContentRecord {
        &self.records[0]
    }

    /// Every member except the original.
    pub fn candidates(&self) -> &[ContentRecord] {
        &self.records[1..]
    }

    /// All members, original first.
    pub fn records(&self) -> &[ContentRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ContentRecord> {
        self.records
    }
}

/// Partition a `(title, id)`-sorted listing into duplicate groups.
///
/// A record continues the current run when its title equals the previous
/// record's title, or its slug is a variant of the previous record's base
/// identity. Runs of length one are dropped; emitted groups are disjoint
/// and ordered by first occurrence.
///
/// Returns [`DedupError::UnsortedInput`] as soon as the input violates the
/// sort precondition; a partial scan over misordered input would miss
/// groups without any sign of trouble.
pub fn find_duplicate_groups(records: &[ContentRecord]) -> Result<Vec<DuplicateGroup>> {
    let mut groups = Vec::new();
    let mut current: Vec<ContentRecord> = Vec::new();

    for (i, pair) in records.windows(2).enumerate() {
        let (prev, record) = (&pair[0], &pair[1]);
        if (record.title.as_str(), record.id) < (prev.title.as_str(), prev.id) {
            return Err(DedupError::UnsortedInput { position: i + 1 });
        }

        let prev_base = base_slug(&prev.slug);
        if record.title == prev.title || is_slug_variant(&record.slug, prev_base) {
            if current.is_empty() {
                // The previous record heads the new run.
                current.push(prev.clone());
            }
            current.push(record.clone());
        } else if current.len() >= 2 {
            groups.push(DuplicateGroup::new(std::mem::take(&mut current)));
        } else {
            current.clear();
        }
    }

    if current.len() >= 2 {
        groups.push(DuplicateGroup::new(current));
    }

    debug!(
        records = records.len(),
        groups = groups.len(),
        "duplicate scan complete"
    );
    Ok(groups)
}
