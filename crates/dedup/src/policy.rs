//! Canonical-selection policies.
//!
//! The batch listing and the per-view resolver use different notions of
//! "original": the listing keeps the first record in `(title, id)` order,
//! the resolver keeps the earliest-created record. The two can disagree
//! about the same group, so both stay explicit named policies; neither
//! call site silently inherits the other's choice.

use dcr_core::ContentRecord;
use serde::{Deserialize, Serialize};

/// How to pick the original member of a matched set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalPolicy {
    /// First record in the incoming order. The batch grouper feeds it the
    /// `(title, id)`-sorted listing, so this keeps the alphabetically
    /// first record.
    SortOrder,

    /// Earliest record by creation time; ties keep the incoming order.
    CreationTime,
}

impl CanonicalPolicy {
    /// Select the original from a matched set. `None` only for an empty set.
    pub fn original<'a>(&self, records: &'a [ContentRecord]) -> Option<&'a ContentRecord> {
        match self {
            Self::SortOrder => records.first(),
            Self::CreationTime => records.iter().min_by_key(|r| r.created_at),
        }
    }
}
