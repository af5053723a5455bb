//! Configuration for the dedup manager

use dcr_core::ContentKind;
use serde::{Deserialize, Serialize};

/// Dedup manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Content kinds included in duplicate scans
    pub kinds: Vec<ContentKind>,

    /// Duplicate groups per admin listing page
    pub page_size: usize,

    /// Emit a self-referential canonical link for non-duplicate records.
    ///
    /// Models the hosting environment's default canonical behavior as an
    /// explicit flag instead of an ambient toggle. Off by default: the
    /// host is assumed to have its own default suppressed.
    pub emit_default_canonical: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            kinds: vec![ContentKind::Post, ContentKind::Page],
            page_size: 20,
            emit_default_canonical: false,
        }
    }
}

impl ManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content kinds to scan
    pub fn with_kinds(mut self, kinds: Vec<ContentKind>) -> Self {
        self.kinds = kinds;
        self
    }

    /// Set the listing page size (clamped to at least 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Enable or disable default canonical emission
    pub fn with_emit_default_canonical(mut self, enabled: bool) -> Self {
        self.emit_default_canonical = enabled;
        self
    }
}
