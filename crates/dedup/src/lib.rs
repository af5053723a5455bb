//! Duplicate detection for content records
//!
//! Two entry points share one identity-matching rule but run independently:
//! [`find_duplicate_groups`] partitions a sorted batch listing for the
//! admin view, and [`CanonicalResolver`] decides per record, at serve time,
//! whether it should defer to an earlier original. There is no cache
//! between them; both recompute from the store snapshot they are given.

pub mod grouper;
pub mod policy;
pub mod resolver;

pub use grouper::{find_duplicate_groups, DuplicateGroup};
pub use policy::CanonicalPolicy;
pub use resolver::{CanonicalDecision, CanonicalResolver};

/// Duplicate detection errors
#[derive(thiserror::Error, Debug)]
pub enum DedupError {
    #[error("records not sorted by (title, id) at position {position}")]
    UnsortedInput { position: usize },

    #[error("store error: {0}")]
    Store(#[from] dcr_store::StoreError),
}

pub type Result<T> = std::result::Result<T, DedupError>;
