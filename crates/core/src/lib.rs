//! Core data structures for the duplicate content resolver

pub mod record;
pub mod slug;
pub mod types;

pub use record::ContentRecord;
pub use slug::{base_slug, is_slug_variant};
pub use types::{ContentKind, ContentStatus, RecordId};
