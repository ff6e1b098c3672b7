//! Document store abstraction.
//!
//! The endpoint keeps its records in a single remote document. A store hands
//! out a [`Snapshot`] (records plus revision) and accepts a full replacement
//! only while that revision is still current.

mod gist;
mod memory;

pub use gist::*;
pub use memory::*;

use answerbook_engine::{Record, Revision, Snapshot};
use async_trait::async_trait;

/// Errors raised by a document store.
///
/// The display text is what callers of the endpoint see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached, answered with a failure status, timed
    /// out, or rejected a write for a stale revision.
    #[error("{0}")]
    Unavailable(String),

    /// The store answered, but the document is missing or unreadable.
    #[error("{0}")]
    Malformed(String),
}

/// Result type for store calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Capability interface over the remote document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Read the current records and the revision they were read at.
    async fn read(&self) -> StoreResult<Snapshot>;

    /// Replace the stored records, provided the store is still at `revision`.
    async fn write_if_revision_matches(
        &self,
        records: &[Record],
        revision: &Revision,
    ) -> StoreResult<()>;
}
