//! In-process document store.
//!
//! Enforces revisions strictly, which makes it the reference for how a
//! store is expected to behave. Used for local runs and tests.

use super::{DocumentStore, StoreError, StoreResult};
use answerbook_engine::{Record, Revision, Snapshot};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Document {
    records: Vec<Record>,
    version: u64,
}

impl Document {
    fn revision(&self) -> Revision {
        Revision::new(format!("mem-{}", self.version))
    }
}

/// A document store held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RwLock<Document>,
    writes: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `records`.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            document: RwLock::new(Document {
                records,
                version: 0,
            }),
            ..Self::default()
        }
    }

    /// Current stored records.
    pub async fn records(&self) -> Vec<Record> {
        self.document.read().await.records.clone()
    }

    /// Current revision.
    pub async fn revision(&self) -> Revision {
        self.document.read().await.revision()
    }

    /// Number of accepted writes so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail as if the store were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read(&self) -> StoreResult<Snapshot> {
        self.check_available()?;
        let document = self.document.read().await;
        Ok(Snapshot::new(document.records.clone(), document.revision()))
    }

    async fn write_if_revision_matches(
        &self,
        records: &[Record],
        revision: &Revision,
    ) -> StoreResult<()> {
        self.check_available()?;
        let mut document = self.document.write().await;

        let current = document.revision();
        if &current != revision {
            return Err(StoreError::Unavailable(format!(
                "Failed to update document: revision {} is stale (current {})",
                revision, current
            )));
        }

        document.records = records.to_vec();
        document.version += 1;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_bumps_revision() {
        let store = MemoryStore::new();
        let snapshot = store.read().await.unwrap();
        assert!(snapshot.is_empty());

        store
            .write_if_revision_matches(&[Record::new(1, "x")], &snapshot.revision)
            .await
            .unwrap();

        let after = store.read().await.unwrap();
        assert_eq!(after.records, vec![Record::new(1, "x")]);
        assert_ne!(after.revision, snapshot.revision);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn stale_revision_is_rejected() {
        let store = MemoryStore::with_records(vec![Record::new(1, "x")]);
        let stale = store.read().await.unwrap();

        store
            .write_if_revision_matches(&[Record::new(2, "y")], &stale.revision)
            .await
            .unwrap();

        let err = store
            .write_if_revision_matches(&[Record::new(3, "z")], &stale.revision)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.records().await, vec![Record::new(2, "y")]);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn unavailable_fails_reads_and_writes() {
        let store = MemoryStore::new();
        let revision = store.revision().await;
        store.set_unavailable(true);

        assert!(matches!(store.read().await, Err(StoreError::Unavailable(_))));
        assert!(matches!(
            store.write_if_revision_matches(&[], &revision).await,
            Err(StoreError::Unavailable(_))
        ));

        store.set_unavailable(false);
        assert!(store.read().await.is_ok());
    }
}
