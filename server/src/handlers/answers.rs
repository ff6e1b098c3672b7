//! Answer handlers - the read-merge-write cycle against the document store.
//!
//! Submissions follow one fixed sequence:
//!
//! 1. read a fresh snapshot
//! 2. reconcile the batch against it
//! 3. stop if nothing is new
//! 4. otherwise write `existing ++ added` guarded by the snapshot revision
//!
//! Steps 1 and 4 are separate round-trips. Two submissions racing on the
//! same revision rely on the store rejecting the second write; the router
//! also serializes submissions within one process.

use crate::error::Result;
use crate::store::DocumentStore;
use answerbook_engine::{Batch, Commit, Record, Reconciler, Snapshot};
use serde::Serialize;

/// Message for a submission that added nothing.
pub const NO_NEW_ITEMS: &str = "No new items";

/// Message for a submission that was committed.
pub const ITEMS_ADDED: &str = "New items added and pushed";

/// Outcome of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every candidate was already stored; nothing was written.
    NoNewItems { skipped: Vec<Record> },
    /// New candidates were written.
    Added {
        added: Vec<Record>,
        skipped: Vec<Record>,
    },
}

/// Response body when nothing was added.
#[derive(Debug, Serialize)]
pub struct NoNewItemsResponse {
    pub message: &'static str,
    pub skipped: Vec<Record>,
}

/// Response body when records were added.
#[derive(Debug, Serialize)]
pub struct AddedResponse {
    pub message: &'static str,
    pub added: Vec<Record>,
    pub skipped: Vec<Record>,
}

/// Read the current snapshot.
pub async fn fetch_snapshot(store: &dyn DocumentStore) -> Result<Snapshot> {
    let snapshot = store.read().await?;
    tracing::debug!(
        store = store.name(),
        records = snapshot.len(),
        revision = %snapshot.revision,
        "fetched snapshot"
    );
    Ok(snapshot)
}

/// Persist a planned commit: stored records followed by the added ones,
/// guarded by the revision they were read at.
pub async fn commit(store: &dyn DocumentStore, plan: &Commit) -> Result<()> {
    store
        .write_if_revision_matches(&plan.records, &plan.revision)
        .await?;
    tracing::info!(
        store = store.name(),
        total = plan.records.len(),
        revision = %plan.revision,
        "committed new answers"
    );
    Ok(())
}

/// Return every stored record.
pub async fn handle_list(store: &dyn DocumentStore) -> Result<Vec<Record>> {
    Ok(fetch_snapshot(store).await?.records)
}

/// Reconcile `batch` against the store and commit what is new.
pub async fn handle_submit(store: &dyn DocumentStore, batch: Batch) -> Result<SubmitOutcome> {
    let snapshot = fetch_snapshot(store).await?;
    let result = Reconciler::new(&snapshot).reconcile(&batch);

    let Some(plan) = result.plan_commit(&snapshot) else {
        tracing::debug!(skipped = result.skipped.len(), "no new answers in batch");
        return Ok(SubmitOutcome::NoNewItems {
            skipped: result.skipped,
        });
    };

    tracing::debug!(added = result.added.len(), "new answers in batch");
    commit(store, &plan).await?;

    Ok(SubmitOutcome::Added {
        added: result.added,
        skipped: result.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::store::{MemoryStore, StoreError};

    fn batch(records: Vec<Record>) -> Batch {
        Batch::new(records).unwrap()
    }

    #[tokio::test]
    async fn submit_adds_to_empty_store() {
        let store = MemoryStore::new();

        let outcome = handle_submit(&store, batch(vec![Record::new(1, "x")]))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Added {
                added: vec![Record::new(1, "x")],
                skipped: vec![],
            }
        );
        assert_eq!(store.records().await, vec![Record::new(1, "x")]);
    }

    #[tokio::test]
    async fn submit_without_new_items_does_not_write() {
        let store = MemoryStore::with_records(vec![Record::new(1, "x")]);
        let before = store.revision().await;

        let outcome = handle_submit(&store, batch(vec![Record::new(1, "y")]))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::NoNewItems {
                skipped: vec![Record::new(1, "y")],
            }
        );
        assert_eq!(store.writes(), 0);
        assert_eq!(store.revision().await, before);
    }

    #[tokio::test]
    async fn submit_appends_after_existing() {
        let store = MemoryStore::with_records(vec![Record::new(3, "c"), Record::new(1, "a")]);

        handle_submit(
            &store,
            batch(vec![Record::new(2, "b"), Record::new(1, "z"), Record::new(4, "d")]),
        )
        .await
        .unwrap();

        assert_eq!(
            store.records().await,
            vec![
                Record::new(3, "c"),
                Record::new(1, "a"),
                Record::new(2, "b"),
                Record::new(4, "d"),
            ]
        );
    }

    #[tokio::test]
    async fn submit_surfaces_store_failure() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        let err = handle_submit(&store, batch(vec![Record::new(1, "x")]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn commit_with_stale_revision_fails() {
        let store = MemoryStore::new();
        let snapshot = fetch_snapshot(&store).await.unwrap();

        // Another writer gets in first.
        let other = Commit {
            records: vec![Record::new(9, "other")],
            revision: snapshot.revision.clone(),
        };
        commit(&store, &other).await.unwrap();

        let ours = Commit {
            records: snapshot.appended(&[Record::new(1, "x")]),
            revision: snapshot.revision.clone(),
        };
        let err = commit(&store, &ours).await.unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::Unavailable(_))));
        assert_eq!(store.records().await, vec![Record::new(9, "other")]);
    }

    #[tokio::test]
    async fn submit_keeps_extra_fields_of_stored_records() {
        let stored = Record::new(1, "x").with_field("answeredAt", serde_json::json!("2024-01-01"));
        let store = MemoryStore::with_records(vec![stored.clone()]);

        handle_submit(&store, batch(vec![Record::new(2, "y")]))
            .await
            .unwrap();

        assert_eq!(store.records().await, vec![stored, Record::new(2, "y")]);
    }

    #[tokio::test]
    async fn list_returns_stored_records() {
        let store = MemoryStore::with_records(vec![Record::new(1, "x"), Record::new(2, "y")]);
        let records = handle_list(&store).await.unwrap();
        assert_eq!(records, vec![Record::new(1, "x"), Record::new(2, "y")]);
    }
}
