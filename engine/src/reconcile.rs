//! Reconciliation of candidate batches against a stored snapshot.
//!
//! # Algorithm
//!
//! 1. Index the `questionId`s present in the snapshot
//! 2. Walk the batch in order; a candidate whose key is indexed is skipped
//!    as submitted, any other candidate is added with only its two
//!    identifiers
//! 3. If anything was added, plan a commit of `existing ++ added` guarded by
//!    the snapshot's revision
//!
//! The index is built from the snapshot only and is not updated while walking
//! the batch. Candidates sharing a new `questionId` within one batch are all
//! added.

use crate::{Batch, Identifier, Record, Revision, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of reconciling a batch.
///
/// `added` and `skipped` partition the batch; each keeps batch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResult {
    /// Candidates whose `questionId` is not stored yet
    pub added: Vec<Record>,
    /// Candidates whose `questionId` is already stored
    pub skipped: Vec<Record>,
}

impl ReconcileResult {
    /// True when nothing needs to be written.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty()
    }

    /// Number of candidates covered by this result.
    pub fn total(&self) -> usize {
        self.added.len() + self.skipped.len()
    }

    /// Plan the write that persists `added` on top of `snapshot`.
    ///
    /// Returns `None` when there is nothing to add; no write should be issued.
    pub fn plan_commit(&self, snapshot: &Snapshot) -> Option<Commit> {
        if self.is_noop() {
            return None;
        }

        Some(Commit {
            records: snapshot.appended(&self.added),
            revision: snapshot.revision.clone(),
        })
    }
}

/// A planned conditional write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Full record sequence to store
    pub records: Vec<Record>,
    /// Revision the store must still be at for the write to apply
    pub revision: Revision,
}

/// Partitions batches against the keys of one snapshot.
pub struct Reconciler<'a> {
    existing: HashSet<&'a Identifier>,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler for `snapshot`.
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self::from_records(&snapshot.records)
    }

    /// Create a reconciler from stored records directly.
    pub fn from_records(records: &'a [Record]) -> Self {
        Self {
            existing: records.iter().map(|r| &r.question_id).collect(),
        }
    }

    /// Check whether `question_id` is already stored.
    pub fn is_stored(&self, question_id: &Identifier) -> bool {
        self.existing.contains(question_id)
    }

    /// Split `batch` into added and skipped candidates.
    pub fn reconcile(&self, batch: &Batch) -> ReconcileResult {
        let mut result = ReconcileResult::default();

        for candidate in batch {
            if self.is_stored(&candidate.question_id) {
                result.skipped.push(candidate.clone());
            } else {
                result.added.push(candidate.answer());
            }
        }

        result
    }
}
