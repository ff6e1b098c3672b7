//! # Answerbook Engine
//!
//! The reconciliation core behind the Answerbook endpoint.
//!
//! Answers are stored as an append-only list of [`Record`]s inside a single
//! remote JSON document. Every write is guarded by the document's
//! [`Revision`], so the engine only ever works on a [`Snapshot`] that was
//! read fresh from the store.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine never talks to the network; callers fetch and commit
//! - **Append-only**: existing records are never updated or removed
//! - **Deterministic**: the same snapshot and batch always partition the same way
//!
//! ## Reconciliation
//!
//! A [`Batch`] of candidates is split against a snapshot by `questionId`:
//! candidates whose key is already stored are *skipped*, the rest are *added*.
//! Only the snapshot is consulted, so two candidates in one batch that share a
//! new `questionId` are both added.
//!
//! ```rust
//! use answerbook_engine::{Batch, Record, Reconciler, Revision, Snapshot};
//!
//! let snapshot = Snapshot::new(vec![Record::new(1, "a")], Revision::from("rev-1"));
//! let batch = Batch::new(vec![Record::new(1, "b"), Record::new(2, "c")]).unwrap();
//!
//! let result = Reconciler::new(&snapshot).reconcile(&batch);
//! assert_eq!(result.added, vec![Record::new(2, "c")]);
//! assert_eq!(result.skipped, vec![Record::new(1, "b")]);
//!
//! let commit = result.plan_commit(&snapshot).unwrap();
//! assert_eq!(commit.records.len(), 2);
//! assert_eq!(commit.revision.as_str(), "rev-1");
//! ```
//!
//! ## Document content
//!
//! [`decode_records`] and [`encode_records`] convert between the stored file
//! body and records. Content that is valid JSON but not an array decodes to an
//! empty list.

pub mod batch;
pub mod error;
pub mod reconcile;
pub mod record;
pub mod snapshot;

// Re-export main types at crate root
pub use batch::Batch;
pub use error::Error;
pub use reconcile::{Commit, ReconcileResult, Reconciler};
pub use record::{Identifier, Record};
pub use snapshot::{decode_records, encode_records, Revision, Snapshot};

/// Index of a candidate inside a batch.
pub type BatchIndex = usize;
