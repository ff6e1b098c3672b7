//! Property tests for answerbook-engine reconciliation
//!
//! These check the partition, duplicate and ordering guarantees over
//! generated snapshots and batches.

use answerbook_engine::{Batch, Identifier, Record, Reconciler, Revision, Snapshot};
use proptest::prelude::*;

fn identifier() -> impl Strategy<Value = Identifier> {
    prop_oneof![
        (0i64..20).prop_map(Identifier::Int),
        "[a-c]{1,2}".prop_map(Identifier::Text),
    ]
}

fn record() -> impl Strategy<Value = Record> {
    (identifier(), identifier(), prop::option::of("[a-z]{1,4}")).prop_map(|(q, o, note)| {
        let record = Record::new(q, o);
        match note {
            Some(note) => record.with_field("note", serde_json::Value::String(note)),
            None => record,
        }
    })
}

fn snapshot() -> impl Strategy<Value = Snapshot> {
    prop::collection::vec(record(), 0..30)
        .prop_map(|records| Snapshot::new(records, Revision::from("rev")))
}

fn batch() -> impl Strategy<Value = Batch> {
    prop::collection::vec(record(), 1..30).prop_map(|records| Batch::new(records).unwrap())
}

/// Items of `sub` appear in `full` in the same relative order.
fn is_subsequence(sub: &[Record], full: &[Record]) -> bool {
    let mut it = full.iter();
    sub.iter().all(|r| it.any(|f| f == r))
}

proptest! {
    #[test]
    fn partition_covers_batch(snap in snapshot(), batch in batch()) {
        let result = Reconciler::new(&snap).reconcile(&batch);
        prop_assert_eq!(result.added.len() + result.skipped.len(), batch.len());
        let answers: Vec<Record> = batch.iter().map(Record::answer).collect();
        prop_assert!(is_subsequence(&result.added, &answers));
        prop_assert!(is_subsequence(&result.skipped, batch.records()));
    }

    #[test]
    fn classification_follows_snapshot_keys(snap in snapshot(), batch in batch()) {
        let result = Reconciler::new(&snap).reconcile(&batch);
        for r in &result.added {
            prop_assert!(!snap.contains_question(&r.question_id));
        }
        for r in &result.skipped {
            prop_assert!(snap.contains_question(&r.question_id));
        }
    }

    #[test]
    fn stored_question_is_always_skipped(snap in snapshot(), option in identifier()) {
        prop_assume!(!snap.is_empty());
        let question_id = snap.records[0].question_id.clone();
        let candidate = Record::new(question_id, option);
        let batch = Batch::new(vec![candidate.clone()]).unwrap();

        let result = Reconciler::new(&snap).reconcile(&batch);
        prop_assert!(result.added.is_empty());
        prop_assert_eq!(&result.skipped, &vec![candidate]);
        prop_assert!(result.plan_commit(&snap).is_none());
    }

    #[test]
    fn commit_is_existing_then_added(snap in snapshot(), batch in batch()) {
        let result = Reconciler::new(&snap).reconcile(&batch);
        match result.plan_commit(&snap) {
            Some(commit) => {
                let (head, tail) = commit.records.split_at(snap.len());
                prop_assert_eq!(head, &snap.records[..]);
                prop_assert_eq!(tail, &result.added[..]);
                prop_assert_eq!(commit.revision, snap.revision.clone());
            }
            None => prop_assert!(result.added.is_empty()),
        }
    }
}

#[test]
fn duplicate_new_questions_within_batch_are_not_collapsed() {
    let snap = Snapshot::new(vec![], Revision::from("rev"));
    let batch = Batch::new(vec![Record::new(1, "a"), Record::new(1, "b")]).unwrap();

    let result = Reconciler::new(&snap).reconcile(&batch);
    assert_eq!(result.added, vec![Record::new(1, "a"), Record::new(1, "b")]);
    assert!(result.skipped.is_empty());

    // Both land in the commit, so the stored document ends up with two answers
    // for question 1.
    let commit = result.plan_commit(&snap).unwrap();
    assert_eq!(commit.records.len(), 2);
}

#[test]
fn second_submission_of_same_question_is_a_noop() {
    let empty = Snapshot::new(vec![], Revision::from("rev-1"));
    let first = Batch::new(vec![Record::new(1, "x")]).unwrap();
    let commit = Reconciler::new(&empty)
        .reconcile(&first)
        .plan_commit(&empty)
        .unwrap();

    let stored = Snapshot::new(commit.records, Revision::from("rev-2"));
    let second = Batch::new(vec![Record::new(1, "y")]).unwrap();
    let result = Reconciler::new(&stored).reconcile(&second);

    assert!(result.is_noop());
    assert_eq!(result.skipped, vec![Record::new(1, "y")]);
}
