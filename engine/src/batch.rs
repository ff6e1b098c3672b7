//! Candidate batches submitted by clients.

use crate::{error::Result, Error, Record};
use serde_json::Value;

/// A non-empty, ordered sequence of candidate records.
///
/// Batches may contain duplicates of each other or of stored records;
/// sorting that out is the reconciler's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    records: Vec<Record>,
}

impl Batch {
    /// Create a batch from records, rejecting an empty list.
    pub fn new(records: Vec<Record>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::EmptyBatch);
        }
        Ok(Self { records })
    }

    /// Build a batch from an arbitrary JSON value (typically a request body).
    ///
    /// The value must be a non-empty array whose elements all decode as
    /// [`Record`]s.
    pub fn from_value(value: Value) -> Result<Self> {
        let items = match value {
            Value::Array(items) => items,
            _ => return Err(Error::NotAnArray),
        };

        if items.is_empty() {
            return Err(Error::EmptyBatch);
        }

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item).map_err(|e| Error::InvalidRecord {
                    index,
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<Record>>>()?;

        Ok(Self { records })
    }

    /// The candidates in submission order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
