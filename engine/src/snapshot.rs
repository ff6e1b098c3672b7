//! Snapshots of the remote document and the codec for its content.
//!
//! A snapshot is only valid for the revision it was read at. The store
//! rejects (or is expected to reject) writes carrying a stale revision.

use crate::{error::Result, Error, Identifier, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque revision token handed out by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Revision {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Revision {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The full stored collection at one revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Stored records, in document order
    pub records: Vec<Record>,
    /// Revision the records were read at
    pub revision: Revision,
}

impl Snapshot {
    /// Create a snapshot from records read at `revision`.
    pub fn new(records: Vec<Record>, revision: Revision) -> Self {
        Self { records, revision }
    }

    /// Check whether a record for `question_id` is already stored.
    pub fn contains_question(&self, question_id: &Identifier) -> bool {
        self.records.iter().any(|r| &r.question_id == question_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stored records followed by `added`, preserving both orders.
    pub fn appended(&self, added: &[Record]) -> Vec<Record> {
        let mut records = Vec::with_capacity(self.records.len() + added.len());
        records.extend_from_slice(&self.records);
        records.extend_from_slice(added);
        records
    }
}

/// Decode a stored document body into records.
///
/// Blank content (a freshly created file) and JSON that is not an array both
/// decode to an empty list. Text that is not JSON, or an array holding
/// something other than records, is an error: writing back over it would
/// destroy data we could not read.
pub fn decode_records(content: &str) -> Result<Vec<Record>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value =
        serde_json::from_str(content).map_err(|e| Error::InvalidContent(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item)
                .map_err(|e| Error::InvalidContent(format!("element {}: {}", i, e)))
        })
        .collect()
}

/// Encode records as the stored document body (pretty JSON, two-space indent).
pub fn encode_records(records: &[Record]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(|e| Error::InvalidContent(e.to_string()))
}
