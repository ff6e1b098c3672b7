//! Record types for stored answers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// An integer-like identifier.
///
/// Stored documents carry either JSON integers or JSON strings in the
/// identifier fields. Equality is strict: `1` and `"1"` are different keys.
/// Integers that fit in `i64` always decode as [`Identifier::Int`], so
/// [`Identifier::UInt`] only holds values above `i64::MAX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// A JSON integer
    Int(i64),
    /// A JSON integer above `i64::MAX`
    UInt(u64),
    /// A JSON string
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Int(n) => write!(f, "{}", n),
            Identifier::UInt(n) => write!(f, "{}", n),
            Identifier::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Int(value)
    }
}

impl From<i32> for Identifier {
    fn from(value: i32) -> Self {
        Identifier::Int(value.into())
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(n) => Identifier::Int(n),
            Err(_) => Identifier::UInt(value),
        }
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Text(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::Text(value)
    }
}

/// A single answer: which option was picked for which question.
///
/// `question_id` is the natural key of the stored collection. Any other
/// fields found on a record are carried in `extra` and written back as read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// The question being answered
    pub question_id: Identifier,
    /// The chosen option (opaque payload)
    pub option_id: Identifier,
    /// Fields other than the two identifiers
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Create a new record with no extra fields.
    pub fn new(question_id: impl Into<Identifier>, option_id: impl Into<Identifier>) -> Self {
        Self {
            question_id: question_id.into(),
            option_id: option_id.into(),
            extra: Map::new(),
        }
    }

    /// Add an extra field.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// The same answer reduced to its two identifiers.
    pub fn answer(&self) -> Record {
        Record::new(self.question_id.clone(), self.option_id.clone())
    }
}
