//! Request handlers for answer operations.

mod answers;

pub use answers::*;
