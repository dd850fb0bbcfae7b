//! Error definitions shared by every table variant.
use thiserror::Error;

/// Crate-wide error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A direct-access table was addressed with a key outside its declared bound.
    #[error("key {key} is outside the declared range [{lower}, {upper}]")]
    OutOfRange { key: i64, lower: i64, upper: i64 },

    /// `get`/`get_mut`/`remove` on a key that is not stored.
    #[error("key {0} not found")]
    KeyNotFound(i64),

    /// A direct-access table was declared with `lower > upper`.
    #[error("invalid key range: lower bound {lower} exceeds upper bound {upper}")]
    InvalidBounds { lower: i64, upper: i64 },

    /// A placement or probe loop ran out of search space. Never happens in correct operation.
    #[error("table invariant violated: {0}")]
    InvariantViolation(&'static str),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
