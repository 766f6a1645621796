//! Error taxonomy shared across crates.
//!
//! Each crate keeps its own `thiserror` enum; every variant maps onto one of
//! these kinds so callers can branch on the category without matching the
//! full enum.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input: time arithmetic overflow, bad quorum, oversized batch.
    Validation,
    /// Unknown poll, missing voter node, missing predecessor.
    NotFound,
    /// Wrong phase or already-performed action.
    State,
    /// A disclosed vote and salt do not hash to the stored commitment.
    AuthorizationMismatch,
    /// Insufficient balance, allowance, or unreserved voting rights.
    Conservation,
    /// A caller-supplied predecessor hint would break list ordering.
    Ordering,
    /// The token ledger refused a transfer.
    TokenFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validation => "validation",
            Self::NotFound => "not found",
            Self::State => "state",
            Self::AuthorizationMismatch => "authorization mismatch",
            Self::Conservation => "conservation",
            Self::Ordering => "ordering",
            Self::TokenFailure => "token failure",
        };
        write!(f, "{}", s)
    }
}
