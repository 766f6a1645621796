//! Nullable infrastructure for deterministic testing.
//!
//! External collaborators (the clock and the token ledger) are swapped for
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record what the system asked of them

pub mod clock;
pub mod token;

pub use clock::NullClock;
pub use token::{NullToken, TokenCall};
