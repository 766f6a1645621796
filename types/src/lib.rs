//! Fundamental types for SLCR voting.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, hashes, timestamps, poll identifiers, poll parameters, and
//! the error taxonomy every engine error maps onto.

pub mod address;
pub mod error;
pub mod hash;
pub mod params;
pub mod poll;
pub mod time;

pub use address::WalletAddress;
pub use error::ErrorKind;
pub use hash::{AttributeKey, CommitHash};
pub use params::PollParams;
pub use poll::{PollId, VoteOption, ROOT_POLL_ID};
pub use time::Timestamp;
