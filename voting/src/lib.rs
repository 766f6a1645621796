//! Token-weighted commit-reveal voting.
//!
//! Voters lock tokens as voting rights, commit a hidden vote (a hash of the
//! option and a salt) during a poll's commit window, and disclose it during
//! the reveal window that follows. Each voter keeps a list of active
//! commitments sorted by amount; only the largest is reserved against
//! withdrawal, so one balance can back many overlapping polls.
//!
//! - [`list::SortedCommitmentList`]: hinted O(1) insertion with independent validation
//! - [`poll::Poll`]: commit, reveal, and ended phases
//! - [`tally::Tally`]: quorum-adjusted outcome
//! - [`engine::VotingEngine`]: the operations, all-or-nothing per call
//! - [`factory::VotingFactory`]: independent instances

pub mod account;
pub mod attribute;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod factory;
pub mod list;
pub mod poll;
pub mod state;
pub mod tally;

pub use account::VoterAccount;
pub use attribute::AttributeStore;
pub use config::VotingConfig;
pub use engine::{CommitRequest, RevealRequest, VotingEngine};
pub use error::VotingError;
pub use events::{EventBus, VotingEvent};
pub use factory::VotingFactory;
pub use list::{CommitmentNode, SortedCommitmentList};
pub use poll::{Poll, PollPhase};
pub use state::VotingState;
pub use tally::Tally;
