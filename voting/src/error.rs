use slcr_types::{ErrorKind, PollId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VotingError {
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("quorum must be between 0 and 100 percent, got {0}")]
    InvalidQuorum(u8),

    #[error("batch of {len} exceeds the limit of {max}")]
    BatchTooLarge { len: usize, max: usize },

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("poll {0} does not exist")]
    PollNotFound(PollId),

    #[error("{voter} has no commitment in poll {poll_id}")]
    NoCommitment { voter: String, poll_id: PollId },

    #[error("predecessor poll {0} is not in the voter's commitment list")]
    PredecessorNotFound(PollId),

    #[error("commit period of poll {0} is not active")]
    CommitPeriodNotActive(PollId),

    #[error("reveal period of poll {0} is not active")]
    RevealPeriodNotActive(PollId),

    #[error("poll {0} has not ended")]
    PollNotEnded(PollId),

    #[error("{voter} has already revealed in poll {poll_id}")]
    AlreadyRevealed { voter: String, poll_id: PollId },

    #[error("{voter} has not revealed in poll {poll_id}")]
    NotRevealed { voter: String, poll_id: PollId },

    #[error("disclosed vote and salt do not match the commitment in poll {0}")]
    HashMismatch(PollId),

    #[error("insufficient token balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, approved {approved}")]
    InsufficientAllowance { needed: u128, approved: u128 },

    #[error("cannot withdraw {requested} voting rights, only {withdrawable} are unreserved")]
    InsufficientVotingRights { requested: u128, withdrawable: u128 },

    #[error("{amount} tokens for poll {poll_id} do not fit after poll {prev}")]
    InvalidPosition {
        poll_id: PollId,
        prev: PollId,
        amount: u128,
    },

    #[error("poll {0} cannot be its own predecessor")]
    SelfPredecessor(PollId),

    #[error("token ledger refused to move {amount} from {from} to {to}")]
    TokenTransferFailed {
        from: String,
        to: String,
        amount: u128,
    },
}

impl VotingError {
    /// The taxonomy category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ArithmeticOverflow
            | Self::InvalidQuorum(_)
            | Self::BatchTooLarge { .. }
            | Self::Config(_)
            | Self::Snapshot(_) => ErrorKind::Validation,
            Self::PollNotFound(_) | Self::NoCommitment { .. } | Self::PredecessorNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::CommitPeriodNotActive(_)
            | Self::RevealPeriodNotActive(_)
            | Self::PollNotEnded(_)
            | Self::AlreadyRevealed { .. }
            | Self::NotRevealed { .. } => ErrorKind::State,
            Self::HashMismatch(_) => ErrorKind::AuthorizationMismatch,
            Self::InsufficientBalance { .. }
            | Self::InsufficientAllowance { .. }
            | Self::InsufficientVotingRights { .. } => ErrorKind::Conservation,
            Self::InvalidPosition { .. } | Self::SelfPredecessor(_) => ErrorKind::Ordering,
            Self::TokenTransferFailed { .. } => ErrorKind::TokenFailure,
        }
    }
}
