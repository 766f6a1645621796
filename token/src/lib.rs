//! Fungible token ledger used as the voting system's custody backend.
//!
//! The voting engine never touches balances directly: it asks a
//! [`TokenLedger`] to move tokens into and out of its custody account and
//! treats a `false` return as an aborted operation.
//!
//! [`MemoryToken`] is a complete in-memory ledger with standard
//! balance / transfer / allowance semantics.

pub mod error;
pub mod ledger;
pub mod memory;

pub use error::TokenError;
pub use ledger::TokenLedger;
pub use memory::MemoryToken;
