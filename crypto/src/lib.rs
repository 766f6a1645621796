//! Cryptographic primitives for SLCR voting.
//!
//! - **Blake2b-256** for every hash in the system
//! - Vote commitments over `(option, salt)`
//! - Attribute fingerprints over `(account, poll_id[, tag])`
//! - Custody address derivation for spawned voting instances

pub mod hash;

pub use hash::{
    attr_uuid, attr_uuid_tagged, blake2b_256, blake2b_256_multi, commit_hash,
    derive_instance_address,
};
