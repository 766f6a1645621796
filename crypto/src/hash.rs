//! Blake2b hashing for vote commitments and attribute keys.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use slcr_types::{AttributeKey, CommitHash, PollId, VoteOption, WalletAddress};

type Blake2b256 = Blake2b<U32>;

const VOTE_DOMAIN: &[u8] = b"slcr/vote";
const ATTR_DOMAIN: &[u8] = b"slcr/attr";
const INSTANCE_DOMAIN: &[u8] = b"slcr/instance";

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// The commitment a voter submits during the commit window.
///
/// The salt is encoded big-endian at full width so that every
/// `(option, salt)` pair has exactly one pre-image.
pub fn commit_hash(vote: VoteOption, salt: u128) -> CommitHash {
    CommitHash::new(blake2b_256_multi(&[
        VOTE_DOMAIN,
        &[vote.as_u8()],
        &salt.to_be_bytes(),
    ]))
}

/// Deterministic fingerprint of `(account, poll_id)`.
pub fn attr_uuid(account: &WalletAddress, poll_id: PollId) -> AttributeKey {
    attr_uuid_tagged(account, poll_id, "")
}

/// Deterministic fingerprint of `(account, poll_id, tag)`.
///
/// The account is length-prefixed so distinct `(account, poll_id)` pairs can
/// never collide by concatenation.
pub fn attr_uuid_tagged(account: &WalletAddress, poll_id: PollId, tag: &str) -> AttributeKey {
    let account_bytes = account.as_bytes();
    let account_len = (account_bytes.len() as u64).to_be_bytes();
    AttributeKey::new(blake2b_256_multi(&[
        ATTR_DOMAIN,
        &account_len,
        account_bytes,
        &poll_id.to_be_bytes(),
        tag.as_bytes(),
    ]))
}

/// Custody address for the `index`-th instance spawned by `factory`.
pub fn derive_instance_address(factory: &WalletAddress, index: u64) -> WalletAddress {
    let digest = blake2b_256_multi(&[INSTANCE_DOMAIN, factory.as_bytes(), &index.to_be_bytes()]);
    WalletAddress::new(format!("slcr_{}", hex::encode(&digest[..20])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_deterministic() {
        let h1 = blake2b_256(b"hello slcr");
        let h2 = blake2b_256(b"hello slcr");
        assert_eq!(h1, h2);
    }

    #[test]
    fn blake2b_multi_equivalent() {
        let single = blake2b_256(b"helloworld");
        let multi = blake2b_256_multi(&[b"hello", b"world"]);
        assert_eq!(single, multi);
    }

    #[test]
    fn commit_hash_binds_option_and_salt() {
        let base = commit_hash(VoteOption::For, 420);
        assert_eq!(base, commit_hash(VoteOption::For, 420));
        assert_ne!(base, commit_hash(VoteOption::Against, 420));
        assert_ne!(base, commit_hash(VoteOption::For, 421));
        assert!(!base.is_zero());
    }

    #[test]
    fn attr_uuid_deterministic() {
        let alice = WalletAddress::new("alice");
        assert_eq!(attr_uuid(&alice, 420), attr_uuid(&alice, 420));
    }

    #[test]
    fn attr_uuid_diverges_on_divergent_values() {
        let alice = WalletAddress::new("alice");
        let bob = WalletAddress::new("bob");
        assert_ne!(attr_uuid(&alice, 420), attr_uuid(&alice, 421));
        assert_ne!(attr_uuid(&alice, 420), attr_uuid(&bob, 420));
        assert_ne!(attr_uuid(&alice, 420), attr_uuid_tagged(&alice, 420, "numTokens"));
    }

    #[test]
    fn attr_uuid_length_prefix_prevents_shifting() {
        // "a" + poll 0x61.. vs "aa" + poll 0x..: the length prefix keeps them apart.
        let a = WalletAddress::new("a");
        let aa = WalletAddress::new("aa");
        assert_ne!(attr_uuid(&a, 0x6100_0000_0000_0000), attr_uuid(&aa, 0));
    }

    #[test]
    fn instance_addresses_are_distinct_and_valid() {
        let factory = WalletAddress::new("factory");
        let first = derive_instance_address(&factory, 0);
        let second = derive_instance_address(&factory, 1);
        assert_ne!(first, second);
        assert!(first.is_valid());
        assert!(first.as_str().starts_with("slcr_"));
        assert_eq!(first.as_str().len(), "slcr_".len() + 40);
    }

    #[test]
    fn instance_address_is_lowercase_hex_of_digest_prefix() {
        let factory = WalletAddress::new("factory");
        let digest = blake2b_256_multi(&[INSTANCE_DOMAIN, factory.as_bytes(), &7u64.to_be_bytes()]);
        let address = derive_instance_address(&factory, 7);
        assert_eq!(address.as_str(), format!("slcr_{}", hex::encode(&digest[..20])));
        assert!(address.as_str()[5..]
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
