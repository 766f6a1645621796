use proptest::prelude::*;

use slcr_types::{CommitHash, PollParams, Timestamp, VoteOption, WalletAddress};

proptest! {
    /// Checked addition agrees with u64 arithmetic and never wraps.
    #[test]
    fn timestamp_checked_add_matches_u64(base in 0u64..u64::MAX, secs in 0u64..u64::MAX) {
        let expected = base.checked_add(secs);
        let actual = Timestamp::new(base).checked_add_secs(secs).map(|t| t.as_secs());
        prop_assert_eq!(actual, expected);
    }

    /// CommitHash::is_zero is true only for all-zero bytes.
    #[test]
    fn commit_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = CommitHash::new(bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// Quorum validity is exactly the 0..=100 range.
    #[test]
    fn quorum_validity(q in 0u8..=u8::MAX) {
        let params = PollParams::new(q, 100, 100);
        prop_assert_eq!(params.quorum_is_valid(), q <= 100);
    }

    /// Addresses survive a bincode round trip (they are map keys in snapshots).
    #[test]
    fn address_bincode_stable(raw in "[a-z0-9_]{1,40}") {
        let addr = WalletAddress::new(raw.clone());
        let encoded = bincode::serialize(&addr).unwrap();
        let decoded: WalletAddress = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded.as_str(), raw.as_str());
        prop_assert!(decoded.is_valid());
    }
}

#[test]
fn vote_option_bytes() {
    assert_eq!(VoteOption::For.as_u8(), 1);
    assert_eq!(VoteOption::Against.as_u8(), 0);
    assert_eq!(VoteOption::from(true), VoteOption::For);
    assert_eq!(VoteOption::from(false), VoteOption::Against);
}

#[test]
fn empty_address_is_invalid() {
    assert!(!WalletAddress::new("").is_valid());
    assert!(!WalletAddress::new("alice bob").is_valid());
    assert!(WalletAddress::new("alice").is_valid());
}
