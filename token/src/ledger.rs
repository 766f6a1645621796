//! The token ledger collaborator interface.

use slcr_types::WalletAddress;

/// Standard fungible-token semantics.
///
/// Mutating calls return `false` when the ledger refuses the operation; a
/// refusal must leave the ledger unchanged. Callers have no caller identity
/// implicit in the call, so the acting account is always passed explicitly.
pub trait TokenLedger: Send + Sync {
    /// Balance held by `owner`.
    fn balance_of(&self, owner: &WalletAddress) -> u128;

    /// Amount `spender` may still move out of `owner`'s balance.
    fn allowance(&self, owner: &WalletAddress, spender: &WalletAddress) -> u128;

    /// Move `amount` from `from` to `to`, acting as `from`.
    fn transfer(&self, from: &WalletAddress, to: &WalletAddress, amount: u128) -> bool;

    /// Move `amount` from `from` to `to`, acting as `spender` under `from`'s allowance.
    fn transfer_from(
        &self,
        spender: &WalletAddress,
        from: &WalletAddress,
        to: &WalletAddress,
        amount: u128,
    ) -> bool;

    /// Set `spender`'s allowance over `owner`'s balance to `amount`.
    fn approve(&self, owner: &WalletAddress, spender: &WalletAddress, amount: u128) -> bool;
}
