//! Spawns independent voting engines that share a token and configuration.

use crate::config::VotingConfig;
use crate::engine::VotingEngine;
use crate::error::VotingError;
use slcr_crypto::derive_instance_address;
use slcr_token::TokenLedger;
use slcr_types::WalletAddress;
use std::sync::Arc;

/// Builds fresh [`VotingEngine`]s.
///
/// Every instance gets its own empty state and its own custody address
/// derived from the factory address and a spawn counter, so no two
/// instances ever observe each other's polls or balances.
pub struct VotingFactory {
    address: WalletAddress,
    token: Arc<dyn TokenLedger>,
    config: VotingConfig,
    instances_created: u64,
}

impl VotingFactory {
    pub fn new(address: WalletAddress, token: Arc<dyn TokenLedger>, config: VotingConfig) -> Self {
        Self {
            address,
            token,
            config,
            instances_created: 0,
        }
    }

    pub fn address(&self) -> &WalletAddress {
        &self.address
    }

    pub fn instances_created(&self) -> u64 {
        self.instances_created
    }

    /// Spawn an engine backed by the factory's token.
    pub fn new_instance(&mut self) -> Result<VotingEngine, VotingError> {
        let token = Arc::clone(&self.token);
        self.new_instance_with_token(token)
    }

    /// Spawn an engine backed by a different token ledger.
    pub fn new_instance_with_token(
        &mut self,
        token: Arc<dyn TokenLedger>,
    ) -> Result<VotingEngine, VotingError> {
        let index = self
            .instances_created
            .checked_add(1)
            .ok_or(VotingError::ArithmeticOverflow)?;
        let address = derive_instance_address(&self.address, index);
        self.instances_created = index;
        tracing::info!(instance = %address, index, "voting instance spawned");
        Ok(VotingEngine::new(address, token, self.config.clone()))
    }
}
