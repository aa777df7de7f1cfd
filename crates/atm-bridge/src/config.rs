//! Bridge configuration.
//!
//! Provides [`BridgeConfig`] with defaults pointing at a local development
//! node, and [`BridgeConfig::from_env`] for `ATM_*` environment overrides.

use std::time::Duration;

use alloy_primitives::{Address, U256};
use atm_core::constants::{
    CONTRACT_ADDRESS, DEFAULT_AMOUNT, DEFAULT_POLL_INTERVAL_MS, DEFAULT_RPC_ENDPOINT,
};

use crate::error::BridgeError;

/// Configuration for a bridge instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// JSON-RPC endpoint of the wallet provider.
    pub rpc_endpoint: String,
    /// Address of the deployed Assessment contract.
    pub contract_address: Address,
    /// Delay between receipt polls while awaiting confirmation.
    pub confirmation_poll: Duration,
    /// Initial value of the amount input.
    pub default_amount: U256,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            rpc_endpoint: DEFAULT_RPC_ENDPOINT.to_string(),
            contract_address: CONTRACT_ADDRESS,
            confirmation_poll: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            default_amount: U256::from(DEFAULT_AMOUNT),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from `ATM_*` environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, BridgeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BridgeError> {
        let mut cfg = Self::default();

        if let Some(endpoint) = lookup("ATM_RPC_ENDPOINT") {
            cfg.rpc_endpoint = endpoint;
        }

        if let Some(addr) = lookup("ATM_CONTRACT_ADDRESS") {
            cfg.contract_address = addr
                .trim()
                .parse()
                .map_err(|_| BridgeError::InvalidAddress(addr.clone()))?;
        }

        if let Some(ms) = lookup("ATM_POLL_INTERVAL_MS") {
            let ms: u64 = ms.trim().parse().map_err(|_| {
                BridgeError::Config(format!("ATM_POLL_INTERVAL_MS must be an integer, got {ms:?}"))
            })?;
            cfg.confirmation_poll = Duration::from_millis(ms);
        }

        if let Some(amount) = lookup("ATM_DEFAULT_AMOUNT") {
            cfg.default_amount = U256::from_str_radix(amount.trim(), 10).map_err(|_| {
                BridgeError::Config(format!("ATM_DEFAULT_AMOUNT must be an integer, got {amount:?}"))
            })?;
        }

        Ok(cfg)
    }
}
