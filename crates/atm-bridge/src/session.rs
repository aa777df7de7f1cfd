//! Session state: wallet, connected account, and bound contract.
//!
//! The contract handle lives inside [`Connection`], so a bound contract
//! without a connected account cannot be represented.

use std::sync::Arc;

use alloy_primitives::Address;
use atm_core::traits::WalletProvider;

use crate::contract::ContractHandle;

/// A connected account and the contract bound to it.
#[derive(Debug, Clone)]
pub struct Connection {
    pub account: Address,
    pub contract: ContractHandle,
}

/// Wallet / account / contract state for one page session.
#[derive(Default)]
pub struct Session {
    wallet: Option<Arc<dyn WalletProvider>>,
    connection: Option<Connection>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wallet(&self) -> Option<&Arc<dyn WalletProvider>> {
        self.wallet.as_ref()
    }

    pub fn set_wallet(&mut self, wallet: Arc<dyn WalletProvider>) {
        self.wallet = Some(wallet);
    }

    pub fn account(&self) -> Option<Address> {
        self.connection.as_ref().map(|c| c.account)
    }

    pub fn contract(&self) -> Option<&ContractHandle> {
        self.connection.as_ref().map(|c| &c.contract)
    }

    /// Record the connected account together with its contract binding.
    pub fn bind(&mut self, account: Address, contract: ContractHandle) {
        self.connection = Some(Connection { account, contract });
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }
}
