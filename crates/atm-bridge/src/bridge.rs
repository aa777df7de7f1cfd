//! The composed wallet-contract bridge.
//!
//! [`Bridge`] owns the session, the last known balance, the transaction log,
//! and the page state. Operations are driven one at a time by the front end.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use atm_core::constants::WALLET_REQUIRED_ALERT;
use atm_core::traits::WalletProvider;
use atm_core::types::{Theme, TransactionRecord, TxKind};
use tracing::{debug, info, warn};

use crate::config::BridgeConfig;
use crate::contract::ContractHandle;
use crate::error::BridgeError;
use crate::history::TransactionLog;
use crate::rpc;
use crate::session::Session;
use crate::ui::UiState;

pub struct Bridge {
    config: BridgeConfig,
    session: Session,
    /// `None` until the first successful read.
    balance: Option<U256>,
    log: TransactionLog,
    ui: UiState,
}

impl Bridge {
    pub fn new(config: BridgeConfig) -> Self {
        let ui = UiState::new(config.default_amount);
        Self {
            config,
            session: Session::new(),
            balance: None,
            log: TransactionLog::new(),
            ui,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn balance(&self) -> Option<U256> {
        self.balance
    }

    pub fn history(&self) -> &TransactionLog {
        &self.log
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut UiState {
        &mut self.ui
    }

    /// Adopt an injected wallet, if there is one.
    ///
    /// Without a wallet nothing happens; the page shows the install prompt.
    /// With one, accounts the wallet already authorized are picked up
    /// silently and the contract is bound to the first of them.
    pub async fn discover_wallet(&mut self, injected: Option<Arc<dyn WalletProvider>>) -> bool {
        let Some(wallet) = injected else {
            info!("no wallet provider found");
            return false;
        };
        info!(wallet = wallet.name(), "wallet provider found");
        self.session.set_wallet(wallet.clone());

        match rpc::accounts(&*wallet).await {
            Ok(accounts) => {
                self.adopt(wallet, &accounts);
            }
            Err(e) => warn!(error = %e, "eth_accounts failed"),
        }
        true
    }

    /// Ask the wallet to authorize an account and bind the contract to it.
    ///
    /// Returns `Ok(false)` without a wallet (an alert is queued instead) or
    /// when the wallet returns no accounts. A rejected request is an error.
    pub async fn connect(&mut self) -> Result<bool, BridgeError> {
        let Some(wallet) = self.session.wallet().cloned() else {
            self.ui.alert(WALLET_REQUIRED_ALERT);
            return Ok(false);
        };
        let accounts = rpc::request_accounts(&*wallet).await?;
        Ok(self.adopt(wallet, &accounts))
    }

    fn adopt(&mut self, wallet: Arc<dyn WalletProvider>, accounts: &[Address]) -> bool {
        let Some(&account) = accounts.first() else {
            info!("No account found");
            return false;
        };
        info!(%account, "Account connected");
        if self.session.account() != Some(account) {
            self.balance = None;
        }
        let contract = ContractHandle::new(
            self.config.contract_address,
            account,
            wallet,
            self.config.confirmation_poll,
        );
        self.session.bind(account, contract);
        true
    }

    /// Read `getBalance()`. No-op without a bound contract.
    pub async fn read_balance(&mut self) -> Result<Option<U256>, BridgeError> {
        let Some(contract) = self.session.contract().cloned() else {
            return Ok(None);
        };
        let balance = contract.get_balance().await?;
        debug!(%balance, "balance refreshed");
        self.balance = Some(balance);
        Ok(Some(balance))
    }

    /// Read the balance if connected and never read yet.
    pub async fn refresh_if_stale(&mut self) -> Result<(), BridgeError> {
        if self.balance.is_none() && self.session.is_connected() {
            self.read_balance().await?;
        }
        Ok(())
    }

    pub async fn deposit(&mut self, amount: U256) -> Result<Option<TransactionRecord>, BridgeError> {
        self.transact(TxKind::Deposit, amount).await
    }

    pub async fn withdraw(&mut self, amount: U256) -> Result<Option<TransactionRecord>, BridgeError> {
        self.transact(TxKind::Withdraw, amount).await
    }

    /// Run `kind` with the amount currently in the amount input.
    pub async fn submit_input(&mut self, kind: TxKind) -> Result<Option<TransactionRecord>, BridgeError> {
        if !self.session.is_connected() {
            return Ok(None);
        }
        let amount = self.ui.amount()?;
        self.transact(kind, amount).await
    }

    /// Send, wait for confirmation, log, refresh.
    ///
    /// The record is appended as soon as the receipt confirms, so a failing
    /// balance refresh afterwards does not lose it.
    async fn transact(
        &mut self,
        kind: TxKind,
        amount: U256,
    ) -> Result<Option<TransactionRecord>, BridgeError> {
        let Some(contract) = self.session.contract().cloned() else {
            debug!(op = kind.function_name(), "no contract bound");
            return Ok(None);
        };
        let hash = contract.submit(kind, amount).await?;
        contract.wait(hash).await?;

        let record = TransactionRecord::new(kind, amount, hash);
        self.log.append(record.clone());
        info!(op = kind.function_name(), %amount, %hash, "transaction confirmed");

        self.read_balance().await?;
        Ok(Some(record))
    }

    /// Check `password` against the history literal.
    pub fn gate_history(&mut self, password: &str) -> bool {
        self.ui.set_password(password);
        self.ui.submit_password()
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.ui.toggle_theme()
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        self.ui.take_alerts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devnet::{DevChain, DevChainOptions};
    use std::time::Duration;

    fn fast_config() -> BridgeConfig {
        BridgeConfig {
            confirmation_poll: Duration::from_millis(1),
            ..BridgeConfig::default()
        }
    }

    async fn connected(options: DevChainOptions) -> (Bridge, Arc<DevChain>) {
        let chain = Arc::new(DevChain::new(options));
        let mut bridge = Bridge::new(fast_config());
        assert!(bridge.discover_wallet(Some(chain.clone())).await);
        assert!(bridge.connect().await.unwrap());
        (bridge, chain)
    }

    #[tokio::test]
    async fn connect_without_wallet_alerts() {
        let mut bridge = Bridge::new(fast_config());
        assert!(!bridge.discover_wallet(None).await);
        assert!(!bridge.connect().await.unwrap());
        assert_eq!(bridge.take_alerts(), vec![WALLET_REQUIRED_ALERT]);
        assert!(bridge.session().account().is_none());
    }

    #[tokio::test]
    async fn discovery_does_not_prompt() {
        let chain = Arc::new(DevChain::new(DevChainOptions::default()));
        let mut bridge = Bridge::new(fast_config());
        assert!(bridge.discover_wallet(Some(chain)).await);
        assert!(bridge.session().wallet().is_some());
        assert!(bridge.session().account().is_none());
        assert!(bridge.session().contract().is_none());
    }

    #[tokio::test]
    async fn discovery_adopts_authorized_account() {
        let chain = Arc::new(DevChain::new(DevChainOptions {
            authorized: true,
            ..DevChainOptions::default()
        }));
        let mut bridge = Bridge::new(fast_config());
        bridge.discover_wallet(Some(chain.clone())).await;
        assert_eq!(bridge.session().account(), Some(chain.owner()));
        assert!(bridge.session().contract().is_some());
    }

    #[tokio::test]
    async fn connect_binds_contract_to_account() {
        let (bridge, chain) = connected(DevChainOptions::default()).await;
        let contract = bridge.session().contract().unwrap();
        assert_eq!(contract.signer(), chain.owner());
        assert_eq!(contract.address(), bridge.config().contract_address);
    }

    #[tokio::test]
    async fn rejected_connect_propagates() {
        let chain = Arc::new(DevChain::new(DevChainOptions {
            reject_connect: true,
            ..DevChainOptions::default()
        }));
        let mut bridge = Bridge::new(fast_config());
        bridge.discover_wallet(Some(chain)).await;
        let err = bridge.connect().await.unwrap_err();
        assert!(matches!(err, BridgeError::Provider(_)));
        assert!(bridge.session().contract().is_none());
    }

    #[tokio::test]
    async fn balance_stale_until_read() {
        let (mut bridge, _chain) = connected(DevChainOptions::default()).await;
        assert_eq!(bridge.balance(), None);
        bridge.refresh_if_stale().await.unwrap();
        assert_eq!(bridge.balance(), Some(U256::from(1)));
    }

    #[tokio::test]
    async fn read_balance_without_contract_is_noop() {
        let mut bridge = Bridge::new(fast_config());
        assert_eq!(bridge.read_balance().await.unwrap(), None);
        assert_eq!(bridge.balance(), None);
    }

    #[tokio::test]
    async fn deposit_appends_one_record_and_refreshes() {
        let (mut bridge, chain) = connected(DevChainOptions {
            confirmation_delay: 2,
            ..DevChainOptions::default()
        })
        .await;
        let record = bridge.deposit(U256::from(10)).await.unwrap().unwrap();
        assert_eq!(record.kind, TxKind::Deposit);
        assert_eq!(record.amount, U256::from(10));
        assert_eq!(bridge.history().len(), 1);
        assert_eq!(bridge.history().last(), Some(&record));
        assert_eq!(bridge.balance(), Some(U256::from(11)));
        assert_eq!(chain.balance(), U256::from(11));
    }

    #[tokio::test]
    async fn failed_withdraw_changes_nothing() {
        let (mut bridge, chain) = connected(DevChainOptions::default()).await;
        bridge.read_balance().await.unwrap();
        let err = bridge.withdraw(U256::from(10)).await.unwrap_err();
        assert!(matches!(err, BridgeError::Reverted { .. }));
        assert!(bridge.history().is_empty());
        assert_eq!(bridge.balance(), Some(U256::from(1)));
        assert_eq!(chain.transaction_count(), 0);
    }

    #[tokio::test]
    async fn operations_without_contract_are_noops() {
        let mut bridge = Bridge::new(fast_config());
        assert!(bridge.deposit(U256::from(1)).await.unwrap().is_none());
        assert!(bridge.withdraw(U256::from(1)).await.unwrap().is_none());
        assert!(bridge.submit_input(TxKind::Deposit).await.unwrap().is_none());
        assert!(bridge.history().is_empty());
    }

    #[tokio::test]
    async fn submit_input_uses_amount_field() {
        let (mut bridge, _chain) = connected(DevChainOptions::default()).await;
        bridge.ui_mut().set_amount("4");
        let record = bridge.submit_input(TxKind::Deposit).await.unwrap().unwrap();
        assert_eq!(record.amount, U256::from(4));

        bridge.ui_mut().set_amount("four");
        let err = bridge.submit_input(TxKind::Withdraw).await.unwrap_err();
        assert_eq!(err, BridgeError::InvalidAmount("four".into()));
        assert_eq!(bridge.history().len(), 1);
    }

    #[tokio::test]
    async fn gate_history_checks_literal() {
        let mut bridge = Bridge::new(fast_config());
        assert!(!bridge.gate_history("0000"));
        assert!(!bridge.ui().history_visible());
        assert_eq!(bridge.take_alerts().len(), 1);
        assert!(bridge.gate_history("1234"));
        assert!(bridge.ui().history_visible());
    }
}
