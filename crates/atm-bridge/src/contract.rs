//! Contract handle: the Assessment contract bound to a signing account.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use atm_core::abi;
use atm_core::traits::WalletProvider;
use atm_core::types::TxKind;
use tracing::{debug, info};

use crate::error::BridgeError;
use crate::rpc::{self, TransactionReceipt, TransactionRequest};

/// Typed binding to the deployed contract.
///
/// Calls go through the wallet; the signer is the connected account, so
/// every call and transaction carries `from = signer`.
#[derive(Clone)]
pub struct ContractHandle {
    address: Address,
    signer: Address,
    provider: Arc<dyn WalletProvider>,
    poll_interval: Duration,
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("address", &self.address)
            .field("signer", &self.signer)
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl ContractHandle {
    pub fn new(
        address: Address,
        signer: Address,
        provider: Arc<dyn WalletProvider>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            address,
            signer,
            provider,
            poll_interval,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    fn request(&self, data: alloy_primitives::Bytes) -> TransactionRequest {
        TransactionRequest {
            from: Some(self.signer),
            to: Some(self.address),
            data,
            value: None,
        }
    }

    /// `getBalance()` as a read-only call.
    pub async fn get_balance(&self) -> Result<U256, BridgeError> {
        let out = rpc::call(&*self.provider, &self.request(abi::encode_get_balance())).await?;
        Ok(abi::decode_balance(&out)?)
    }

    /// Submit `deposit(amount)` or `withdraw(amount)`. Returns the
    /// transaction hash without waiting for it to be mined.
    pub async fn submit(&self, kind: TxKind, amount: U256) -> Result<B256, BridgeError> {
        let request = self.request(abi::encode_operation(kind, amount));
        let hash = rpc::send_transaction(&*self.provider, &request).await?;
        info!(op = kind.function_name(), %amount, %hash, "transaction sent");
        Ok(hash)
    }

    /// Poll for the receipt of `hash` until it is mined.
    ///
    /// There is no timeout: a transaction that never confirms keeps the
    /// caller waiting. A receipt reporting failure is an error.
    pub async fn wait(&self, hash: B256) -> Result<TransactionReceipt, BridgeError> {
        loop {
            if let Some(receipt) = rpc::transaction_receipt(&*self.provider, hash).await? {
                if !receipt.succeeded() {
                    return Err(BridgeError::TransactionFailed { hash });
                }
                for log in receipt.logs.iter().filter(|log| log.address == self.address) {
                    if let Some((kind, amount)) =
                        log.topics.first().and_then(|t| abi::decode_event(t, &log.data))
                    {
                        debug!(event = %kind, %amount, "contract event");
                    }
                }
                return Ok(receipt);
            }
            debug!(%hash, "awaiting confirmation");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devnet::{DevChain, DevChainOptions};

    fn handle(chain: &Arc<DevChain>) -> ContractHandle {
        ContractHandle::new(
            atm_core::constants::CONTRACT_ADDRESS,
            chain.owner(),
            chain.clone(),
            Duration::from_millis(1),
        )
    }

    #[tokio::test]
    async fn reads_initial_balance() {
        let chain = Arc::new(DevChain::new(DevChainOptions::default()));
        let contract = handle(&chain);
        assert_eq!(contract.get_balance().await.unwrap(), U256::from(1));
    }

    #[tokio::test]
    async fn submit_then_wait_confirms() {
        let chain = Arc::new(DevChain::new(DevChainOptions {
            confirmation_delay: 3,
            ..DevChainOptions::default()
        }));
        let contract = handle(&chain);
        let hash = contract.submit(TxKind::Deposit, U256::from(10)).await.unwrap();
        let receipt = contract.wait(hash).await.unwrap();
        assert_eq!(receipt.transaction_hash, hash);
        assert_eq!(contract.get_balance().await.unwrap(), U256::from(11));
    }

    #[tokio::test]
    async fn overdraw_reverts_with_reason() {
        let chain = Arc::new(DevChain::new(DevChainOptions::default()));
        let contract = handle(&chain);
        let err = contract.submit(TxKind::Withdraw, U256::from(5)).await.unwrap_err();
        assert_eq!(
            err,
            BridgeError::Reverted {
                reason: "InsufficientBalance(balance: 1, withdrawAmount: 5)".into()
            }
        );
    }

    #[tokio::test]
    async fn debug_hides_provider_internals() {
        let chain = Arc::new(DevChain::new(DevChainOptions::default()));
        let text = format!("{:?}", handle(&chain));
        assert!(text.contains("ContractHandle"));
        assert!(text.contains("devnet"));
    }
}
