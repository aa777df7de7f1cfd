//! In-process development chain.
//!
//! Answers the EIP-1193 methods the bridge uses and emulates the Assessment
//! contract at [`CONTRACT_ADDRESS`]: one owner account, a balance that
//! deposits add to and withdrawals subtract from, and an
//! `InsufficientBalance` revert on overdraw. Every accepted transaction is
//! mined at once into its own block.

use std::collections::HashMap;

use alloy_primitives::{Address, B256, U64, U256, address, hex, keccak256};
use alloy_sol_types::{SolError, SolValue};
use async_trait::async_trait;
use atm_core::abi::{self, IAssessmentCalls};
use atm_core::constants::{CONTRACT_ADDRESS, EXECUTION_REVERTED_CODE, USER_REJECTED_CODE};
use atm_core::error::ProviderError;
use atm_core::traits::WalletProvider;
use atm_core::types::TxKind;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::rpc::{Log, TransactionReceipt, TransactionRequest};

/// Chain id reported by `eth_chainId` (the Hardhat default).
pub const DEVNET_CHAIN_ID: u64 = 31337;

/// First default development account; deploys and owns the contract.
pub const DEVNET_OWNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const UNAUTHORIZED: i64 = 4100;

/// Behavior knobs for a [`DevChain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevChainOptions {
    /// Owner account already authorized, so `eth_accounts` returns it.
    pub authorized: bool,
    /// `eth_requestAccounts` fails as if the user dismissed the prompt.
    pub reject_connect: bool,
    /// Contract balance at deployment.
    pub initial_balance: U256,
    /// Receipt polls answered with `null` before a receipt becomes visible.
    pub confirmation_delay: u32,
}

impl Default for DevChainOptions {
    fn default() -> Self {
        Self {
            authorized: false,
            reject_connect: false,
            initial_balance: U256::from(1),
            confirmation_delay: 0,
        }
    }
}

struct MinedTx {
    receipt: TransactionReceipt,
    polls_left: u32,
}

struct ChainState {
    authorized: bool,
    balance: U256,
    nonce: u64,
    block_number: u64,
    mined: HashMap<B256, MinedTx>,
}

/// Development chain answering wallet requests in memory.
pub struct DevChain {
    options: DevChainOptions,
    state: Mutex<ChainState>,
}

fn rpc_error(code: i64, message: impl Into<String>) -> ProviderError {
    ProviderError::Rpc {
        code,
        message: message.into(),
        data: None,
    }
}

fn reverted(data: &[u8]) -> ProviderError {
    ProviderError::Rpc {
        code: EXECUTION_REVERTED_CODE,
        message: "execution reverted".into(),
        data: Some(hex::encode_prefixed(data)),
    }
}

fn param<T: DeserializeOwned>(params: &Value, index: usize) -> Result<T, ProviderError> {
    let value = params
        .get(index)
        .cloned()
        .ok_or_else(|| rpc_error(INVALID_PARAMS, format!("missing param {index}")))?;
    serde_json::from_value(value).map_err(|e| rpc_error(INVALID_PARAMS, e.to_string()))
}

impl DevChain {
    pub fn new(options: DevChainOptions) -> Self {
        let state = ChainState {
            authorized: options.authorized,
            balance: options.initial_balance,
            nonce: 0,
            block_number: 1,
            mined: HashMap::new(),
        };
        Self {
            options,
            state: Mutex::new(state),
        }
    }

    pub fn owner(&self) -> Address {
        DEVNET_OWNER
    }

    /// Contract balance as stored on chain.
    pub fn balance(&self) -> U256 {
        self.state.lock().balance
    }

    /// Number of mined transactions.
    pub fn transaction_count(&self) -> u64 {
        self.state.lock().nonce
    }

    fn accounts(&self, state: &ChainState) -> Value {
        if state.authorized {
            json!([DEVNET_OWNER])
        } else {
            json!([])
        }
    }

    /// Run `call` against `balance`. Returns the new balance and the event
    /// emitted, or the revert data.
    fn execute(
        balance: U256,
        call: &IAssessmentCalls,
    ) -> Result<(U256, Option<(TxKind, U256)>), Vec<u8>> {
        match call {
            IAssessmentCalls::getBalance(_) => Ok((balance, None)),
            IAssessmentCalls::deposit(c) => {
                let next = balance.checked_add(c.amount).ok_or_else(|| {
                    alloy_sol_types::Panic { code: U256::from(0x11) }.abi_encode()
                })?;
                Ok((next, Some((TxKind::Deposit, c.amount))))
            }
            IAssessmentCalls::withdraw(c) => {
                if balance < c.amount {
                    return Err(abi::encode_insufficient_balance(balance, c.amount).to_vec());
                }
                Ok((balance - c.amount, Some((TxKind::Withdraw, c.amount))))
            }
        }
    }

    fn eth_call(&self, state: &ChainState, params: &Value) -> Result<Value, ProviderError> {
        let request: TransactionRequest = param(params, 0)?;
        if request.to != Some(CONTRACT_ADDRESS) {
            return Ok(json!("0x"));
        }
        let call = abi::decode_call(&request.data).map_err(|_| reverted(&[]))?;
        match call {
            IAssessmentCalls::getBalance(_) => {
                Ok(json!(hex::encode_prefixed(state.balance.abi_encode())))
            }
            other => Self::execute(state.balance, &other)
                .map(|_| json!("0x"))
                .map_err(|data| reverted(&data)),
        }
    }

    fn send_transaction(
        &self,
        state: &mut ChainState,
        params: &Value,
    ) -> Result<Value, ProviderError> {
        let request: TransactionRequest = param(params, 0)?;
        let from = request
            .from
            .ok_or_else(|| rpc_error(INVALID_PARAMS, "missing from"))?;
        if !state.authorized || from != DEVNET_OWNER {
            return Err(rpc_error(
                UNAUTHORIZED,
                "The requested account has not been authorized by the user.",
            ));
        }
        if request.to != Some(CONTRACT_ADDRESS) {
            return Err(rpc_error(INVALID_PARAMS, "no contract at target address"));
        }

        let call = abi::decode_call(&request.data).map_err(|_| reverted(&[]))?;
        let (balance, event) = Self::execute(state.balance, &call).map_err(|data| reverted(&data))?;

        let mut preimage = from.to_vec();
        preimage.extend_from_slice(&state.nonce.to_be_bytes());
        preimage.extend_from_slice(&request.data);
        let hash = keccak256(&preimage);

        state.balance = balance;
        state.nonce += 1;
        state.block_number += 1;

        let logs = event
            .map(|(kind, amount)| {
                let (topic, data) = abi::encode_event(kind, amount);
                vec![Log {
                    address: CONTRACT_ADDRESS,
                    topics: vec![topic],
                    data,
                }]
            })
            .unwrap_or_default();
        let receipt = TransactionReceipt {
            transaction_hash: hash,
            block_number: Some(U64::from(state.block_number)),
            status: Some(U64::from(1)),
            logs,
        };
        state.mined.insert(
            hash,
            MinedTx {
                receipt,
                polls_left: self.options.confirmation_delay,
            },
        );
        debug!(%hash, block = state.block_number, %balance, "devnet mined transaction");
        Ok(json!(hash))
    }

    fn receipt(&self, state: &mut ChainState, params: &Value) -> Result<Value, ProviderError> {
        let hash: B256 = param(params, 0)?;
        let Some(tx) = state.mined.get_mut(&hash) else {
            return Ok(Value::Null);
        };
        if tx.polls_left > 0 {
            tx.polls_left -= 1;
            return Ok(Value::Null);
        }
        serde_json::to_value(&tx.receipt).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl WalletProvider for DevChain {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let mut state = self.state.lock();
        match method {
            "eth_chainId" => Ok(json!(U64::from(DEVNET_CHAIN_ID))),
            "eth_blockNumber" => Ok(json!(U64::from(state.block_number))),
            "eth_accounts" => Ok(self.accounts(&state)),
            "eth_requestAccounts" => {
                if self.options.reject_connect {
                    return Err(rpc_error(USER_REJECTED_CODE, "User rejected the request."));
                }
                state.authorized = true;
                Ok(self.accounts(&state))
            }
            "eth_call" => self.eth_call(&state, &params),
            "eth_sendTransaction" => self.send_transaction(&mut state, &params),
            "eth_getTransactionReceipt" => self.receipt(&mut state, &params),
            _ => Err(rpc_error(
                METHOD_NOT_FOUND,
                format!("the method {method} does not exist/is not available"),
            )),
        }
    }

    fn name(&self) -> &str {
        "devnet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc;

    fn deposit_request(from: Address, amount: u64) -> TransactionRequest {
        TransactionRequest {
            from: Some(from),
            to: Some(CONTRACT_ADDRESS),
            data: abi::encode_operation(TxKind::Deposit, U256::from(amount)),
            value: None,
        }
    }

    #[tokio::test]
    async fn accounts_hidden_until_authorized() {
        let chain = DevChain::new(DevChainOptions::default());
        assert!(rpc::accounts(&chain).await.unwrap().is_empty());
        assert_eq!(rpc::request_accounts(&chain).await.unwrap(), vec![DEVNET_OWNER]);
        assert_eq!(rpc::accounts(&chain).await.unwrap(), vec![DEVNET_OWNER]);
    }

    #[tokio::test]
    async fn rejected_connect_is_user_rejection() {
        let chain = DevChain::new(DevChainOptions {
            reject_connect: true,
            ..DevChainOptions::default()
        });
        let err = rpc::request_accounts(&chain).await.unwrap_err();
        assert!(matches!(err, ProviderError::Rpc { code: USER_REJECTED_CODE, .. }));
    }

    #[tokio::test]
    async fn chain_id_is_hardhat_default() {
        let chain = DevChain::new(DevChainOptions::default());
        assert_eq!(rpc::chain_id(&chain).await.unwrap(), DEVNET_CHAIN_ID);
    }

    #[tokio::test]
    async fn unauthorized_sender_refused() {
        let chain = DevChain::new(DevChainOptions::default());
        let err = rpc::send_transaction(&chain, &deposit_request(DEVNET_OWNER, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Rpc { code: UNAUTHORIZED, .. }));
        assert_eq!(chain.balance(), U256::from(1));
    }

    #[tokio::test]
    async fn deposit_mines_with_event() {
        let chain = DevChain::new(DevChainOptions {
            authorized: true,
            ..DevChainOptions::default()
        });
        let hash = rpc::send_transaction(&chain, &deposit_request(DEVNET_OWNER, 9))
            .await
            .unwrap();
        assert_eq!(chain.balance(), U256::from(10));
        assert_eq!(chain.transaction_count(), 1);

        let receipt = rpc::transaction_receipt(&chain, hash).await.unwrap().unwrap();
        assert!(receipt.succeeded());
        assert_eq!(receipt.logs.len(), 1);
        let log = &receipt.logs[0];
        assert_eq!(
            abi::decode_event(&log.topics[0], &log.data),
            Some((TxKind::Deposit, U256::from(9)))
        );
    }

    #[tokio::test]
    async fn distinct_hashes_for_identical_calls() {
        let chain = DevChain::new(DevChainOptions {
            authorized: true,
            ..DevChainOptions::default()
        });
        let a = rpc::send_transaction(&chain, &deposit_request(DEVNET_OWNER, 1)).await.unwrap();
        let b = rpc::send_transaction(&chain, &deposit_request(DEVNET_OWNER, 1)).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn receipt_delayed_by_confirmation_polls() {
        let chain = DevChain::new(DevChainOptions {
            authorized: true,
            confirmation_delay: 2,
            ..DevChainOptions::default()
        });
        let hash = rpc::send_transaction(&chain, &deposit_request(DEVNET_OWNER, 1)).await.unwrap();
        assert!(rpc::transaction_receipt(&chain, hash).await.unwrap().is_none());
        assert!(rpc::transaction_receipt(&chain, hash).await.unwrap().is_none());
        assert!(rpc::transaction_receipt(&chain, hash).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_receipt_is_null() {
        let chain = DevChain::new(DevChainOptions::default());
        assert!(rpc::transaction_receipt(&chain, B256::repeat_byte(7)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deposit_overflow_panics() {
        let chain = DevChain::new(DevChainOptions {
            authorized: true,
            initial_balance: U256::MAX,
            ..DevChainOptions::default()
        });
        let err = rpc::send_transaction(&chain, &deposit_request(DEVNET_OWNER, 1))
            .await
            .unwrap_err();
        assert!(err.revert_data().is_some());
        assert_eq!(chain.balance(), U256::MAX);
    }

    #[tokio::test]
    async fn unknown_method_not_found() {
        let chain = DevChain::new(DevChainOptions::default());
        let err = chain.request("eth_mining", json!([])).await.unwrap_err();
        assert!(matches!(err, ProviderError::Rpc { code: METHOD_NOT_FOUND, .. }));
    }
}
