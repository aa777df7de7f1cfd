//! Typed EIP-1193 requests.
//!
//! Thin wrappers that build the JSON params for each method the bridge uses
//! and decode the result. They work over any [`WalletProvider`].

use alloy_primitives::{Address, B256, Bytes, U64, U256};
use atm_core::abi;
use atm_core::error::ProviderError;
use atm_core::traits::WalletProvider;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

/// Transaction or call object passed to `eth_sendTransaction` / `eth_call`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransactionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(default)]
    pub data: Bytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
}

/// Event log attached to a receipt.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// The subset of a transaction receipt the bridge reads.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<U64>,
    /// `0x1` success, `0x0` failure. Absent on pre-Byzantium chains.
    #[serde(default)]
    pub status: Option<U64>,
    #[serde(default)]
    pub logs: Vec<Log>,
}

impl TransactionReceipt {
    /// Whether the receipt reports successful execution.
    pub fn succeeded(&self) -> bool {
        self.status.is_none_or(|status| status == U64::from(1))
    }
}

fn decode<T: DeserializeOwned>(method: &str, value: Value) -> Result<T, ProviderError> {
    serde_json::from_value(value).map_err(|e| ProviderError::Decode(format!("{method}: {e}")))
}

fn encode<T: Serialize>(value: &T) -> Result<Value, ProviderError> {
    serde_json::to_value(value).map_err(|e| ProviderError::Decode(e.to_string()))
}

/// `eth_chainId`.
pub async fn chain_id(provider: &dyn WalletProvider) -> Result<u64, ProviderError> {
    let id: U64 = decode("eth_chainId", provider.request("eth_chainId", json!([])).await?)?;
    Ok(id.to())
}

/// `eth_accounts`: accounts already authorized, without prompting.
pub async fn accounts(provider: &dyn WalletProvider) -> Result<Vec<Address>, ProviderError> {
    decode("eth_accounts", provider.request("eth_accounts", json!([])).await?)
}

/// `eth_requestAccounts`: ask the wallet to authorize accounts.
pub async fn request_accounts(provider: &dyn WalletProvider) -> Result<Vec<Address>, ProviderError> {
    decode(
        "eth_requestAccounts",
        provider.request("eth_requestAccounts", json!([])).await?,
    )
}

/// `eth_call` against the latest block. Returns the raw return data.
pub async fn call(
    provider: &dyn WalletProvider,
    request: &TransactionRequest,
) -> Result<Bytes, ProviderError> {
    let params = json!([encode(request)?, "latest"]);
    let out: String = decode("eth_call", provider.request("eth_call", params).await?)?;
    abi::parse_hex(&out).map_err(|e| ProviderError::Decode(e.to_string()))
}

/// `eth_sendTransaction`. The wallet signs with `request.from`.
pub async fn send_transaction(
    provider: &dyn WalletProvider,
    request: &TransactionRequest,
) -> Result<B256, ProviderError> {
    let params = json!([encode(request)?]);
    let hash = decode(
        "eth_sendTransaction",
        provider.request("eth_sendTransaction", params).await?,
    )?;
    debug!(%hash, "transaction submitted");
    Ok(hash)
}

/// `eth_getTransactionReceipt`. `None` while the transaction is pending.
pub async fn transaction_receipt(
    provider: &dyn WalletProvider,
    hash: B256,
) -> Result<Option<TransactionReceipt>, ProviderError> {
    decode(
        "eth_getTransactionReceipt",
        provider
            .request("eth_getTransactionReceipt", json!([hash]))
            .await?,
    )
}

/// Extract hex revert data from the `data` member of a JSON-RPC error.
///
/// Nodes disagree on the shape: some send the hex string directly, others
/// nest it as `{ "data": "0x…" }` or `{ "originalError": { "data": "0x…" } }`.
pub fn revert_data(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.starts_with("0x") => Some(s.clone()),
        Value::Object(map) => map
            .get("data")
            .and_then(revert_data)
            .or_else(|| map.get("originalError").and_then(revert_data)),
        _ => None,
    }
}
