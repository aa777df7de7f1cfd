//! Trait interfaces for the ATM bridge.
//!
//! - [`WalletProvider`] — EIP-1193 request channel to a wallet
//!   (atm-bridge implements it over HTTP JSON-RPC and in memory)

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProviderError;

/// A wallet that answers EIP-1193 `request({ method, params })` calls.
///
/// The wallet owns the accounts and signs on their behalf: a transaction is
/// submitted with `eth_sendTransaction` and a `from` field naming one of the
/// authorized accounts.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Issue one request. `params` is a JSON array (possibly empty).
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// Short label for logs.
    fn name(&self) -> &str {
        "wallet"
    }
}
