//! JSON-RPC wallet over HTTP and provider discovery.
//!
//! A development node with unlocked accounts (Hardhat, Anvil) answers the
//! same EIP-1193 methods a browser wallet does, so it stands in for the
//! injected provider.

use std::sync::Arc;

use async_trait::async_trait;
use atm_core::error::ProviderError;
use atm_core::traits::WalletProvider;
use jsonrpsee::core::client::{ClientT, Error as ClientError};
use jsonrpsee::core::params::ArrayParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use serde_json::Value;
use tracing::{debug, info};

use crate::rpc;

/// Wallet provider reached through an HTTP JSON-RPC endpoint.
pub struct HttpWallet {
    client: HttpClient,
    endpoint: String,
}

impl HttpWallet {
    pub fn new(endpoint: &str) -> Result<Self, ProviderError> {
        let client = HttpClientBuilder::default()
            .build(endpoint)
            .map_err(|e| ProviderError::Transport(format!("{endpoint}: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_owned(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl WalletProvider for HttpWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let mut array = ArrayParams::new();
        if let Value::Array(values) = params {
            for value in values {
                array
                    .insert(value)
                    .map_err(|e| ProviderError::Decode(e.to_string()))?;
            }
        }
        debug!(endpoint = %self.endpoint, method, "rpc request");
        self.client
            .request::<Value, _>(method, array)
            .await
            .map_err(map_client_error)
    }

    fn name(&self) -> &str {
        &self.endpoint
    }
}

fn map_client_error(err: ClientError) -> ProviderError {
    match err {
        ClientError::Call(obj) => {
            let data = obj
                .data()
                .and_then(|raw| serde_json::from_str::<Value>(raw.get()).ok())
                .and_then(|value| rpc::revert_data(&value));
            ProviderError::Rpc {
                code: i64::from(obj.code()),
                message: obj.message().to_string(),
                data,
            }
        }
        other => ProviderError::Transport(other.to_string()),
    }
}

/// Look for a wallet at `endpoint`.
///
/// Probes with `eth_chainId`. Returns `None` when nothing answers; absence
/// is an expected condition, not an error.
pub async fn detect(endpoint: &str) -> Option<Arc<dyn WalletProvider>> {
    let wallet = match HttpWallet::new(endpoint) {
        Ok(wallet) => wallet,
        Err(e) => {
            debug!(error = %e, "wallet endpoint rejected");
            return None;
        }
    };
    match rpc::chain_id(&wallet).await {
        Ok(chain_id) => {
            info!(endpoint, chain_id, "wallet provider found");
            Some(Arc::new(wallet))
        }
        Err(e) => {
            debug!(endpoint, error = %e, "no wallet provider answering");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpsee::types::ErrorObjectOwned;

    #[test]
    fn invalid_url_is_transport_error() {
        let err = HttpWallet::new("not a url").err().unwrap();
        assert!(matches!(err, ProviderError::Transport(_)));
    }

    #[test]
    fn endpoint_is_kept() {
        let wallet = HttpWallet::new("http://127.0.0.1:8545").unwrap();
        assert_eq!(wallet.endpoint(), "http://127.0.0.1:8545");
        assert_eq!(wallet.name(), "http://127.0.0.1:8545");
    }

    #[test]
    fn call_error_keeps_code_and_revert_data() {
        let obj = ErrorObjectOwned::owned(3, "execution reverted", Some("0xcf479181"));
        let err = map_client_error(ClientError::Call(obj));
        assert_eq!(
            err,
            ProviderError::Rpc {
                code: 3,
                message: "execution reverted".into(),
                data: Some("0xcf479181".into()),
            }
        );
    }

    #[test]
    fn call_error_without_data() {
        let obj = ErrorObjectOwned::owned::<()>(4001, "User rejected the request.", None);
        let err = map_client_error(ClientError::Call(obj));
        assert_eq!(err.revert_data(), None);
    }

    #[tokio::test]
    async fn detect_returns_none_when_nothing_listens() {
        // Grab a free port, then release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        assert!(detect(&format!("http://127.0.0.1:{port}")).await.is_none());
    }
}
