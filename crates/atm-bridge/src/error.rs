//! Bridge error types.

use alloy_primitives::B256;
use atm_core::abi;
use atm_core::constants::EXECUTION_REVERTED_CODE;
use atm_core::error::{AbiError, ProviderError};
use thiserror::Error;

/// Errors surfaced by bridge operations.
///
/// Expected absences (no wallet, no account, no contract) are not errors:
/// they become prompts, alerts, or no-ops. Everything here is a failure the
/// caller has to see.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The wallet or node rejected a request.
    #[error(transparent)]
    Provider(ProviderError),

    /// The contract reverted the call.
    #[error("execution reverted: {reason}")]
    Reverted {
        /// Decoded revert reason, or the node's message when undecodable.
        reason: String,
    },

    /// The transaction was mined but its receipt reports failure.
    #[error("transaction {hash} failed")]
    TransactionFailed {
        /// Hash of the failed transaction.
        hash: B256,
    },

    /// Contract data could not be encoded or decoded.
    #[error(transparent)]
    Abi(#[from] AbiError),

    /// The amount input is not a non-negative integer.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// An address string could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid configuration value.
    #[error("config: {0}")]
    Config(String),
}

impl From<ProviderError> for BridgeError {
    fn from(err: ProviderError) -> Self {
        // Only execution errors carry revert data; other codes keep their
        // data opaque even when it happens to decode.
        let reason = match &err {
            ProviderError::Rpc { code, message, data }
                if *code == EXECUTION_REVERTED_CODE
                    || message.to_ascii_lowercase().contains("revert") =>
            {
                let decoded = data
                    .as_deref()
                    .and_then(|hex| abi::parse_hex(hex).ok())
                    .and_then(|bytes| abi::decode_revert(&bytes))
                    .filter(|reason| !reason.is_empty());
                Some(decoded.unwrap_or_else(|| message.clone()))
            }
            _ => None,
        };
        match reason {
            Some(reason) => Self::Reverted { reason },
            None => Self::Provider(err),
        }
    }
}
