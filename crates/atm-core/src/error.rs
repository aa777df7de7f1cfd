//! Error types shared by providers and the contract interface.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("rpc error {code}: {message}")] Rpc { code: i64, message: String, data: Option<String> },
    #[error("transport: {0}")] Transport(String),
    #[error("wallet provider unavailable")] Unavailable,
    #[error("decode: {0}")] Decode(String),
}

impl ProviderError {
    /// Hex revert data attached to an `execution reverted` error, if any.
    pub fn revert_data(&self) -> Option<&str> {
        match self {
            Self::Rpc { data: Some(data), .. } => Some(data.as_str()),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("invalid return data for {function}: {reason}")] InvalidReturn { function: &'static str, reason: String },
    #[error("invalid calldata: {0}")] InvalidCalldata(String),
    #[error("invalid hex: {0}")] InvalidHex(String),
}
