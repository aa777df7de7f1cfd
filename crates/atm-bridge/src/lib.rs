//! # atm-bridge — Wallet-contract bridge for the Assessment ATM.
//!
//! Discovers a wallet, connects an account, binds the contract at its fixed
//! address, and drives deposits, withdrawals, and balance reads. Keeps the
//! page state (amount input, history gate, theme) and a client-side log of
//! confirmed transactions.
//!
//! # Modules
//!
//! - [`error`] — `BridgeError` enum
//! - [`config`] — `BridgeConfig` defaults and environment overrides
//! - [`rpc`] — typed EIP-1193 requests over any `WalletProvider`
//! - [`http`] — JSON-RPC wallet over HTTP and provider discovery
//! - [`contract`] — contract handle bound to an account
//! - [`session`] — wallet / account / contract session state
//! - [`history`] — append-only transaction log
//! - [`ui`] — page inputs, alerts, history gate, theme
//! - [`bridge`] — the composed bridge
//! - [`view`] — text rendering of the page
//! - `devnet` — in-process chain emulating the contract (feature `devnet`)

pub mod bridge;
pub mod config;
pub mod contract;
#[cfg(any(test, feature = "devnet"))]
pub mod devnet;
pub mod error;
pub mod history;
pub mod http;
pub mod rpc;
pub mod session;
pub mod ui;
pub mod view;

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use contract::ContractHandle;
#[cfg(any(test, feature = "devnet"))]
pub use devnet::{DevChain, DevChainOptions};
pub use error::BridgeError;
pub use history::TransactionLog;
pub use http::HttpWallet;
pub use session::Session;
pub use ui::UiState;
