//! Bridge constants. Amounts are raw contract units (no decimals).

use alloy_primitives::{Address, address};

/// Address the Assessment contract is deployed at on the local development
/// node (first deployment from the default dev account).
pub const CONTRACT_ADDRESS: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

/// Default JSON-RPC endpoint of the local development node.
pub const DEFAULT_RPC_ENDPOINT: &str = "http://127.0.0.1:8545";

/// Amount pre-filled in the amount input.
pub const DEFAULT_AMOUNT: u64 = 10;

/// Literal that unlocks the transaction history view.
///
/// A fixed client-side comparison. It hides the history from a casual
/// glance and protects nothing.
pub const HISTORY_PASSWORD: &str = "1234";

/// Interval between `eth_getTransactionReceipt` polls, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Page title.
pub const PAGE_TITLE: &str = "Welcome to the Real World";

/// Subtitle under the page title.
pub const PAGE_SUBTITLE: &str = "Chandhan S";

/// Shown when no wallet provider could be discovered.
pub const INSTALL_PROMPT: &str = "Please install Metamask in order to use this ATM.";

/// Shown when a wallet is present but no account is connected.
pub const CONNECT_PROMPT: &str = "Please connect your Metamask wallet";

/// Alert raised by `connect` without a wallet.
pub const WALLET_REQUIRED_ALERT: &str = "MetaMask wallet is required to connect";

/// Alert raised by a wrong history password.
pub const WRONG_PASSWORD_ALERT: &str = "Incorrect password. Please try again.";

/// Shown in the history view when the log is empty.
pub const EMPTY_HISTORY: &str = "No transactions yet.";

/// JSON-RPC error code used by nodes for a reverted execution.
pub const EXECUTION_REVERTED_CODE: i64 = 3;

/// EIP-1193 error code for a request the user rejected.
pub const USER_REJECTED_CODE: i64 = 4001;
