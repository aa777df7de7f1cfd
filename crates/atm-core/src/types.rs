//! Session-level value types: transaction records and the page theme.
//!
//! Amounts and balances are `U256`, the width of the contract's `uint256`.

use std::fmt;

use alloy_primitives::{B256, U256, hex};
use serde::{Deserialize, Serialize};

/// Which contract operation produced a [`TransactionRecord`].
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TxKind {
    Deposit,
    Withdraw,
}

impl TxKind {
    /// Contract function name for this operation.
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => f.write_str("Deposit"),
            Self::Withdraw => f.write_str("Withdraw"),
        }
    }
}

/// A confirmed deposit or withdrawal, as recorded by this client.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransactionRecord {
    pub kind: TxKind,
    pub amount: U256,
    /// Hash returned by the wallet when the transaction was submitted.
    pub hash: B256,
}

impl TransactionRecord {
    pub fn new(kind: TxKind, amount: U256, hash: B256) -> Self {
        Self { kind, amount, hash }
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type: {}, Amount: {}, Hash: {}",
            self.kind,
            self.amount,
            hex::encode_prefixed(self.hash)
        )
    }
}

/// Page color scheme. Exactly two states.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
