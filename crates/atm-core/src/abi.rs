//! Interface descriptor of the Assessment contract and calldata helpers.
//!
//! The bridge only ever talks to the contract through the functions declared
//! here; anything else the contract exposes is invisible to it.

use alloy_primitives::{B256, Bytes, U256, hex};
use alloy_sol_types::{SolCall, SolError, SolEvent, SolInterface, SolValue, sol};

use crate::error::AbiError;
use crate::types::TxKind;

sol! {
    #[sol(all_derives)]
    interface IAssessment {
        event Deposit(uint256 amount);
        event Withdraw(uint256 amount);

        error InsufficientBalance(uint256 balance, uint256 withdrawAmount);

        function getBalance() external view returns (uint256);
        function deposit(uint256 amount) external payable;
        function withdraw(uint256 amount) external;
    }
}

pub use IAssessment::{IAssessmentCalls, IAssessmentErrors};

/// Calldata for `getBalance()`.
pub fn encode_get_balance() -> Bytes {
    IAssessment::getBalanceCall {}.abi_encode().into()
}

/// Calldata for `deposit(amount)` or `withdraw(amount)`.
pub fn encode_operation(kind: TxKind, amount: U256) -> Bytes {
    match kind {
        TxKind::Deposit => IAssessment::depositCall { amount }.abi_encode().into(),
        TxKind::Withdraw => IAssessment::withdrawCall { amount }.abi_encode().into(),
    }
}

/// Decode the return data of `getBalance()`.
pub fn decode_balance(data: &[u8]) -> Result<U256, AbiError> {
    U256::abi_decode(data).map_err(|e| AbiError::InvalidReturn {
        function: "getBalance",
        reason: e.to_string(),
    })
}

/// Decode calldata addressed to the contract.
pub fn decode_call(data: &[u8]) -> Result<IAssessmentCalls, AbiError> {
    IAssessmentCalls::abi_decode(data).map_err(|e| AbiError::InvalidCalldata(e.to_string()))
}

/// Revert data for `InsufficientBalance(balance, withdrawAmount)`.
pub fn encode_insufficient_balance(balance: U256, withdraw_amount: U256) -> Bytes {
    IAssessment::InsufficientBalance { balance, withdrawAmount: withdraw_amount }
        .abi_encode()
        .into()
}

/// Human-readable reason for revert data.
///
/// Custom contract errors are tried first, then the standard `Error(string)`
/// and `Panic(uint256)` encodings.
pub fn decode_revert(data: &[u8]) -> Option<String> {
    if let Ok(IAssessmentErrors::InsufficientBalance(err)) = IAssessmentErrors::abi_decode(data) {
        return Some(format!(
            "InsufficientBalance(balance: {}, withdrawAmount: {})",
            err.balance, err.withdrawAmount
        ));
    }
    alloy_sol_types::decode_revert_reason(data)
}

/// Topic and data of the event emitted by a confirmed operation.
pub fn encode_event(kind: TxKind, amount: U256) -> (B256, Bytes) {
    let topic = match kind {
        TxKind::Deposit => IAssessment::Deposit::SIGNATURE_HASH,
        TxKind::Withdraw => IAssessment::Withdraw::SIGNATURE_HASH,
    };
    (topic, amount.abi_encode().into())
}

/// Recognize a `Deposit` / `Withdraw` event log.
pub fn decode_event(topic0: &B256, data: &[u8]) -> Option<(TxKind, U256)> {
    let kind = if *topic0 == IAssessment::Deposit::SIGNATURE_HASH {
        TxKind::Deposit
    } else if *topic0 == IAssessment::Withdraw::SIGNATURE_HASH {
        TxKind::Withdraw
    } else {
        return None;
    };
    U256::abi_decode(data).ok().map(|amount| (kind, amount))
}

/// Parse a `0x`-prefixed (or bare) hex string.
pub fn parse_hex(s: &str) -> Result<Bytes, AbiError> {
    hex::decode(s)
        .map(Bytes::from)
        .map_err(|e| AbiError::InvalidHex(format!("{s}: {e}")))
}
