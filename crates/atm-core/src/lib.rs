//! # atm-core
//! Foundation types and traits for the ATM wallet-contract bridge.

pub mod abi;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
