//! End-to-end session tests for the ATM bridge.
//!
//! Drives a full [`atm_bridge::Bridge`] against the in-process development
//! chain: discovery, connection, deposits and withdrawals, the history
//! gate, and the theme toggle, as a user would through the page.

pub mod helpers;
