//! Page state: inputs, history gate, theme, and pending alerts.

use std::collections::VecDeque;

use alloy_primitives::U256;
use atm_core::constants::{HISTORY_PASSWORD, WRONG_PASSWORD_ALERT};
use atm_core::types::Theme;

use crate::error::BridgeError;

/// Ephemeral page state. Nothing here survives a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    amount_input: String,
    password_input: String,
    history_visible: bool,
    theme: Theme,
    alerts: VecDeque<String>,
}

impl UiState {
    pub fn new(default_amount: U256) -> Self {
        Self {
            amount_input: default_amount.to_string(),
            password_input: String::new(),
            history_visible: false,
            theme: Theme::default(),
            alerts: VecDeque::new(),
        }
    }

    /// Raw text of the amount input.
    pub fn amount_input(&self) -> &str {
        &self.amount_input
    }

    pub fn set_amount(&mut self, input: impl Into<String>) {
        self.amount_input = input.into();
    }

    /// Parse the amount input. Only the syntax is checked; the contract
    /// decides whether the amount is acceptable.
    pub fn amount(&self) -> Result<U256, BridgeError> {
        let text = self.amount_input.trim();
        if text.is_empty() {
            return Err(BridgeError::InvalidAmount(text.to_string()));
        }
        U256::from_str_radix(text, 10).map_err(|_| BridgeError::InvalidAmount(text.to_string()))
    }

    pub fn set_password(&mut self, input: impl Into<String>) {
        self.password_input = input.into();
    }

    /// Compare the password input against the fixed literal. Reveals the
    /// history on a match, queues an alert otherwise. A reveal is never
    /// undone by a later mismatch.
    pub fn submit_password(&mut self) -> bool {
        if self.password_input == HISTORY_PASSWORD {
            self.history_visible = true;
            true
        } else {
            self.alert(WRONG_PASSWORD_ALERT);
            false
        }
    }

    pub fn history_visible(&self) -> bool {
        self.history_visible
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push_back(message.into());
    }

    pub fn pending_alerts(&self) -> impl Iterator<Item = &str> {
        self.alerts.iter().map(String::as_str)
    }

    /// Remove and return queued alerts, oldest first.
    pub fn take_alerts(&mut self) -> Vec<String> {
        self.alerts.drain(..).collect()
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(U256::from(atm_core::constants::DEFAULT_AMOUNT))
    }
}
