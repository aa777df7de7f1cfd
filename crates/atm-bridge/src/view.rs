//! Text rendering of the ATM page.

use std::fmt::Write;

use atm_core::constants::{
    CONNECT_PROMPT, EMPTY_HISTORY, INSTALL_PROMPT, PAGE_SUBTITLE, PAGE_TITLE,
};
use atm_core::types::Theme;

use crate::bridge::Bridge;

/// Which body the page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// No wallet provider.
    Install,
    /// Wallet present, no account connected.
    Connect,
    /// Account connected and contract bound.
    Account,
}

pub fn screen(bridge: &Bridge) -> Screen {
    let session = bridge.session();
    if session.wallet().is_none() {
        Screen::Install
    } else if !session.is_connected() {
        Screen::Connect
    } else {
        Screen::Account
    }
}

/// Render the page as plain text.
pub fn render(bridge: &Bridge) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>60}", format!("[theme: {}]", bridge.ui().theme()));
    let _ = writeln!(out, "{PAGE_TITLE}");
    let _ = writeln!(out, "{}", "=".repeat(PAGE_TITLE.len()));
    let _ = writeln!(out, "{PAGE_SUBTITLE}");

    match screen(bridge) {
        Screen::Install => {
            let _ = writeln!(out, "{INSTALL_PROMPT}");
        }
        Screen::Connect => {
            let _ = writeln!(out, "[ {CONNECT_PROMPT} ]  (type `connect`)");
        }
        Screen::Account => {
            if let Some(account) = bridge.session().account() {
                let _ = writeln!(out, "Your Account: {account}");
            }
            let balance = bridge
                .balance()
                .map(|b| b.to_string())
                .unwrap_or_default();
            let _ = writeln!(out, "Your Balance: {balance}");
            let _ = writeln!(out, "Amount: {}", bridge.ui().amount_input());
            let _ = writeln!(out, "[ Deposit ]  [ Withdraw ]  [ View Transaction History ]");
        }
    }

    if bridge.ui().history_visible() {
        let _ = writeln!(out);
        let log = bridge.history();
        if log.is_empty() {
            let _ = writeln!(out, "{EMPTY_HISTORY}");
        } else {
            let _ = writeln!(out, "Transaction History");
            for record in log.records() {
                let _ = writeln!(out, "  - {record}");
            }
        }
    }
    out
}

/// Wrap `text` in ANSI colors for `theme`: dark text on white, or white
/// text on dark grey.
pub fn themed(theme: Theme, text: &str) -> String {
    let style = match theme {
        Theme::Light => "\x1b[48;5;15m\x1b[38;5;0m",
        Theme::Dark => "\x1b[48;5;236m\x1b[38;5;15m",
    };
    let mut out = String::with_capacity(text.len() + 32);
    for line in text.lines() {
        let _ = writeln!(out, "{style}{line}\x1b[K\x1b[0m");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;
    use crate::devnet::{DevChain, DevChainOptions};
    use alloy_primitives::U256;
    use std::sync::Arc;
    use std::time::Duration;

    fn bridge() -> Bridge {
        Bridge::new(BridgeConfig {
            confirmation_poll: Duration::from_millis(1),
            ..BridgeConfig::default()
        })
    }

    #[test]
    fn install_prompt_without_wallet() {
        let b = bridge();
        assert_eq!(screen(&b), Screen::Install);
        let page = render(&b);
        assert!(page.contains(PAGE_TITLE));
        let header = format!(
            "{PAGE_TITLE}\n{}\n{PAGE_SUBTITLE}\n",
            "=".repeat(PAGE_TITLE.len())
        );
        assert!(page.contains(&header));
        assert!(page.contains(INSTALL_PROMPT));
        assert!(!page.contains("Your Account"));
    }

    #[tokio::test]
    async fn connect_prompt_with_wallet() {
        let mut b = bridge();
        b.discover_wallet(Some(Arc::new(DevChain::new(DevChainOptions::default()))))
            .await;
        assert_eq!(screen(&b), Screen::Connect);
        assert!(render(&b).contains(CONNECT_PROMPT));
    }

    #[tokio::test]
    async fn account_view_and_history() {
        let mut b = bridge();
        b.discover_wallet(Some(Arc::new(DevChain::new(DevChainOptions::default()))))
            .await;
        b.connect().await.unwrap();
        b.refresh_if_stale().await.unwrap();
        assert_eq!(screen(&b), Screen::Account);

        let page = render(&b);
        assert!(page.contains("Your Account: 0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert!(page.contains("Your Balance: 1"));
        assert!(page.contains("Amount: 10"));
        assert!(!page.contains(EMPTY_HISTORY));

        b.gate_history("1234");
        assert!(render(&b).contains(EMPTY_HISTORY));

        b.deposit(U256::from(10)).await.unwrap();
        let page = render(&b);
        assert!(page.contains("Transaction History"));
        assert!(page.contains("Type: Deposit, Amount: 10, Hash: 0x"));
        assert!(page.contains("Your Balance: 11"));
    }

    #[test]
    fn theme_marker_follows_toggle() {
        let mut b = bridge();
        assert!(render(&b).contains("[theme: light]"));
        b.toggle_theme();
        assert!(render(&b).contains("[theme: dark]"));
    }

    #[test]
    fn themed_wraps_every_line() {
        let out = themed(Theme::Dark, "a\nb");
        assert_eq!(out.lines().count(), 2);
        assert!(out.lines().all(|l| l.starts_with("\x1b[48;5;236m") && l.ends_with("\x1b[0m")));
    }
}
