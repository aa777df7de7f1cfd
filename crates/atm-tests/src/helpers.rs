//! Shared helpers for end-to-end tests.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::U256;
use atm_bridge::{Bridge, BridgeConfig, DevChain, DevChainOptions};
use atm_core::traits::WalletProvider;

/// Config with a fast receipt poll so confirmation waits stay short.
pub fn fast_config() -> BridgeConfig {
    BridgeConfig {
        confirmation_poll: Duration::from_millis(1),
        ..BridgeConfig::default()
    }
}

/// A dev chain deployed with `initial_balance`, nothing pre-authorized.
pub fn chain(initial_balance: u64) -> Arc<DevChain> {
    chain_with(DevChainOptions {
        initial_balance: U256::from(initial_balance),
        ..DevChainOptions::default()
    })
}

pub fn chain_with(options: DevChainOptions) -> Arc<DevChain> {
    Arc::new(DevChain::new(options))
}

/// A bridge that discovered `chain` as its wallet but has not connected.
pub async fn discovered(chain: &Arc<DevChain>) -> Bridge {
    let mut bridge = Bridge::new(fast_config());
    let wallet: Arc<dyn WalletProvider> = chain.clone();
    assert!(bridge.discover_wallet(Some(wallet)).await);
    bridge
}

/// A bridge connected to `chain` with the balance already read.
pub async fn connected(chain: &Arc<DevChain>) -> Bridge {
    let mut bridge = discovered(chain).await;
    assert!(bridge.connect().await.unwrap());
    bridge.refresh_if_stale().await.unwrap();
    bridge
}
