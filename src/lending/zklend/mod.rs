/*
 * zkLend market statistics integration
 */

mod market;
mod types;

pub use market::{process_market, ZkLendClient};
pub use types::{RawApy, RawMarket, RawMarketToken, RawPrice};

use crate::dex::ekubo::{ETH_ADDRESS, STRK_ADDRESS, USDC_ADDRESS, USDT_ADDRESS};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://app.zklend.com/api";

/// A lending market the service reports on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LendingMarket {
    pub symbol: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[must_use]
pub fn default_markets() -> Vec<LendingMarket> {
    [
        ("STRK", STRK_ADDRESS),
        ("ETH", ETH_ADDRESS),
        ("USDC", USDC_ADDRESS),
        ("USDT", USDT_ADDRESS),
    ]
    .into_iter()
    .map(|(symbol, address)| LendingMarket {
        symbol: symbol.to_string(),
        address: Some(address.to_string()),
    })
    .collect()
}
