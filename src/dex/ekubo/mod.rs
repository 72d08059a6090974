/*
 * Ekubo (Starknet) pool statistics integration
 */

mod pool;
mod types;

pub use pool::{process_pool, EkuboClient};
pub use types::{PairPoolsResponse, RawPool};

use crate::models::TokenInfo;

pub const DEFAULT_API_URL: &str = "https://starknet-mainnet-api.ekubo.org";
pub const DEFAULT_QUOTER_URL: &str = "https://starknet-mainnet-quoter-api.ekubo.org";

pub const USDC_ADDRESS: &str = "0x053c91253bc9682c04929ca02ed00b3e423f6710d2ee7e0d5ebb06f3ecf368a8";
pub const ETH_ADDRESS: &str = "0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7";
pub const USDT_ADDRESS: &str = "0x068f5c6a61780768455de69077e07e89787839bf8166decfbf92b645209c0fb8";
pub const STRK_ADDRESS: &str = "0x04718f5a0fc34cc1af16a1cdee98ffb20c31f5cd61d6ab07201858f4287c938d";

/// Prices are quoted against USDC.
pub const DEFAULT_REFERENCE_TOKEN: &str = USDC_ADDRESS;

fn whitelisted(name: &str, symbol: &str, decimals: u8, address: &str, sort_order: i32, logo: &str) -> TokenInfo {
    TokenInfo {
        name: name.to_string(),
        symbol: symbol.to_string(),
        decimals,
        l2_token_address: address.to_string(),
        sort_order,
        total_supply: None,
        hidden: None,
        logo_url: format!("https://imagedelivery.net/0xPAQaDtnQhBs8IzYRIlNg/{logo}/logo"),
    }
}

#[must_use]
pub fn default_whitelist() -> Vec<TokenInfo> {
    vec![
        whitelisted("USD Coin", "USDC", 6, USDC_ADDRESS, 5, "e5aaa970-a998-47e8-bd43-4a3b56b87200"),
        whitelisted("Ether", "ETH", 18, ETH_ADDRESS, 3, "e07829b7-0382-4e03-7ecd-a478c5aa9f00"),
        whitelisted("Tether USD", "USDT", 6, USDT_ADDRESS, 4, "c8a721d1-07c3-46e4-ab4e-523977c30b00"),
        whitelisted("StarkNet Token", "STRK", 18, STRK_ADDRESS, 2, "1b126320-367c-48ed-cf5a-ba7580e49600"),
    ]
}
