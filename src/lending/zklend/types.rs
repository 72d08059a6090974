/*
 * zkLend API payloads
 */

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RawMarket {
    pub token: RawMarketToken,
    pub price: RawPrice,
    pub supply_amount: String,
    pub debt_amount: String,
    pub available_liquidity: String,
    pub lending_apy: RawApy,
    pub borrowing_apy: RawApy,
    #[serde(default)]
    pub supplier_count: u64,
    #[serde(default)]
    pub borrower_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMarketToken {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[serde(default)]
    pub address: Option<String>,
}

/// USD price as a raw integer string scaled by `10^decimals`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPrice {
    pub price: String,
    pub decimals: u8,
}

/// APY components as fractions (0.05 == 5%).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawApy {
    pub net_apy: f64,
    pub raw_apy: f64,
    #[serde(default)]
    pub reward_apy: Option<f64>,
}
