/*
 * Data models and types for the yield aggregation service
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Whitelisted token as exposed by the DEX token list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub l2_token_address: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub total_supply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default)]
    pub logo_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Ekubo,
    Zklend,
}

impl Protocol {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Ekubo => "ekubo",
            Protocol::Zklend => "zklend",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw per-leg amounts alongside their combined USD value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegAmounts {
    pub token0: String,
    pub token1: String,
    pub usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolTokens {
    pub token0: TokenInfo,
    pub token1: TokenInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPoolStats {
    pub token0_symbol: String,
    pub token1_symbol: String,
    pub fee: String,
    pub tick_spacing: u64,
    pub extension: String,
    #[serde(rename = "volume24h")]
    pub volume_24h: LegAmounts,
    #[serde(rename = "fees24h")]
    pub fees_24h: LegAmounts,
    pub tvl: LegAmounts,
    pub apr: f64,
    pub tokens: PoolTokens,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LendingToken {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// APY components rescaled from fractions to percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AprBreakdown {
    pub total: f64,
    pub base: f64,
    pub reward: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LendingPoolStats {
    pub token: LendingToken,
    pub total_supply: String,
    #[serde(rename = "totalSupplyUSD")]
    pub total_supply_usd: f64,
    pub total_borrow: String,
    #[serde(rename = "totalBorrowUSD")]
    pub total_borrow_usd: f64,
    pub available_liquidity: String,
    #[serde(rename = "availableLiquidityUSD")]
    pub available_liquidity_usd: f64,
    #[serde(rename = "supplyAPR")]
    pub supply_apr: AprBreakdown,
    #[serde(rename = "borrowAPR")]
    pub borrow_apr: AprBreakdown,
    pub utilization_rate: f64,
    pub supplier_count: u64,
    pub borrower_count: u64,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AprSnapshot {
    pub ekubo: Vec<DexPoolStats>,
    pub zklend: Vec<LendingPoolStats>,
    pub timestamp: i64,
}

#[derive(Debug, Error)]
pub enum YieldError {
    #[error("Transport error: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Unexpected API response: {0}")]
    ApiError(String),

    #[error("Price fetch error: {0}")]
    PriceFetchError(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),
}

impl From<::config::ConfigError> for YieldError {
    fn from(err: ::config::ConfigError) -> Self {
        YieldError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, YieldError>;
