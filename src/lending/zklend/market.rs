/*
 * zkLend market fetcher and USD normalization
 */

use super::types::RawMarket;
use super::LendingMarket;
use crate::analytics::{apy_breakdown, utilization_percent};
use crate::config::ZkLendConfig;
use crate::metrics::Metrics;
use crate::models::{LendingPoolStats, LendingToken, Protocol, Result};
use crate::source::YieldSource;
use crate::utils::token_to_usd;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ZkLendClient {
    client: Client,
    config: ZkLendConfig,
    metrics: Arc<Metrics>,
}

impl ZkLendClient {
    #[must_use]
    pub fn new(client: Client, config: ZkLendConfig, metrics: Arc<Metrics>) -> Self {
        Self {
            client,
            config,
            metrics,
        }
    }

    /// Markets stay raw JSON until the whitelist has been applied.
    async fn fetch_markets(&self) -> Result<Vec<Value>> {
        let url = format!("{}/pools", self.config.api_url.trim_end_matches('/'));
        let markets = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Value>>()
            .await?;
        Ok(markets)
    }

    fn whitelisted(&self, symbol: &str) -> Option<&LendingMarket> {
        self.config
            .markets
            .iter()
            .find(|market| market.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Every whitelisted market in USD terms. A failed request yields no markets.
    pub async fn get_pool_stats(&self) -> Result<Vec<LendingPoolStats>> {
        let raw_markets = match self.fetch_markets().await {
            Ok(markets) => markets,
            Err(e) => {
                warn!("Error fetching zkLend data: {}", e);
                self.metrics.record_fetch_failure(Protocol::Zklend);
                return Ok(Vec::new());
            }
        };

        let timestamp = Utc::now().timestamp();
        let mut stats = Vec::with_capacity(self.config.markets.len());
        for record in raw_markets {
            let Some(symbol) = record.pointer("/token/symbol").and_then(Value::as_str) else {
                continue;
            };
            let Some(market) = self.whitelisted(symbol) else {
                continue;
            };
            let raw = match serde_json::from_value::<RawMarket>(record) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Skipping malformed zkLend market {}: {}", market.symbol, e);
                    self.metrics.record_skipped(Protocol::Zklend, "invalid_record");
                    continue;
                }
            };
            match process_market(&raw, market, timestamp) {
                Ok(market_stats) => stats.push(market_stats),
                Err(e) => {
                    warn!("Skipping zkLend market {}: {}", raw.token.symbol, e);
                    self.metrics.record_skipped(Protocol::Zklend, "invalid_amount");
                }
            }
        }

        info!("zkLend aggregation produced {} markets", stats.len());
        Ok(stats)
    }
}

/// Converts one raw market into USD terms using the market's own price feed.
pub fn process_market(
    raw: &RawMarket,
    market: &LendingMarket,
    timestamp: i64,
) -> Result<LendingPoolStats> {
    let price_usd = token_to_usd(&raw.price.price, raw.price.decimals, 1.0)?;
    let decimals = raw.token.decimals;

    let total_supply_usd = token_to_usd(&raw.supply_amount, decimals, price_usd)?;
    let total_borrow_usd = token_to_usd(&raw.debt_amount, decimals, price_usd)?;
    let available_liquidity_usd = token_to_usd(&raw.available_liquidity, decimals, price_usd)?;

    let lending = raw.lending_apy;
    let borrowing = raw.borrowing_apy;

    Ok(LendingPoolStats {
        token: LendingToken {
            symbol: raw.token.symbol.clone(),
            name: raw.token.name.clone(),
            decimals,
            address: market.address.clone().or_else(|| raw.token.address.clone()),
        },
        total_supply: raw.supply_amount.clone(),
        total_supply_usd,
        total_borrow: raw.debt_amount.clone(),
        total_borrow_usd,
        available_liquidity: raw.available_liquidity.clone(),
        available_liquidity_usd,
        supply_apr: apy_breakdown(lending.net_apy, lending.raw_apy, lending.reward_apy),
        borrow_apr: apy_breakdown(borrowing.net_apy, borrowing.raw_apy, borrowing.reward_apy),
        utilization_rate: utilization_percent(total_borrow_usd, total_supply_usd),
        supplier_count: raw.supplier_count,
        borrower_count: raw.borrower_count,
        timestamp,
    })
}

#[async_trait]
impl YieldSource for ZkLendClient {
    type Stats = LendingPoolStats;

    fn protocol(&self) -> Protocol {
        Protocol::Zklend
    }

    async fn pool_stats(&self) -> Result<Vec<LendingPoolStats>> {
        self.get_pool_stats().await
    }
}
