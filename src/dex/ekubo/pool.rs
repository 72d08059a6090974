/*
 * Ekubo pool fetcher and APR processing
 */

use super::types::{PairPoolsResponse, RawPool};
use crate::aggregator::{fan_out, finalize_dex, unordered_pairs, AprModel};
use crate::analytics::{dex_apr, dex_apr_from_volume, fee_tier_percent};
use crate::config::EkuboConfig;
use crate::metrics::Metrics;
use crate::models::{
    DexPoolStats, LegAmounts, PoolTokens, Protocol, Result, TokenInfo, YieldError,
};
use crate::prices::PriceCache;
use crate::source::YieldSource;
use crate::utils::{normalize_address, token_to_usd};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct EkuboClient {
    client: Client,
    config: EkuboConfig,
    concurrency: usize,
    metrics: Arc<Metrics>,
}

impl EkuboClient {
    pub fn new(
        client: Client,
        config: EkuboConfig,
        concurrency: usize,
        metrics: Arc<Metrics>,
    ) -> Result<Self> {
        normalize_address(&config.reference_token)?;
        for token in &config.tokens {
            normalize_address(&token.l2_token_address).map_err(|_| {
                YieldError::ConfigError(format!(
                    "Invalid address for whitelisted token {}: {}",
                    token.symbol, token.l2_token_address
                ))
            })?;
        }

        Ok(Self {
            client,
            config,
            concurrency,
            metrics,
        })
    }

    /// All whitelisted pairs, normalized, filtered and ordered by the configured policy.
    pub async fn get_all_pool_stats(&self) -> Result<Vec<DexPoolStats>> {
        let mut prices = PriceCache::new(&self.config.quoter_url, &self.config.reference_token)?;
        prices.refresh(&self.client).await?;

        let pairs: Vec<(TokenInfo, TokenInfo)> = unordered_pairs(&self.config.tokens)
            .into_iter()
            .map(|(token0, token1)| (token0.clone(), token1.clone()))
            .collect();
        info!(
            "Fetching Ekubo pools for {} pairs ({} prices cached)",
            pairs.len(),
            prices.len()
        );

        let prices = &prices;
        let pools = fan_out(pairs, self.concurrency, move |(token0, token1)| async move {
            self.pair_stats(&token0, &token1, prices).await
        })
        .await;

        let pools = finalize_dex(pools, &self.config.policy);
        info!("Ekubo aggregation produced {} pools", pools.len());
        Ok(pools)
    }

    async fn fetch_pair_pools(&self, token0: &TokenInfo, token1: &TokenInfo) -> Result<Vec<Value>> {
        let url = format!(
            "{}/pair/{}/{}/pools",
            self.config.api_url.trim_end_matches('/'),
            normalize_address(&token0.l2_token_address)?,
            normalize_address(&token1.l2_token_address)?
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<PairPoolsResponse>()
            .await?;

        Ok(response.top_pools)
    }

    /// Stats for one pair. A failed request yields no pools rather than an error.
    async fn pair_stats(
        &self,
        token0: &TokenInfo,
        token1: &TokenInfo,
        prices: &PriceCache,
    ) -> Vec<DexPoolStats> {
        let raw_pools = match self.fetch_pair_pools(token0, token1).await {
            Ok(pools) => pools,
            Err(e) => {
                warn!(
                    "Error fetching pool data for {}/{}: {}",
                    token0.symbol, token1.symbol, e
                );
                self.metrics.record_fetch_failure(Protocol::Ekubo);
                return Vec::new();
            }
        };
        debug!(
            "{}/{}: {} raw pools",
            token0.symbol,
            token1.symbol,
            raw_pools.len()
        );

        let policy = &self.config.policy;
        let mut stats = Vec::with_capacity(raw_pools.len());
        for record in raw_pools {
            let pool = match serde_json::from_value::<RawPool>(record) {
                Ok(pool) => pool,
                Err(e) => {
                    warn!(
                        "Skipping malformed {}/{} pool record: {}",
                        token0.symbol, token1.symbol, e
                    );
                    self.metrics.record_skipped(Protocol::Ekubo, "invalid_record");
                    continue;
                }
            };
            if !policy.activity_filter.is_active(&pool.activity()) {
                self.metrics.record_skipped(Protocol::Ekubo, "inactive");
                continue;
            }
            match process_pool(&pool, token0, token1, prices, policy.apr_model) {
                Ok(pool_stats) if policy.drop_zero_apr && pool_stats.apr <= 0.0 => {
                    self.metrics.record_skipped(Protocol::Ekubo, "zero_apr");
                }
                Ok(pool_stats) => stats.push(pool_stats),
                Err(e) => {
                    warn!(
                        "Skipping {}/{} pool with fee {}: {}",
                        token0.symbol, token1.symbol, pool.fee, e
                    );
                    self.metrics.record_skipped(Protocol::Ekubo, "invalid_amount");
                }
            }
        }
        stats
    }
}

/// Converts one raw pool into USD terms against the given price snapshot.
pub fn process_pool(
    pool: &RawPool,
    token0: &TokenInfo,
    token1: &TokenInfo,
    prices: &PriceCache,
    model: AprModel,
) -> Result<DexPoolStats> {
    let price0 = prices.get(&token0.l2_token_address);
    let price1 = prices.get(&token1.l2_token_address);

    let legs = |amount0: &str, amount1: &str| -> Result<LegAmounts> {
        let usd = token_to_usd(amount0, token0.decimals, price0)?
            + token_to_usd(amount1, token1.decimals, price1)?;
        Ok(LegAmounts {
            token0: amount0.to_string(),
            token1: amount1.to_string(),
            usd,
        })
    };

    let volume_24h = legs(&pool.volume0_24h, &pool.volume1_24h)?;
    let fees_24h = legs(&pool.fees0_24h, &pool.fees1_24h)?;
    let tvl = legs(&pool.tvl0_total, &pool.tvl1_total)?;

    let apr = match model {
        AprModel::Fees => dex_apr(fees_24h.usd, tvl.usd),
        AprModel::FeeTier => {
            dex_apr_from_volume(volume_24h.usd, fee_tier_percent(&pool.fee), tvl.usd)
        }
    };

    Ok(DexPoolStats {
        token0_symbol: token0.symbol.clone(),
        token1_symbol: token1.symbol.clone(),
        fee: pool.fee.clone(),
        tick_spacing: pool.tick_spacing,
        extension: pool.extension.clone().unwrap_or_default(),
        volume_24h,
        fees_24h,
        tvl,
        apr,
        tokens: PoolTokens {
            token0: token0.clone(),
            token1: token1.clone(),
        },
    })
}

#[async_trait]
impl YieldSource for EkuboClient {
    type Stats = DexPoolStats;

    fn protocol(&self) -> Protocol {
        Protocol::Ekubo
    }

    async fn pool_stats(&self) -> Result<Vec<DexPoolStats>> {
        self.get_all_pool_stats().await
    }
}
