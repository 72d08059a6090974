/*
 * Aggregation policy: pair enumeration, bounded fan-out, final filtering and ordering
 */

use crate::models::{DexPoolStats, Result, TokenInfo, YieldError};
use crate::utils::is_zero_amount;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Which legs of a raw pool must show activity for it to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityFilter {
    /// Volume, TVL and fees each nonzero on at least one leg.
    Strict,
    /// Only volume must be nonzero on at least one leg.
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Apr,
    Tvl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AprModel {
    /// Reported 24h fees annualized against TVL.
    Fees,
    /// 24h volume times the pool fee tier, annualized against TVL.
    FeeTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DexPolicy {
    pub activity_filter: ActivityFilter,
    pub sort_key: SortKey,
    pub min_apr: Option<f64>,
    pub drop_zero_apr: bool,
    pub apr_model: AprModel,
}

impl Default for DexPolicy {
    fn default() -> Self {
        Self {
            activity_filter: ActivityFilter::Strict,
            sort_key: SortKey::Apr,
            min_apr: Some(1.0),
            drop_zero_apr: true,
            apr_model: AprModel::Fees,
        }
    }
}

impl DexPolicy {
    /// Nonzero volume only, no APR floor, scored on volume times fee tier
    /// and ordered by TVL.
    #[must_use]
    pub fn by_tvl() -> Self {
        Self {
            activity_filter: ActivityFilter::Volume,
            sort_key: SortKey::Tvl,
            min_apr: None,
            drop_zero_apr: false,
            apr_model: AprModel::FeeTier,
        }
    }
}

impl std::str::FromStr for ActivityFilter {
    type Err = YieldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(ActivityFilter::Strict),
            "volume" => Ok(ActivityFilter::Volume),
            _ => Err(YieldError::ConfigError(format!("Unknown activity filter: {s}"))),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = YieldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "apr" => Ok(SortKey::Apr),
            "tvl" => Ok(SortKey::Tvl),
            _ => Err(YieldError::ConfigError(format!("Unknown sort key: {s}"))),
        }
    }
}

impl std::str::FromStr for AprModel {
    type Err = YieldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fees" => Ok(AprModel::Fees),
            "fee_tier" | "fee-tier" => Ok(AprModel::FeeTier),
            _ => Err(YieldError::ConfigError(format!("Unknown APR model: {s}"))),
        }
    }
}

/// Per-leg raw amounts consulted by the activity filter.
pub struct LegActivity<'a> {
    pub volume: (&'a str, &'a str),
    pub tvl: (&'a str, &'a str),
    pub fees: (&'a str, &'a str),
}

impl ActivityFilter {
    #[must_use]
    pub fn is_active(&self, legs: &LegActivity<'_>) -> bool {
        let any = |(a, b): (&str, &str)| !is_zero_amount(a) || !is_zero_amount(b);
        match self {
            ActivityFilter::Strict => any(legs.volume) && any(legs.tvl) && any(legs.fees),
            ActivityFilter::Volume => any(legs.volume),
        }
    }
}

/// Every unordered pair `(i, j)` with `i < j`, in whitelist order.
#[must_use]
pub fn unordered_pairs(tokens: &[TokenInfo]) -> Vec<(&TokenInfo, &TokenInfo)> {
    let mut pairs = Vec::with_capacity(tokens.len() * tokens.len().saturating_sub(1) / 2);
    for (i, token0) in tokens.iter().enumerate() {
        for token1 in &tokens[i + 1..] {
            pairs.push((token0, token1));
        }
    }
    pairs
}

/// Runs `fetch` for every unit with at most `concurrency` in flight and
/// concatenates the results in input order.
///
/// `fetch` is infallible: each unit handles and logs its own failure so one
/// unit never cancels its siblings.
pub async fn fan_out<I, T, F, Fut>(units: I, concurrency: usize, fetch: F) -> Vec<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Vec<T>>,
{
    stream::iter(units)
        .map(fetch)
        .buffered(concurrency.max(1))
        .flat_map(stream::iter)
        .collect()
        .await
}

/// Applies the APR floor and orders the pools by the configured key, highest first.
#[must_use]
pub fn finalize_dex(mut pools: Vec<DexPoolStats>, policy: &DexPolicy) -> Vec<DexPoolStats> {
    if let Some(floor) = policy.min_apr {
        pools.retain(|pool| pool.apr >= floor);
    }
    match policy.sort_key {
        SortKey::Apr => pools.sort_by(|a, b| b.apr.total_cmp(&a.apr)),
        SortKey::Tvl => pools.sort_by(|a, b| b.tvl.usd.total_cmp(&a.tvl.usd)),
    }
    pools
}
