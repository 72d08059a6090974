/*
 * Ekubo API payloads
 */

use crate::aggregator::LegActivity;
use serde::Deserialize;
use serde_json::Value;

/// Pools are kept as raw JSON so one bad record cannot fail the whole pair.
#[derive(Debug, Clone, Deserialize)]
pub struct PairPoolsResponse {
    #[serde(rename = "topPools", default)]
    pub top_pools: Vec<Value>,
}

/// One pool between a token pair. Amounts are raw integer strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPool {
    pub fee: String,
    pub tick_spacing: u64,
    #[serde(default)]
    pub extension: Option<String>,
    pub volume0_24h: String,
    pub volume1_24h: String,
    pub fees0_24h: String,
    pub fees1_24h: String,
    pub tvl0_total: String,
    pub tvl1_total: String,
}

impl RawPool {
    #[must_use]
    pub fn activity(&self) -> LegActivity<'_> {
        LegActivity {
            volume: (self.volume0_24h.as_str(), self.volume1_24h.as_str()),
            tvl: (self.tvl0_total.as_str(), self.tvl1_total.as_str()),
            fees: (self.fees0_24h.as_str(), self.fees1_24h.as_str()),
        }
    }
}
