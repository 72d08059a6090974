/*
 * Yield service that coordinates the protocol sources
 */

use crate::{
    config::Config,
    dex::EkuboClient,
    lending::ZkLendClient,
    metrics::{Metrics, PassOutcome},
    models::{AprSnapshot, DexPoolStats, LendingPoolStats, Result},
    source::YieldSource,
};
use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

pub type DexSource = Arc<dyn YieldSource<Stats = DexPoolStats>>;
pub type LendingSource = Arc<dyn YieldSource<Stats = LendingPoolStats>>;

/// Entry point for the route handlers. Holds no per-pass state, so concurrent
/// requests run fully independent passes.
pub struct YieldService {
    dex: DexSource,
    lending: LendingSource,
    metrics: Arc<Metrics>,
}

impl YieldService {
    pub fn new(config: &Config, metrics: Arc<Metrics>) -> Result<Self> {
        info!("Initializing Yield Service");

        let client = Client::builder()
            .timeout(config.http.request_timeout())
            .build()?;

        let ekubo = EkuboClient::new(
            client.clone(),
            config.ekubo.clone(),
            config.http.max_concurrent_requests,
            metrics.clone(),
        )?;
        info!(
            "Ekubo client initialized with {} whitelisted tokens",
            config.ekubo.tokens.len()
        );

        let zklend = ZkLendClient::new(client, config.zklend.clone(), metrics.clone());
        info!(
            "zkLend client initialized with {} markets",
            config.zklend.markets.len()
        );

        Ok(Self::with_sources(Arc::new(ekubo), Arc::new(zklend), metrics))
    }

    #[must_use]
    pub fn with_sources(dex: DexSource, lending: LendingSource, metrics: Arc<Metrics>) -> Self {
        Self {
            dex,
            lending,
            metrics,
        }
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub async fn dex_pool_stats(&self) -> Result<Vec<DexPoolStats>> {
        self.run_pass(self.dex.as_ref()).await
    }

    pub async fn lending_pool_stats(&self) -> Result<Vec<LendingPoolStats>> {
        self.run_pass(self.lending.as_ref()).await
    }

    pub async fn lending_pool_stats_by_token(&self, symbol: &str) -> Result<Option<LendingPoolStats>> {
        let markets = self.lending_pool_stats().await?;
        Ok(markets
            .into_iter()
            .find(|market| market.token.symbol.eq_ignore_ascii_case(symbol)))
    }

    /// Both sources side by side. Either source failing fails the whole snapshot.
    pub async fn all_pool_stats(&self) -> Result<AprSnapshot> {
        let (ekubo, zklend) = tokio::try_join!(self.dex_pool_stats(), self.lending_pool_stats())?;
        Ok(AprSnapshot {
            ekubo,
            zklend,
            timestamp: Utc::now().timestamp_millis(),
        })
    }

    async fn run_pass<T>(&self, source: &dyn YieldSource<Stats = T>) -> Result<Vec<T>>
    where
        T: Send + Sync + 'static,
    {
        let protocol = source.protocol();
        let started = Instant::now();
        let result = source.pool_stats().await;
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(stats) => {
                self.metrics
                    .record_pass(protocol, PassOutcome::Success, elapsed);
                self.metrics.record_emitted(protocol, stats.len());
                info!("{} pass completed in {:.3}s with {} entries", protocol, elapsed, stats.len());
            }
            Err(e) => {
                self.metrics
                    .record_pass(protocol, PassOutcome::Failure, elapsed);
                error!("{} pass failed after {:.3}s: {}", protocol, elapsed, e);
            }
        }
        result
    }
}
