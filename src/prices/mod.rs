/*
 * USD price cache backed by the DEX quoter API
 */

use crate::models::{Result, YieldError};
use crate::utils::normalize_address;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, error, warn};

#[derive(Debug, Deserialize)]
struct PricesResponse {
    prices: Vec<QuotedPrice>,
}

#[derive(Debug, Deserialize)]
struct QuotedPrice {
    token: String,
    price: f64,
}

/// Latest USD price per canonical token address.
///
/// A cache lives for one aggregation pass. `refresh` swaps in a complete new
/// snapshot or leaves the previous one untouched.
#[derive(Debug, Clone)]
pub struct PriceCache {
    quoter_url: String,
    reference_token: String,
    prices: HashMap<String, f64>,
}

impl PriceCache {
    pub fn new(quoter_url: &str, reference_token: &str) -> Result<Self> {
        Ok(Self {
            quoter_url: quoter_url.trim_end_matches('/').to_string(),
            reference_token: normalize_address(reference_token)?,
            prices: HashMap::new(),
        })
    }

    /// Builds a cache from known `(address, price)` pairs without any network access.
    pub fn from_prices<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let prices = entries
            .into_iter()
            .map(|(address, price)| Ok((normalize_address(address)?, price)))
            .collect::<Result<HashMap<_, _>>>()?;
        Ok(Self {
            quoter_url: String::new(),
            reference_token: String::new(),
            prices,
        })
    }

    pub async fn refresh(&mut self, client: &Client) -> Result<()> {
        let url = format!("{}/prices/{}", self.quoter_url, self.reference_token);
        debug!("Refreshing prices from {}", url);

        let response = client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                error!("Error fetching prices: {}", e);
                YieldError::PriceFetchError(format!("request to {url} failed: {e}"))
            })?
            .json::<PricesResponse>()
            .await
            .map_err(|e| {
                error!("Error parsing prices: {}", e);
                YieldError::PriceFetchError(format!("invalid price payload: {e}"))
            })?;

        let mut prices = HashMap::with_capacity(response.prices.len());
        for QuotedPrice { token, price } in response.prices {
            if !price.is_finite() || price < 0.0 {
                warn!("Ignoring invalid price {} for {}", price, token);
                continue;
            }
            match normalize_address(&token) {
                Ok(address) => {
                    prices.insert(address, price);
                }
                Err(e) => warn!("Ignoring quoted price: {}", e),
            }
        }

        debug!("Price cache refreshed with {} tokens", prices.len());
        self.prices = prices;
        Ok(())
    }

    /// Cached USD price, or 0 when the token has no quote.
    #[must_use]
    pub fn get(&self, address: &str) -> f64 {
        normalize_address(address)
            .ok()
            .and_then(|address| self.prices.get(&address).copied())
            .unwrap_or(0.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
