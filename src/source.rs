/*
 * Common interface implemented by every protocol adapter
 */

use crate::models::{Protocol, Result};
use async_trait::async_trait;

/// An external yield source: fetches raw records from one protocol API and
/// normalizes them into USD-denominated stats.
#[async_trait]
pub trait YieldSource: Send + Sync {
    type Stats: Send + Sync + 'static;

    fn protocol(&self) -> Protocol;

    /// Runs one full fetch and normalization pass.
    async fn pool_stats(&self) -> Result<Vec<Self::Stats>>;
}
