/*
 * APR/APY calculations for DEX pools and lending markets
 */

use crate::models::AprBreakdown;
use crate::utils::parse_amount;
use num_traits::ToPrimitive;

pub const DAYS_PER_YEAR: f64 = 365.0;

/// 2^128, the denominator of Ekubo's 0.128 fixed-point fee.
const FEE_ONE: f64 = 340_282_366_920_938_463_463_374_607_431_768_211_456.0;

/// Simple annualization of one day of fees against current TVL, in percent.
#[must_use]
pub fn dex_apr(fees_24h_usd: f64, tvl_usd: f64) -> f64 {
    if !(tvl_usd > 0.0) || !fees_24h_usd.is_finite() || !tvl_usd.is_finite() {
        return 0.0;
    }
    (fees_24h_usd * DAYS_PER_YEAR * 100.0) / tvl_usd
}

/// Fee tier of a pool as a percentage, decoded from the 0.128 fixed-point string.
/// Unparseable fees decode to 0.
#[must_use]
pub fn fee_tier_percent(fee: &str) -> f64 {
    parse_amount(fee)
        .ok()
        .and_then(|raw| raw.to_f64())
        .map_or(0.0, |raw| raw / FEE_ONE * 100.0)
}

/// APR estimated from 24h volume times the pool's fee tier, in percent.
#[must_use]
pub fn dex_apr_from_volume(volume_24h_usd: f64, fee_percent: f64, tvl_usd: f64) -> f64 {
    dex_apr(volume_24h_usd * fee_percent / 100.0, tvl_usd)
}

/// Borrowed over supplied capital, in percent.
#[must_use]
pub fn utilization_percent(borrow_usd: f64, supply_usd: f64) -> f64 {
    if !(supply_usd > 0.0) || !borrow_usd.is_finite() {
        return 0.0;
    }
    borrow_usd / supply_usd * 100.0
}

#[must_use]
pub fn fraction_to_percent(fraction: f64) -> f64 {
    fraction * 100.0
}

/// Rescales the API's fractional net/base/reward APYs to percentages.
#[must_use]
pub fn apy_breakdown(net: f64, base: f64, reward: Option<f64>) -> AprBreakdown {
    AprBreakdown {
        total: fraction_to_percent(net),
        base: fraction_to_percent(base),
        reward: fraction_to_percent(reward.unwrap_or(0.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dex_apr_formula() {
        let apr = dex_apr(9.0, 30_000.0);
        assert!((apr - 10.95).abs() < 1e-9);
    }

    #[test]
    fn test_dex_apr_degenerate_inputs() {
        assert_eq!(dex_apr(0.0, 1_000.0), 0.0);
        assert_eq!(dex_apr(50.0, 0.0), 0.0);
        assert_eq!(dex_apr(50.0, -1.0), 0.0);
        assert_eq!(dex_apr(f64::NAN, 1_000.0), 0.0);
        assert_eq!(dex_apr(1.0, f64::NAN), 0.0);
    }

    #[test]
    fn test_fee_tier_percent() {
        // 0.05% fee: 2^128 * 0.0005
        let fee = "170141183460469231731687303715884105";
        assert!((fee_tier_percent(fee) - 0.05).abs() < 1e-9);
        assert_eq!(fee_tier_percent("0"), 0.0);
        assert_eq!(fee_tier_percent("not-a-number"), 0.0);
    }

    #[test]
    fn test_dex_apr_from_volume() {
        // 1M volume at 0.3% over 1M TVL: 3000/day -> 109.5%
        let apr = dex_apr_from_volume(1_000_000.0, 0.3, 1_000_000.0);
        assert!((apr - 109.5).abs() < 1e-9);
        assert_eq!(dex_apr_from_volume(1_000_000.0, 0.3, 0.0), 0.0);
    }

    #[test]
    fn test_utilization() {
        assert_eq!(utilization_percent(0.0, 1_000.0), 0.0);
        assert_eq!(utilization_percent(500.0, 0.0), 0.0);
        assert!((utilization_percent(250_000.0, 1_000_000.0) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_apy_breakdown_defaults_missing_reward() {
        let apr = apy_breakdown(0.05, 0.04, None);
        assert!((apr.total - 5.0).abs() < 1e-12);
        assert!((apr.base - 4.0).abs() < 1e-12);
        assert_eq!(apr.reward, 0.0);

        let apr = apy_breakdown(0.05, 0.04, Some(0.01));
        assert!((apr.reward - 1.0).abs() < 1e-12);
    }
}
