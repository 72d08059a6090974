/*
 * Amount normalization and address helpers
 */

use crate::models::{Result, YieldError};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

/// Hex digits in a canonical Starknet felt address.
pub const ADDRESS_HEX_LEN: usize = 64;

/// Parses a non-negative integer amount given as a decimal or `0x`-prefixed hex string.
pub fn parse_amount(raw: &str) -> Result<BigUint> {
    let trimmed = raw.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => BigUint::parse_bytes(hex.as_bytes(), 16),
        None => BigUint::parse_bytes(trimmed.as_bytes(), 10),
    };
    parsed.ok_or_else(|| YieldError::InvalidAmount(format!("cannot parse {raw:?}")))
}

/// Divides `value` by `10^decimals` and returns the result as a double.
///
/// The integer and fractional parts are converted separately so that values
/// past 2^53 keep their leading digits instead of being truncated up front.
#[must_use]
pub fn scale_amount(value: &BigUint, decimals: u8) -> f64 {
    if decimals == 0 {
        return value.to_f64().unwrap_or(f64::INFINITY);
    }
    let divisor = BigUint::from(10u32).pow(u32::from(decimals));
    let whole = value / &divisor;
    let fraction = value % &divisor;

    let whole = whole.to_f64().unwrap_or(f64::INFINITY);
    if fraction.is_zero() {
        return whole;
    }
    let fraction = fraction.to_f64().unwrap_or(0.0) / 10f64.powi(i32::from(decimals));
    whole + fraction
}

/// `(amount / 10^decimals) * price`, the single source of every USD figure.
pub fn token_to_usd(amount: &str, decimals: u8, price: f64) -> Result<f64> {
    let value = parse_amount(amount)?;
    let usd = scale_amount(&value, decimals) * price;
    if !usd.is_finite() {
        return Err(YieldError::InvalidAmount(format!(
            "{amount} with {decimals} decimals overflows a double"
        )));
    }
    Ok(usd)
}

/// Returns true when the raw amount string is the literal zero the APIs use for empty legs.
#[must_use]
pub fn is_zero_amount(raw: &str) -> bool {
    raw == "0"
}

/// Canonicalizes an address to `0x` followed by 64 lowercase hex digits.
pub fn normalize_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty()
        || digits.len() > ADDRESS_HEX_LEN
        || !digits.chars().all(|c| c.is_ascii_hexdigit())
    {
        return Err(YieldError::InvalidAddress(address.to_string()));
    }

    Ok(format!(
        "0x{:0>width$}",
        digits.to_lowercase(),
        width = ADDRESS_HEX_LEN
    ))
}
