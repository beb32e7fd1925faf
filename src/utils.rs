//! Miscellaneous helper utilities.

use crate::errors::{AppError, Result};
use bigdecimal::BigDecimal;
use ethers::types::{Bytes, U256};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{Signed, Zero};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt};

/// Decimals of the chain's native token.
pub const NATIVE_DECIMALS: u8 = 18;

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Run a network probe with an upper bound on its duration.
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| AppError::Timeout(limit))?
}

/// Parse a human decimal amount (e.g. "1.5") into fixed-point units.
/// Zero, negative and over-precise amounts are rejected.
pub fn parse_amount(raw: &str, decimals: u8) -> Result<U256> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Config("Enter amount".into()));
    }
    let value = BigDecimal::from_str(trimmed)
        .map_err(|e| AppError::Config(format!("invalid amount {trimmed:?}: {e}")))?;
    if !value.is_positive() {
        return Err(AppError::Config(format!("amount must be positive: {trimmed}")));
    }
    let scaled = value * BigDecimal::new(BigInt::from(1), -i64::from(decimals));
    if !scaled.is_integer() {
        return Err(AppError::Config(format!(
            "amount {trimmed} has more than {decimals} decimal places"
        )));
    }
    let (digits, _) = scaled.with_scale(0).into_bigint_and_exponent();
    U256::from_dec_str(&digits.to_string())
        .map_err(|e| AppError::Config(format!("amount {trimmed} out of range: {e}")))
}

/// Convert a raw fixed-point value into an exact decimal.
pub fn to_decimal(raw: U256, decimals: u8) -> BigDecimal {
    let mut buf = [0u8; 32];
    raw.to_big_endian(&mut buf);
    let digits = BigInt::from_biguint(Sign::Plus, BigUint::from_bytes_be(&buf));
    BigDecimal::new(digits, i64::from(decimals))
}

/// Round half-up to `places` fractional digits and render without exponent.
/// Presentation only; never feed the result back into arithmetic.
pub fn format_fixed(value: &BigDecimal, places: u32) -> String {
    let (digits, scale) = value.as_bigint_and_exponent();
    let negative = digits.is_negative();
    let magnitude = digits.abs();
    let target = i64::from(places);

    let scaled = if scale <= target {
        magnitude * BigInt::from(10u32).pow((target - scale) as u32)
    } else {
        let divisor = BigInt::from(10u32).pow((scale - target) as u32);
        (magnitude * 2u32 + &divisor) / (divisor * 2u32)
    };

    let mut text = scaled.to_string();
    let width = places as usize + 1;
    if text.len() < width {
        text = format!("{}{}", "0".repeat(width - text.len()), text);
    }
    let sign = if negative && !scaled.is_zero() { "-" } else { "" };
    if places == 0 {
        return format!("{sign}{text}");
    }
    let (int_part, frac_part) = text.split_at(text.len() - places as usize);
    format!("{sign}{int_part}.{frac_part}")
}

/// Exact decimal rendering without exponent or trailing zeros.
pub fn to_plain_string(value: &BigDecimal) -> String {
    let normalized = value.normalized();
    let (_, scale) = normalized.as_bigint_and_exponent();
    format_fixed(&normalized, scale.max(0) as u32)
}

/// Render a raw fixed-point value with `places` fractional digits.
pub fn format_units_fixed(raw: U256, decimals: u8, places: u32) -> String {
    format_fixed(&to_decimal(raw, decimals), places)
}

/// `0x`-prefixed lowercase hex.
pub fn to_hex(data: &Bytes) -> String {
    format!("0x{}", ethers::utils::hex::encode(data.as_ref()))
}

/// Hex prefix of deployed bytecode, `0x` included, capped at 32 characters.
pub fn code_prefix(code: &Bytes) -> String {
    to_hex(code).chars().take(32).collect()
}
