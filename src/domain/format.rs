//! Display formatting for on-chain values
//!
//! Every function here is total: malformed input produces a placeholder
//! string (`"NaN"`, `"Invalid Date"`) instead of an error or a panic.

use std::fmt::Display;
use std::str::FromStr;

use alloy_primitives::U256;
use chrono::{DateTime, Local, TimeZone};

const ETHER_DECIMALS: u32 = 18;
const GWEI_DECIMALS: u32 = 9;
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Shorten a wallet address for headers and cards: `0x12345...7890`
pub fn wallet_address(address: &str) -> String {
    shorten(address, 7, 4)
}

/// Shorten a counterparty address in a transaction card: `0x1234...7890`
pub fn format_address(address: &str) -> String {
    shorten(address, 6, 4)
}

pub fn format_hash(hash: &str) -> String {
    shorten(hash, 6, 4)
}

/// Keep `prefix` leading and `suffix` trailing characters joined by `...`.
///
/// Values that already fit (`len <= prefix + suffix`) are returned as is.
pub fn shorten(value: &str, prefix: usize, suffix: usize) -> String {
    let count = value.chars().count();
    if count <= prefix + suffix {
        return value.to_string();
    }
    let head: String = value.chars().take(prefix).collect();
    let tail: String = value.chars().skip(count - suffix).collect();
    format!("{head}...{tail}")
}

/// Wei -> ether with 4 decimals
pub fn format_ether(wei: &str) -> String {
    format_units(wei, ETHER_DECIMALS, 4)
}

/// Wei -> gwei with 2 decimals
pub fn format_gas_price(wei: &str) -> String {
    format_units(wei, GWEI_DECIMALS, 2)
}

/// Divide `raw` by `10^decimals` and render exactly `places` decimals.
///
/// Integers (decimal or `0x` hex) go through 256-bit arithmetic with
/// half-up rounding; anything else is tried as a float.
pub fn format_units(raw: &str, decimals: u32, places: u32) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return format_units("0", decimals, places);
    }
    let places = places.min(decimals);

    if let Ok(value) = U256::from_str(raw) {
        let scale = U256::from(10u64).pow(U256::from(decimals - places));
        let mut scaled = value / scale;
        if value % scale >= scale / U256::from(2u64) && scale > U256::from(1u64) {
            scaled += U256::from(1u64);
        }
        if places == 0 {
            return scaled.to_string();
        }
        let unit = U256::from(10u64).pow(U256::from(places));
        let whole = scaled / unit;
        // frac < 10^places, so it lives entirely in the low limb
        let frac = (scaled % unit).as_limbs()[0];
        return format!("{}.{:0width$}", whole, frac, width = places as usize);
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            let divided = value / 10f64.powi(decimals as i32);
            format!("{:.*}", places as usize, divided)
        }
        _ => "NaN".to_string(),
    }
}

/// RFC 3339 timestamp rendered in the local time zone
pub fn format_date(timestamp: &str) -> String {
    format_date_in(timestamp, &Local)
}

pub fn format_date_in<Tz>(timestamp: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::parse_from_rfc3339(timestamp.trim()) {
        Ok(parsed) => parsed.with_timezone(tz).format(DATE_FORMAT).to_string(),
        Err(_) => "Invalid Date".to_string(),
    }
}

/// Model confidence as a whole percentage in `0..=100`
pub fn confidence_percent(confidence: f64) -> u16 {
    if !confidence.is_finite() {
        return 0;
    }
    (confidence * 100.0).round().clamp(0.0, 100.0) as u16
}

pub fn explorer_tx_url(explorer: &str, hash: &str) -> String {
    format!("{}/tx/{}", explorer.trim_end_matches('/'), hash)
}
