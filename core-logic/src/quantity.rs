//! # Quantity Formatting
//!
//! Fixed-point on-chain amounts rendered as exact decimal strings.
//! All arithmetic is done on digit strings of a `BigUint`, never on floats.

use num_bigint::BigUint;
use num_traits::{Num, Zero};

/// Render `amount / 10^decimals` with the minimum number of digits.
///
/// No exponent notation, no trailing zeros, no trailing decimal point.
///
/// ```
/// use core_logic::quantity::format_quantity;
/// use num_bigint::BigUint;
///
/// assert_eq!(format_quantity(&BigUint::from(1_000_000u64), 6), "1");
/// assert_eq!(format_quantity(&BigUint::from(1_500_000u64), 6), "1.5");
/// ```
pub fn format_quantity(amount: &BigUint, decimals: u32) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let digits = amount.to_str_radix(10);
    let scale = decimals as usize;
    if scale == 0 {
        return digits;
    }

    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
    } else {
        digits
    };

    let (whole, fraction) = padded.split_at(padded.len() - scale);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Convenience wrapper for amounts that fit in a `u64`
pub fn format_units(amount: u64, decimals: u32) -> String {
    format_quantity(&BigUint::from(amount), decimals)
}

/// Inverse of [`format_quantity`]: parse a decimal string back into raw units.
///
/// Returns `None` for malformed input or more fractional digits than `decimals`.
pub fn parse_quantity(value: &str, decimals: u32) -> Option<BigUint> {
    let (whole, fraction) = match value.split_once('.') {
        Some((w, f)) => (w, f),
        None => (value, ""),
    };
    if whole.is_empty() || fraction.len() > decimals as usize {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let padded = format!(
        "{}{}{}",
        whole,
        fraction,
        "0".repeat(decimals as usize - fraction.len())
    );
    BigUint::from_str_radix(&padded, 10).ok()
}

/// Parse a provider hex quantity (`0x`-prefixed or bare). `"0x"` alone is zero.
pub fn parse_hex_amount(value: &str) -> Option<BigUint> {
    let hex = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    if hex.is_empty() {
        return Some(BigUint::zero());
    }
    BigUint::from_str_radix(hex, 16).ok()
}
