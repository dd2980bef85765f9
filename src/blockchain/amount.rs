//! Smallest-unit to display-unit conversion.
//!
//! The chain reports amounts as integers in units of 10^-18. Conversion is
//! exact: the integer is parsed as a `U256` and the decimal point is placed
//! by alloy's unit formatting, never through floating point.

use alloy::primitives::utils::format_ether;
use alloy::primitives::U256;

/// Decimal places between the smallest unit and the display unit.
pub const SMALLEST_UNIT_DECIMALS: u32 = 18;

/// Convert a base-10 smallest-unit integer into a display decimal string.
///
/// Trailing fractional zeros are trimmed, so `"1000000000000000000"` becomes
/// `"1"` and `"1500000000000000000"` becomes `"1.5"`.
pub fn from_smallest_unit(raw: &str) -> Option<String> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value = U256::from_str_radix(raw, 10).ok()?;
    Some(trim_fraction(format_ether(value)))
}

fn trim_fraction(formatted: String) -> String {
    if !formatted.contains('.') {
        return formatted;
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
