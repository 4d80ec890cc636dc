//! Fixed-point price utilities.
//!
//! ## Overview
//!
//! Prices in the book are `u64` values scaled by 10^8. Quantities are plain
//! whole units and are never scaled.
//! Two prices are the same level if and only if their fixed-point values are
//! equal, so level lookup never depends on floating-point tolerance.
//!
//! ## Examples
//!
//! ```
//! use lob_core::types::price::{to_fixed, from_fixed};
//!
//! let price = to_fixed("99.5").unwrap();
//! assert_eq!(price, 9_950_000_000);
//! assert_eq!(from_fixed(price), "99.50000000");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point arithmetic: 10^8
pub const SCALE: u64 = 100_000_000;

/// Largest whole-unit value that can be represented without overflow
pub const MAX_VALUE: u64 = u64::MAX / SCALE;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to fixed-point u64
///
/// Returns `None` if parsing fails, the value is negative, or it does not fit.
///
/// ```
/// use lob_core::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("100"), Some(10_000_000_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point u64, rounding to the nearest tick
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

/// Convert a floating-point price to fixed-point u64
///
/// Callers that carry prices as `f64` (99.5, 100.0, ...) go through here so
/// that every price entering the book is already an exact tick.
///
/// ```
/// use lob_core::types::price::price_from_f64;
///
/// assert_eq!(price_from_f64(99.5), Some(9_950_000_000));
/// assert_eq!(price_from_f64(-1.0), None);
/// assert_eq!(price_from_f64(f64::NAN), None);
/// ```
pub fn price_from_f64(value: f64) -> Option<u64> {
    if !value.is_finite() {
        return None;
    }
    decimal_to_fixed(Decimal::from_f64(value)?)
}

/// Convert fixed-point u64 to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Convert fixed-point u64 to a string with 8 decimal places
///
/// ```
/// use lob_core::types::price::from_fixed;
///
/// assert_eq!(from_fixed(100_000_000), "1.00000000");
/// ```
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

/// Convert fixed-point u64 to a string with trailing zeros trimmed
///
/// ```
/// use lob_core::types::price::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(10_000_000_000), "100");
/// assert_eq!(from_fixed_trimmed(9_950_000_000), "99.5");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    format!("{}", fixed_to_decimal(value).normalize())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_constant() {
        assert_eq!(SCALE, 100_000_000);
        assert_eq!(MAX_VALUE, u64::MAX / 100_000_000);
    }

    #[test]
    fn test_to_fixed_basic() {
        assert_eq!(to_fixed("1.0"), Some(100_000_000));
        assert_eq!(to_fixed("1"), Some(100_000_000));
        assert_eq!(to_fixed("0.5"), Some(50_000_000));
        assert_eq!(to_fixed("99.5"), Some(9_950_000_000));
        assert_eq!(to_fixed("0.00000001"), Some(1));
    }

    #[test]
    fn test_to_fixed_edge_cases() {
        assert_eq!(to_fixed("0"), Some(0));
        assert_eq!(to_fixed("-1.0"), None);
        assert_eq!(to_fixed("abc"), None);
        assert_eq!(to_fixed(""), None);
    }

    #[test]
    fn test_to_fixed_rounds_sub_tick_digits() {
        // 9th decimal place rounds to the nearest tick
        assert_eq!(to_fixed("0.000000014"), Some(1));
        assert_eq!(to_fixed("0.000000016"), Some(2));
    }

    #[test]
    fn test_price_from_f64() {
        assert_eq!(price_from_f64(100.0), Some(10_000_000_000));
        assert_eq!(price_from_f64(99.0), Some(9_900_000_000));
        assert_eq!(price_from_f64(100.01), Some(10_001_000_000));
        assert_eq!(price_from_f64(f64::INFINITY), None);
        assert_eq!(price_from_f64(-0.5), None);
    }

    #[test]
    fn test_price_from_f64_exact_equality() {
        // Same float literal always lands on the same tick
        assert_eq!(price_from_f64(100.0 - 1.0), price_from_f64(99.0));
        assert_ne!(price_from_f64(99.5), price_from_f64(99.0));
    }

    #[test]
    fn test_from_fixed() {
        assert_eq!(from_fixed(100_000_000), "1.00000000");
        assert_eq!(from_fixed(1), "0.00000001");
        assert_eq!(from_fixed(0), "0.00000000");
    }

    #[test]
    fn test_from_fixed_trimmed() {
        assert_eq!(from_fixed_trimmed(100_000_000), "1");
        assert_eq!(from_fixed_trimmed(150_000_000), "1.5");
        assert_eq!(from_fixed_trimmed(123_456_789), "1.23456789");
    }
}
