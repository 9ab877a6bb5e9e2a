// src/units.rs
//! Display conversion for decimal-scaled big-integer strings.
//!
//! Market caps and share amounts travel through the whole pipeline as
//! big-integer strings and are only converted at the formatting boundary.
//! The conversion is pure digit-string manipulation so an 18-decimal value
//! never touches a float.

/// Scale factor used by the knowledge graph's monetary fields.
pub const DEFAULT_DECIMALS: u32 = 18;

/// Convert a decimal-scaled integer string into display units.
///
/// `"1000000000000000000"` with 18 decimals becomes `"1.0"`; `"1"` becomes
/// `"0.000000000000000001"`. Trailing zeros in the fraction are trimmed down
/// to a single digit. Returns `None` when the input is not a plain integer
/// (an optional leading `-` is accepted).
pub fn format_units(value: &str, decimals: u32) -> Option<String> {
    let value = value.trim();
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let decimals = decimals as usize;
    // Left-pad so the string always splits into whole + fraction.
    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits.to_string()
    };
    let split = padded.len() - decimals;
    let whole = padded[..split].trim_start_matches('0');
    let whole = if whole.is_empty() { "0" } else { whole };

    let fraction = if decimals == 0 {
        "0".to_string()
    } else {
        let fraction = padded[split..].trim_end_matches('0');
        if fraction.is_empty() {
            "0".to_string()
        } else {
            fraction.to_string()
        }
    };

    let sign = if negative && (whole != "0" || fraction != "0") {
        "-"
    } else {
        ""
    };
    Some(format!("{}{}.{}", sign, whole, fraction))
}

/// Format with the graph's default 18-decimal scaling.
pub fn format_market_cap(value: &str) -> Option<String> {
    format_units(value, DEFAULT_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_token_is_exactly_one() {
        assert_eq!(
            format_units("1000000000000000000", 18).as_deref(),
            Some("1.0")
        );
    }

    #[test]
    fn test_one_wei_is_exact() {
        assert_eq!(
            format_units("1", 18).as_deref(),
            Some("0.000000000000000001")
        );
    }

    #[test]
    fn test_no_precision_loss_on_large_values() {
        // 123456789.000000000000000001 is beyond f64 precision
        assert_eq!(
            format_units("123456789000000000000000001", 18).as_deref(),
            Some("123456789.000000000000000001")
        );
    }

    #[test]
    fn test_trailing_zeros_trimmed() {
        assert_eq!(
            format_units("1500000000000000000", 18).as_deref(),
            Some("1.5")
        );
        assert_eq!(format_units("0", 18).as_deref(), Some("0.0"));
    }

    #[test]
    fn test_zero_decimals() {
        assert_eq!(format_units("42", 0).as_deref(), Some("42.0"));
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_units("-1000000000000000000", 18).as_deref(), Some("-1.0"));
        assert_eq!(format_units("-0", 18).as_deref(), Some("0.0"));
    }

    #[test]
    fn test_rejects_non_integer_input() {
        assert!(format_units("1.5", 18).is_none());
        assert!(format_units("", 18).is_none());
        assert!(format_units("0x10", 18).is_none());
    }
}
