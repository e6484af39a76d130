//! Brazilian number normalization (`1.234,56` style).

use rust_decimal::Decimal;
use std::str::FromStr;

/// Longest integer part accepted; longer tokens count as malformed.
pub const MAX_INTEGER_DIGITS: usize = 15;

/// Parse a Brazilian-formatted number (e.g., "1.234,56", "476", "-233,99").
///
/// Dots are thousands separators and are dropped; the comma is the decimal
/// mark. Returns `None` for anything that does not parse after that,
/// including integer parts longer than [`MAX_INTEGER_DIGITS`].
pub fn parse_brazilian_number(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let integer_digits = cleaned
        .split(',')
        .next()
        .map_or(0, |int| int.chars().filter(char::is_ascii_digit).count());
    if integer_digits > MAX_INTEGER_DIGITS {
        return None;
    }

    let normalized = cleaned.replacen(',', ".", 1);
    Decimal::from_str(&normalized).ok()
}

/// Parse a token and apply the credit sign convention, `None` if malformed.
///
/// This is what the field rules run; [`normalize_signed`] is the same
/// conversion with the zero fallback.
pub fn parse_signed(token: &str, force_negative: bool) -> Option<Decimal> {
    parse_brazilian_number(token).map(|value| apply_sign(value, force_negative))
}

/// Normalize an optional token, falling back to zero.
pub fn normalize(token: Option<&str>) -> Decimal {
    normalize_signed(token, false)
}

/// Normalize an optional token; with `force_negative` the result is
/// `-abs(value)` whatever sign the token carried.
pub fn normalize_signed(token: Option<&str>, force_negative: bool) -> Decimal {
    token
        .and_then(|t| parse_signed(t, force_negative))
        .unwrap_or(Decimal::ZERO)
}

/// Apply the credit sign convention. Zero always comes back as plain zero.
pub fn apply_sign(value: Decimal, force_negative: bool) -> Decimal {
    if value.is_zero() {
        Decimal::ZERO
    } else if force_negative {
        -value.abs()
    } else {
        value
    }
}

/// Format a value Brazilian style with two decimals (1.234,56).
pub fn format_brazilian_number(value: Decimal) -> String {
    let s = format!("{:.2}", value.round_dp(2));
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };

    let Some((integer_part, decimal_part)) = digits.split_once('.') else {
        return s;
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{}{},{}", sign, formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Some("1.234,56")), dec("1234.56"));
        assert_eq!(normalize(Some("476")), dec("476"));
        assert_eq!(normalize(Some("58,13")), dec("58.13"));
        assert_eq!(normalize(Some("12.345.678,90")), dec("12345678.90"));
    }

    #[test]
    fn test_absent_or_malformed_is_zero() {
        assert_eq!(normalize(None), Decimal::ZERO);
        assert_eq!(normalize(Some("")), Decimal::ZERO);
        assert_eq!(normalize(Some("1,2,3")), Decimal::ZERO);
        assert_eq!(normalize(Some("abc")), Decimal::ZERO);
    }

    #[test]
    fn test_forced_negation_is_idempotent() {
        let expected = dec("-233.99");
        assert_eq!(normalize_signed(Some("233,99"), true), expected);
        assert_eq!(normalize_signed(Some("-233,99"), true), expected);
        assert_eq!(normalize_signed(Some("- 233,99"), true), expected);
        assert_eq!(normalize_signed(Some("-233,99"), false), expected);
    }

    #[test]
    fn test_forced_negation_of_zero() {
        let zero = normalize_signed(Some("0,00"), true);
        assert!(zero.is_zero());
        assert!(!zero.is_sign_negative());
        assert!(!normalize_signed(None, true).is_sign_negative());
    }

    #[test]
    fn test_oversized_token_is_malformed() {
        let too_long = "79228162514264337593543950335";
        assert_eq!(parse_brazilian_number(too_long), None);
        assert_eq!(parse_brazilian_number("79.228.162.514.264.337.593,00"), None);
        assert_eq!(normalize(Some(too_long)), Decimal::ZERO);

        let widest = "999.999.999.999.999,99";
        assert_eq!(parse_brazilian_number(widest), Some(dec("999999999999999.99")));
    }

    #[test]
    fn test_parse_signed() {
        assert_eq!(parse_signed("233,99", true), Some(dec("-233.99")));
        assert_eq!(parse_signed("51,53", false), Some(dec("51.53")));
        assert_eq!(parse_signed("x", true), None);
    }

    #[test]
    fn test_format_brazilian_number() {
        assert_eq!(format_brazilian_number(dec("1234.56")), "1.234,56");
        assert_eq!(format_brazilian_number(dec("12345678.9")), "12.345.678,90");
        assert_eq!(format_brazilian_number(dec("-233.99")), "-233,99");
        assert_eq!(format_brazilian_number(dec("526")), "526,00");
        assert_eq!(format_brazilian_number(Decimal::ZERO), "0,00");
    }
}
