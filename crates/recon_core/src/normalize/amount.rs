//! Amount and rate parsing.

use crate::types::{Currency, NormalizationError};

/// Characters dropped before tokenising an amount: thousands separators and
/// currency symbols.
const AMOUNT_NOISE: &[char] = &[',', '\'', '_', '\u{a0}', '$', '€', '£', '¥', '₹', '₩'];

fn multiplier(word: &str) -> Option<f64> {
    match word {
        "k" | "thousand" => Some(1e3),
        "m" | "mm" | "mn" | "mio" | "million" | "millions" => Some(1e6),
        "b" | "bn" | "billion" | "billions" => Some(1e9),
        _ => None,
    }
}

fn is_currency_word(word: &str) -> bool {
    Currency::from_alias(word).is_some()
        || (word.len() == 3 && word.chars().all(|c| c.is_ascii_alphabetic()))
}

/// Parses a monetary amount such as `USD 1,000,000.00`, `(2,500)`, `1.5mm`
/// or `EUR 250k`.
///
/// Commas are always thousands separators. Currency codes, names and
/// symbols around the number are ignored.
pub fn parse_amount(raw: &str) -> Result<f64, NormalizationError> {
    let invalid = || NormalizationError::InvalidAmount(raw.trim().to_string());

    let cleaned: String = raw
        .chars()
        .filter(|c| !AMOUNT_NOISE.contains(c))
        .collect::<String>()
        .to_lowercase();
    let mut body = cleaned.trim();

    let mut sign = 1.0;
    if body.starts_with('(') && body.ends_with(')') && body.len() > 2 {
        sign = -1.0;
        body = &body[1..body.len() - 1];
    }

    let mut number: Option<f64> = None;
    let mut scale = 1.0;

    for token in body.split_whitespace() {
        // "usd1000" and "1.5m" both split into an alphabetic and a numeric part.
        let prefix_len = token
            .find(|c: char| !c.is_alphabetic())
            .unwrap_or(token.len());
        let (prefix, rest) = token.split_at(prefix_len);
        let suffix_at = rest.find(|c: char| c.is_alphabetic()).unwrap_or(rest.len());
        let (digits, suffix) = rest.split_at(suffix_at);

        for word in [prefix, suffix] {
            if word.is_empty() {
                continue;
            }
            if let Some(m) = multiplier(word) {
                scale = m;
            } else if !is_currency_word(word) {
                return Err(invalid());
            }
        }

        if !digits.is_empty() {
            if number.is_some() {
                return Err(invalid());
            }
            number = Some(digits.parse::<f64>().map_err(|_| invalid())?);
        }
    }

    let value = number.ok_or_else(invalid)? * scale * sign;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// Parses a rate or price: `4.25%` and `425bp` become `0.0425`, plain
/// numbers are returned as-is.
pub fn parse_rate(raw: &str) -> Result<f64, NormalizationError> {
    let invalid = || NormalizationError::InvalidRate(raw.trim().to_string());

    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect::<String>()
        .to_lowercase();

    let (digits, divisor) = if let Some(head) = compact.strip_suffix('%') {
        (head, 100.0)
    } else if let Some(head) = compact
        .strip_suffix("bps")
        .or_else(|| compact.strip_suffix("bp"))
    {
        (head, 10_000.0)
    } else {
        (compact.as_str(), 1.0)
    };

    let value = digits.parse::<f64>().map_err(|_| invalid())? / divisor;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plain_and_separated_amounts() {
        assert_relative_eq!(parse_amount("1000000").unwrap(), 1_000_000.0);
        assert_relative_eq!(parse_amount("1,000,000.00").unwrap(), 1_000_000.0);
        assert_relative_eq!(parse_amount("1'000'000").unwrap(), 1_000_000.0);
        assert_relative_eq!(parse_amount("999_950.25").unwrap(), 999_950.25);
    }

    #[test]
    fn test_currency_decorations() {
        assert_relative_eq!(parse_amount("USD 1,000,000.00").unwrap(), 1_000_000.0);
        assert_relative_eq!(parse_amount("$1,000,000").unwrap(), 1_000_000.0);
        assert_relative_eq!(parse_amount("1,000,000 EUR").unwrap(), 1_000_000.0);
        assert_relative_eq!(parse_amount("usd1000").unwrap(), 1000.0);
        assert_relative_eq!(parse_amount("€ 250k").unwrap(), 250_000.0);
    }

    #[test]
    fn test_multipliers() {
        assert_relative_eq!(parse_amount("1.5mm").unwrap(), 1_500_000.0);
        assert_relative_eq!(parse_amount("10 million").unwrap(), 10_000_000.0);
        assert_relative_eq!(parse_amount("2bn").unwrap(), 2_000_000_000.0);
    }

    #[test]
    fn test_negative_in_parentheses() {
        assert_relative_eq!(parse_amount("(2,500)").unwrap(), -2500.0);
    }

    #[test]
    fn test_invalid_amounts() {
        for raw in ["n/a", "", "TBD", "12 apples", "1,000 2,000", "USD"] {
            assert!(parse_amount(raw).is_err(), "{} should be rejected", raw);
        }
    }

    #[test]
    fn test_rates() {
        assert_relative_eq!(parse_rate("4.25%").unwrap(), 0.0425);
        assert_relative_eq!(parse_rate("4.25 %").unwrap(), 0.0425);
        assert_relative_eq!(parse_rate("425bp").unwrap(), 0.0425);
        assert_relative_eq!(parse_rate("0.0425").unwrap(), 0.0425);
        assert_relative_eq!(parse_rate("1,250.5").unwrap(), 1250.5);
        assert!(parse_rate("four percent").is_err());
        assert!(parse_rate("%").is_err());
    }
}
