//! Numeric literal extraction
//!
//! Finds the leftmost decimal numeral ("42", "134.12") in free text.
//! Signs, thousands separators and exponents are not interpreted.

use once_cell::sync::Lazy;
use regex::Regex;

/// `None` only if the pattern failed to compile
static DECIMAL_LITERAL: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").ok());

/// Parse the first decimal numeral in `text`.
///
/// Returns `None` for absent or empty input, text without digits, or a
/// numeral that does not parse as a finite `f64`.
pub fn extract_first_number(text: Option<&str>) -> Option<f64> {
    let text = text.filter(|t| !t.is_empty())?;
    let literal = DECIMAL_LITERAL.as_ref()?.find(text)?.as_str();

    match literal.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        Ok(_) => {
            tracing::debug!("Numeral {:?} is too large for a reading", literal);
            None
        }
        Err(e) => {
            tracing::debug!("Numeral {:?} did not parse: {}", literal, e);
            None
        }
    }
}

/// Shorthand for [`extract_first_number`] on a present string
pub fn first_number(text: &str) -> Option<f64> {
    extract_first_number(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer() {
        assert_eq!(first_number("Value is 42"), Some(42.0));
    }

    #[test]
    fn test_decimal_with_unit() {
        assert_eq!(first_number("Glucose is 134.12 mg/dL"), Some(134.12));
    }

    #[test]
    fn test_leftmost_wins() {
        assert_eq!(first_number("Values 56 then 78"), Some(56.0));
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(first_number("No numbers here"), None);
    }

    #[test]
    fn test_absent_and_empty() {
        assert_eq!(extract_first_number(None), None);
        assert_eq!(extract_first_number(Some("")), None);
    }

    #[test]
    fn test_sign_not_interpreted() {
        assert_eq!(first_number("delta -12"), Some(12.0));
    }

    #[test]
    fn test_thousands_separator_not_interpreted() {
        assert_eq!(first_number("1,250 steps"), Some(1.0));
    }

    #[test]
    fn test_trailing_dot_without_digits() {
        assert_eq!(first_number("it was 98."), Some(98.0));
    }

    #[test]
    fn test_exponent_not_interpreted() {
        assert_eq!(first_number("1e5"), Some(1.0));
    }

    #[test]
    fn test_non_ascii_digits_ignored() {
        assert_eq!(first_number("٤٢ then 7"), Some(7.0));
    }

    #[test]
    fn test_idempotent_on_rendered_value() {
        for text in ["Glucose is 134.12 mg/dL", "Value is 42", "x 0.5 y", "007.250"] {
            let first = first_number(text).unwrap();
            assert_eq!(first_number(&first.to_string()), Some(first));
        }
    }

    #[test]
    fn test_overlong_numeral_rejected() {
        let digits = "9".repeat(400);
        assert_eq!(first_number(&format!("glucose {}", digits)), None);
        // the leftmost numeral decides, later ones are not tried
        assert_eq!(first_number(&format!("{} then 90", digits)), None);
    }
}
