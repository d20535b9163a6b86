//! Small text/number helpers shared by the parsing and search engines.
//!
//! Norwegian clinical text writes decimals with a comma ("2,5 mg"); every
//! numeric parse in the suite goes through these helpers so the comma form
//! is accepted uniformly.

/// Replace decimal commas with dots, leaving everything else untouched.
pub fn normalise_decimal_comma(text: &str) -> String {
    text.replace(',', ".")
}

/// Tolerant float parse: trims, accepts comma decimals, rejects non-finite
/// values. Unparseable input is "no value", never an error.
pub fn parse_flexible_f64(text: &str) -> Option<f64> {
    let cleaned = normalise_decimal_comma(text.trim());
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// True if the token is purely numeric: digits with at most one decimal dot.
pub fn is_numeric_token(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let mut dots = 0;
    for c in token.chars() {
        if c == '.' {
            dots += 1;
            if dots > 1 {
                return false;
            }
        } else if !c.is_ascii_digit() {
            return false;
        }
    }
    token.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_decimals() {
        assert_eq!(parse_flexible_f64("2,5"), Some(2.5));
        assert_eq!(parse_flexible_f64(" 200 "), Some(200.0));
        assert_eq!(parse_flexible_f64("7.5"), Some(7.5));
        assert_eq!(parse_flexible_f64("abc"), None);
        assert_eq!(parse_flexible_f64("NaN"), None);
        assert_eq!(parse_flexible_f64("inf"), None);
    }

    #[test]
    fn numeric_token_shapes() {
        assert!(is_numeric_token("200"));
        assert!(is_numeric_token("7.5"));
        assert!(!is_numeric_token("7.5.1"));
        assert!(!is_numeric_token("mg"));
        assert!(!is_numeric_token("."));
        assert!(!is_numeric_token(""));
    }
}
