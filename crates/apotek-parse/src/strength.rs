//! Strength extraction rules.
//!
//! An explicit ordered list of named, pure rules `fn(&str) -> Option<Strength>`
//! keeps the precedence contract testable per rule: the transdermal rate
//! pattern must run before the simple quantity pattern, otherwise
//! "25 mcg/time" would be read as a plain 25 mcg dose.

use std::sync::OnceLock;

use apotek_common::text::parse_flexible_f64;
use apotek_common::{Strength, StrengthUnit};
use regex::Regex;

/// ATC codes of paracetamol/codeine combination analgesics; the codeine
/// component is the second "mg" value in the strength string.
pub const CODEINE_COMBO_ATCS: &[&str] = &["N02AJ06", "N02AA59"];

/// ATC codes of oxycodone/naloxone combination products; the oxycodone
/// component is the first "mg" value in the strength string.
pub const OXYCODONE_COMBO_ATCS: &[&str] = &["N02AA55", "N02AA05"];

fn transdermal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // e.g. "25 mcg/time", "12,5 µg per hour"
        Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(mcg|µg|ug)\s*(?:/|per)\s*(?:h|hour|time)\b").unwrap()
    })
}

fn simple_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(mg|mcg|µg|ug)\b").unwrap()
    })
}

fn second_component_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The value following "/" immediately before "mg": Y in "X mg/Y mg".
    RE.get_or_init(|| Regex::new(r"(?i)/\s*(\d+(?:[.,]\d+)?)\s*mg\b").unwrap())
}

fn first_component_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The first "mg" value preceding "/": X in "X mg/Y mg".
    RE.get_or_init(|| Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*mg\s*/").unwrap())
}

fn microgram_unit(spelling: &str) -> StrengthUnit {
    match spelling.to_lowercase().as_str() {
        "µg" | "ug" => StrengthUnit::Microgram,
        _ => StrengthUnit::Mcg,
    }
}

/// Transdermal delivery rate: `<number> (mcg|µg|ug) (/|per) (h|hour|time)`.
pub fn transdermal_rate(text: &str) -> Option<Strength> {
    let caps = transdermal_re().captures(text)?;
    let value = parse_flexible_f64(&caps[1])?;
    Some(Strength::per_hour(value, microgram_unit(&caps[2])))
}

/// Plain quantity: `<number> (mg|mcg|µg|ug)`.
pub fn simple_quantity(text: &str) -> Option<Strength> {
    let caps = simple_re().captures(text)?;
    let value = parse_flexible_f64(&caps[1])?;
    let unit = match caps[2].to_lowercase().as_str() {
        "mg" => StrengthUnit::Mg,
        other => microgram_unit(other),
    };
    Some(Strength::new(value, unit))
}

/// Generic extraction: rules tried in fixed order, first hit wins.
pub fn extract_strength(text: &str) -> Option<Strength> {
    const RULES: &[fn(&str) -> Option<Strength>] = &[transdermal_rate, simple_quantity];
    RULES.iter().find_map(|rule| rule(text))
}

/// Codeine component of a paracetamol/codeine strength string: the second
/// "mg" value ("500 mg/30 mg" → 30 mg).
pub fn codeine_component(text: &str) -> Option<Strength> {
    let caps = second_component_re().captures(text)?;
    Some(Strength::new(parse_flexible_f64(&caps[1])?, StrengthUnit::Mg))
}

/// Oxycodone component of an oxycodone/naloxone strength string: the first
/// "mg" value ("10 mg/5 mg" → 10 mg).
pub fn oxycodone_component(text: &str) -> Option<Strength> {
    let caps = first_component_re().captures(text)?;
    Some(Strength::new(parse_flexible_f64(&caps[1])?, StrengthUnit::Mg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn transdermal_spellings() {
        assert_eq!(
            transdermal_rate("Durogesic 25 mcg/time"),
            Some(Strength::per_hour(25.0, StrengthUnit::Mcg))
        );
        assert_eq!(
            transdermal_rate("12,5 µg per hour"),
            Some(Strength::per_hour(12.5, StrengthUnit::Microgram))
        );
        assert_eq!(
            transdermal_rate("50 ug/h"),
            Some(Strength::per_hour(50.0, StrengthUnit::Microgram))
        );
        assert_eq!(transdermal_rate("50 mg/time"), None);
        assert_eq!(transdermal_rate("25 mcg"), None);
    }

    #[test]
    fn simple_quantities() {
        assert_eq!(simple_quantity("OxyContin 10 mg"), Some(Strength::new(10.0, StrengthUnit::Mg)));
        assert_eq!(simple_quantity("0,5mg tabletter"), Some(Strength::new(0.5, StrengthUnit::Mg)));
        assert_eq!(
            simple_quantity("Abstral 100 µg"),
            Some(Strength::new(100.0, StrengthUnit::Microgram))
        );
        assert_eq!(simple_quantity("200 mcg"), Some(Strength::new(200.0, StrengthUnit::Mcg)));
        assert_eq!(simple_quantity("to tabletter"), None);
    }

    #[test]
    fn transdermal_takes_precedence() {
        // Without rule ordering this would parse as a bare 25 mcg quantity.
        assert_eq!(
            extract_strength("25 mcg/time"),
            Some(Strength::per_hour(25.0, StrengthUnit::Mcg))
        );
        assert_eq!(extract_strength("10 mg"), Some(Strength::new(10.0, StrengthUnit::Mg)));
    }

    #[test]
    fn combination_components() {
        assert_eq!(
            codeine_component("Paralgin forte 500 mg/30 mg"),
            Some(Strength::new(30.0, StrengthUnit::Mg))
        );
        assert_eq!(
            oxycodone_component("Targiniq 10 mg/5 mg"),
            Some(Strength::new(10.0, StrengthUnit::Mg))
        );
        assert_eq!(
            oxycodone_component("5 mg/2,5 mg"),
            Some(Strength::new(5.0, StrengthUnit::Mg))
        );
        assert_eq!(codeine_component("500 mg"), None);
        assert_eq!(oxycodone_component("500 mg"), None);
    }
}
