//! Query classification.
//!
//! A raw query is normalised, tokenised and classified into the components
//! the matcher needs: an optional (number, unit) pair, identifier-length
//! numeric tokens, meaningful text tokens with a required subset, required
//! strength tokens, and an identifier-search flag that restricts matching
//! to the supplier catalog.

use apotek_common::text::is_numeric_token;

use crate::normalise::{is_pack_size_word, is_unit_word, normalise, tokenize};

#[derive(Debug, Clone)]
pub struct QueryProfile {
    /// Normalised query text (used for the verbatim-containment bonus).
    pub normalised: String,
    pub tokens: Vec<String>,
    /// First adjacent (number token, unit token) pair, if any.
    pub number_with_unit: Option<(String, String)>,
    /// Integer tokens of length ≥4 — likely supplier identifiers.
    pub id_number_tokens: Vec<String>,
    /// Non-numeric, non-unit tokens of length ≥4.
    pub meaningful_text_tokens: Vec<String>,
    /// Text tokens every candidate must satisfy.
    pub required_text_tokens: Vec<String>,
    /// Numeric tokens every candidate must match exactly.
    pub required_strength_tokens: Vec<String>,
    /// Identifier-only query: match against the supplier catalog only.
    pub is_likely_id_search: bool,
}

impl QueryProfile {
    pub fn classify(raw_query: &str) -> Self {
        let normalised = normalise(raw_query);
        let tokens = tokenize(&normalised);

        let number_with_unit = tokens.windows(2).find_map(|w| {
            if is_numeric_token(&w[0]) && is_unit_word(&w[1]) {
                Some((w[0].clone(), w[1].clone()))
            } else {
                None
            }
        });

        let id_number_tokens: Vec<String> = tokens
            .iter()
            .filter(|t| is_numeric_token(t) && !t.contains('.') && t.chars().count() >= 4)
            .cloned()
            .collect();

        let meaningful_text_tokens: Vec<String> = tokens
            .iter()
            .filter(|t| {
                !is_numeric_token(t)
                    && !is_unit_word(t)
                    && t.chars().count() >= 4
                    && t.as_str() != "mg"
                    && t.as_str() != "ml"
            })
            .cloned()
            .collect();

        // 1–4 meaningful tokens: require them all. Longer pasted strings
        // get forgiving mode: only the first two are required.
        let required_text_tokens: Vec<String> = match meaningful_text_tokens.len() {
            1..=4 => meaningful_text_tokens.clone(),
            _ => meaningful_text_tokens.iter().take(2).cloned().collect(),
        };

        let is_likely_id_search = !id_number_tokens.is_empty()
            && meaningful_text_tokens.is_empty()
            && number_with_unit.is_none();

        let required_strength_tokens = required_strength_tokens(
            &tokens,
            number_with_unit.as_ref(),
            &id_number_tokens,
            is_likely_id_search,
        );

        QueryProfile {
            normalised,
            tokens,
            number_with_unit,
            id_number_tokens,
            meaningful_text_tokens,
            required_text_tokens,
            required_strength_tokens,
            is_likely_id_search,
        }
    }
}

/// A strength-looking numeric token: short integer or decimal, i.e. not an
/// identifier-length run.
fn is_strength_number(token: &str) -> bool {
    is_numeric_token(token) && (token.contains('.') || token.chars().count() < 4)
}

fn required_strength_tokens(
    tokens: &[String],
    number_with_unit: Option<&(String, String)>,
    id_number_tokens: &[String],
    is_likely_id_search: bool,
) -> Vec<String> {
    // Prefer the number half of an explicit (number, unit) pair.
    if let Some((number, _)) = number_with_unit {
        return vec![number.clone()];
    }

    // First two distinct strength-looking numbers scanned up to (not
    // including) a pack-size word: keeps "160/4.5" apart from "120 doser".
    let mut found: Vec<String> = Vec::new();
    for token in tokens {
        if is_pack_size_word(token) {
            break;
        }
        if is_strength_number(token) && !found.contains(token) {
            found.push(token.clone());
            if found.len() == 2 {
                break;
            }
        }
    }
    if !found.is_empty() {
        return found;
    }

    // Lone decimal, then lone integer (unless this is an identifier search).
    let numeric: Vec<&String> = tokens.iter().filter(|t| is_numeric_token(t)).collect();
    if numeric.len() == 1 {
        let lone = numeric[0];
        if lone.contains('.') {
            return vec![lone.clone()];
        }
        if !is_likely_id_search && !id_number_tokens.contains(lone) {
            return vec![lone.clone()];
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn number_with_unit_pair() {
        let p = QueryProfile::classify("candesartan 16 mg");
        assert_eq!(p.number_with_unit, Some(("16".into(), "mg".into())));
        assert_eq!(p.required_strength_tokens, vec!["16"]);
        assert_eq!(p.required_text_tokens, vec!["candesartan"]);
        assert!(!p.is_likely_id_search);
    }

    #[test]
    fn combination_strength_before_pack_size() {
        let p = QueryProfile::classify("seretide 160/4,5 120 doser");
        // "160" and "4.5" are strengths; "120" sits behind "doser"... and the
        // scan takes at most two distinct numbers anyway.
        assert_eq!(p.required_strength_tokens, vec!["160", "4.5"]);
    }

    #[test]
    fn pack_size_word_stops_the_scan() {
        let p = QueryProfile::classify("ventoline 120 doser");
        assert_eq!(p.required_strength_tokens, vec!["120"]);
        // Behind the pack-size word the scan finds nothing, but the lone
        // integer fallback still applies.
        let p = QueryProfile::classify("ventoline doser 120");
        assert_eq!(p.required_strength_tokens, vec!["120"]);
    }

    #[test]
    fn identifier_only_query() {
        let p = QueryProfile::classify("311148");
        assert!(p.is_likely_id_search);
        assert_eq!(p.id_number_tokens, vec!["311148"]);
        assert_eq!(p.required_strength_tokens, Vec::<String>::new());
    }

    #[test]
    fn id_tokens_with_text_are_not_an_id_search() {
        let p = QueryProfile::classify("paracet 500234");
        assert!(!p.is_likely_id_search);
        assert_eq!(p.required_text_tokens, vec!["paracet"]);
    }

    #[test]
    fn forgiving_mode_for_long_pasted_strings() {
        let p = QueryProfile::classify("candesartan hydroklortiazid krka filmdrasjerte lange tekster");
        assert_eq!(p.meaningful_text_tokens.len(), 6);
        assert_eq!(p.required_text_tokens.len(), 2);
        assert_eq!(p.required_text_tokens, vec!["candesartan", "hydroklortiazid"]);
    }

    #[test]
    fn lone_decimal_token_is_a_strength() {
        let p = QueryProfile::classify("7.5");
        assert_eq!(p.required_strength_tokens, vec!["7.5"]);
    }
}
