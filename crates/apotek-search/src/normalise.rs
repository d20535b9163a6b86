//! Search text normalisation and tokenisation.
//!
//! The same pipeline runs over indexed catalog text and over queries, so
//! "Candesartan/HCT 16mg,  120 stk." and a pasted "candesartan 16 mg"
//! normalise into comparable token streams. The pipeline is idempotent:
//! normalising already-normalised text is a no-op.

use std::collections::HashSet;
use std::sync::OnceLock;

use apotek_common::text::is_numeric_token;

/// Packaging/form/route words carrying no search signal.
const NOISE_WORDS: &[&str] = &[
    "stk", "blister", "tablett", "tabletter", "tabl", "kapsel", "kapsler", "depot", "retard",
    "enterotablett", "mikstur", "boks", "endos", "hetteglass", "ampulle", "sprøyte",
];

/// Unit words recognised when classifying (number, unit) pairs.
const UNIT_WORDS: &[&str] = &["mg", "ml", "g", "mcg", "ug", "µg", "mikrogram", "ie"];

/// Words that introduce a pack-size quantity ("120 doser", "98 stk");
/// numeric tokens from there on are pack sizes, not strengths.
const PACK_SIZE_WORDS: &[&str] = &["doser", "dose", "stk", "pakning", "pakninger", "esker"];

fn noise_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| NOISE_WORDS.iter().copied().collect())
}

pub fn is_unit_word(token: &str) -> bool {
    UNIT_WORDS.contains(&token)
}

pub fn is_pack_size_word(token: &str) -> bool {
    PACK_SIZE_WORDS.contains(&token)
}

fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' | '\u{00AD}')
}

fn is_space_punct(c: char) -> bool {
    matches!(
        c,
        'µ' | ','
            | ';'
            | ':'
            | '('
            | ')'
            | '['
            | ']'
            | '{'
            | '}'
            | '/'
            | '\\'
            | '-'
            | '–'
            | '—'
            | '"'
            | '\''
            | '«'
            | '»'
            | '’'
            | '`'
    )
}

/// Merge `digit , digit` into a decimal point so "4,5" and "4.5" agree.
fn merge_decimal_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ','
            && i > 0
            && i + 1 < chars.len()
            && chars[i - 1].is_ascii_digit()
            && chars[i + 1].is_ascii_digit()
        {
            out.push('.');
        } else {
            out.push(c);
        }
    }
    out
}

/// Join a number to a directly following unit word ("200 mg" → "200mg");
/// the boundary-split step below re-separates both spellings identically.
fn close_number_unit_gap(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut out: Vec<String> = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        let unit_next = words
            .get(i + 1)
            .map(|w| is_unit_word(w.trim_end_matches(|c: char| !c.is_alphanumeric())))
            .unwrap_or(false);
        if is_numeric_token(words[i]) && unit_next {
            out.push(format!("{}{}", words[i], words[i + 1]));
            i += 2;
        } else {
            out.push(words[i].to_string());
            i += 1;
        }
    }
    out.join(" ")
}

/// Insert a space at every letter/digit boundary ("200mg" → "200 mg",
/// "b12" → "b 12").
fn split_letter_digit_boundaries(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if let Some(p) = prev {
            let boundary = (p.is_alphabetic() && c.is_ascii_digit())
                || (p.is_ascii_digit() && c.is_alphabetic());
            if boundary {
                out.push(' ');
            }
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Full normalisation pipeline, applied to indexed text and queries alike.
pub fn normalise(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped: String = lowered.chars().filter(|c| !is_zero_width(*c)).collect();
    let decimal = merge_decimal_commas(&stripped);
    let gapless = close_number_unit_gap(&decimal);
    let split = split_letter_digit_boundaries(&gapless);
    let spaced: String = split
        .chars()
        .map(|c| if is_space_punct(c) { ' ' } else { c })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tokenise normalised text: drop noise words, keep tokens of length ≥2 or
/// purely numeric ones, collapse adjacent duplicates (order preserved).
pub fn tokenize(normalised: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in normalised.split(' ') {
        if token.is_empty() || noise_words().contains(token) {
            continue;
        }
        if token.chars().count() < 2 && !is_numeric_token(token) {
            continue;
        }
        if tokens.last().map(String::as_str) != Some(token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}
