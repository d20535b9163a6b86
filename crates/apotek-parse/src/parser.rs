//! Medication input resolution.
//!
//! Resolution order (first success wins, no backtracking):
//! 1. varenummer match — a 5–7 digit run in the input, looked up against
//!    every variant's identifier list; fixes both product and variant.
//! 2. name match — longest-first against the normalised input.
//!
//! Strength extraction runs independently on the raw input; an explicit
//! in-input strength beats the variant's stored strength text. Combination
//! products (paracetamol/codeine, oxycodone/naloxone) then override the
//! generic extraction with the relevant single component.

use std::sync::OnceLock;

use apotek_common::{Product, Strength};
use regex::Regex;
use serde::Serialize;

use crate::name_index::{normalise_input, ProductNameIndex};
use crate::strength::{
    codeine_component, extract_strength, oxycodone_component, CODEINE_COMBO_ATCS,
    OXYCODONE_COMBO_ATCS,
};

/// Parser output: both sides nullable, recomputed on every input change.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedMedicationInput<'a> {
    pub product: Option<&'a Product>,
    pub strength: Option<Strength>,
}

fn digit_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}

/// First 5–7 digit run in the input, with leading zeros stripped.
fn scan_identifier(raw: &str) -> Option<u64> {
    digit_run_re()
        .find_iter(raw)
        .find(|m| (5..=7).contains(&m.as_str().len()))
        .and_then(|m| m.as_str().parse::<u64>().ok())
}

pub fn parse_medication_input<'a>(
    index: &'a ProductNameIndex,
    raw: &str,
) -> ParsedMedicationInput<'a> {
    let mut product: Option<&Product> = None;
    let mut variant_strength_text: Option<&str> = None;

    if let Some(number) = scan_identifier(raw) {
        if let Some(hit) = index.find_by_number(number) {
            product = Some(hit.product);
            variant_strength_text = hit.variant.strength.as_deref();
        }
    }
    if product.is_none() {
        product = index.find_by_name(&normalise_input(raw));
    }

    // Explicit in-input strength takes precedence over the variant's text.
    let generic = extract_strength(raw)
        .or_else(|| variant_strength_text.and_then(extract_strength));

    let strength = match product {
        Some(p) if CODEINE_COMBO_ATCS.contains(&p.atc.as_str()) => {
            combo_override(codeine_component, raw, variant_strength_text).or(generic)
        }
        Some(p) if OXYCODONE_COMBO_ATCS.contains(&p.atc.as_str()) => {
            combo_override(oxycodone_component, raw, variant_strength_text).or(generic)
        }
        _ => generic,
    };

    ParsedMedicationInput { product, strength }
}

/// Combination overrides try the raw input first, then the variant's stored
/// strength text; the caller falls back to the generic extraction.
fn combo_override(
    rule: fn(&str) -> Option<Strength>,
    raw: &str,
    variant_text: Option<&str>,
) -> Option<Strength> {
    rule(raw).or_else(|| variant_text.and_then(rule))
}
