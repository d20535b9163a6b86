//! Product name index: varenummer → variant lookup plus longest-first
//! product name matching.
//!
//! Build once per catalog load; share by reference with the query path.

use std::collections::HashMap;

use apotek_common::{Product, ProductCatalog, Variant};
use regex::Regex;

/// A resolved identifier hit: the product plus the specific variant whose
/// number list contained the identifier. The variant pins down the strength
/// when one product name spans several strengths/forms.
#[derive(Debug, Clone, Copy)]
pub struct VariantHit<'a> {
    pub product: &'a Product,
    pub variant: &'a Variant,
}

pub struct ProductNameIndex {
    catalog: ProductCatalog,
    /// varenummer (leading zeros stripped) → (product index, variant index).
    by_number: HashMap<u64, (usize, usize)>,
    /// Product indices ordered by name length descending, with the
    /// precompiled word-boundary pattern for each lowercased name.
    name_order: Vec<(usize, Regex, String)>,
}

impl ProductNameIndex {
    pub fn build(catalog: ProductCatalog) -> Self {
        let mut by_number = HashMap::new();
        for (pi, product) in catalog.products().iter().enumerate() {
            for (vi, variant) in product.variants.iter().enumerate() {
                for &number in &variant.product_numbers {
                    // First registration wins; duplicate numbers across the
                    // catalog are a data defect we tolerate silently.
                    by_number.entry(number).or_insert((pi, vi));
                }
            }
        }

        let mut name_order: Vec<(usize, Regex, String)> = catalog
            .products()
            .iter()
            .enumerate()
            .map(|(pi, product)| {
                let lower = product.name.to_lowercase();
                let pattern = format!(r"\b{}\b", regex::escape(&lower));
                let re = Regex::new(&pattern).expect("escaped literal pattern compiles");
                (pi, re, lower)
            })
            .collect();
        // Longest name first so "OxyContin" is tested before "Oxycodone"
        // never the other way round on a shared prefixless substring.
        name_order.sort_by(|a, b| b.2.len().cmp(&a.2.len()));

        tracing::info!(
            "product name index built: {} products, {} identifiers",
            catalog.products().len(),
            by_number.len()
        );

        ProductNameIndex { catalog, by_number, name_order }
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    /// Exact varenummer lookup (leading zeros already stripped by parsing
    /// the digit run as a number).
    pub fn find_by_number(&self, number: u64) -> Option<VariantHit<'_>> {
        let &(pi, vi) = self.by_number.get(&number)?;
        let product = &self.catalog.products()[pi];
        Some(VariantHit { product, variant: &product.variants[vi] })
    }

    /// Longest-first name match against a normalised input string: a full
    /// word-boundary pass first, then a plain substring pass.
    pub fn find_by_name(&self, normalised_input: &str) -> Option<&Product> {
        for (pi, re, lower) in &self.name_order {
            if !lower.is_empty() && re.is_match(normalised_input) {
                return Some(&self.catalog.products()[*pi]);
            }
        }
        for (pi, _, lower) in &self.name_order {
            if !lower.is_empty() && normalised_input.contains(lower.as_str()) {
                return Some(&self.catalog.products()[*pi]);
            }
        }
        None
    }
}

/// Input normalisation for name matching: lowercase, strip parentheses and
/// commas, collapse whitespace.
pub fn normalise_input(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let stripped: String = lowered
        .chars()
        .map(|c| if matches!(c, '(' | ')' | ',') { ' ' } else { c })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use apotek_common::Form;
    use pretty_assertions::assert_eq;

    fn catalog() -> ProductCatalog {
        let mk = |name: &str, atc: &str, form: Form, variants: Vec<Variant>| Product {
            name: name.into(),
            manufacturer: None,
            atc: atc.into(),
            form,
            variants,
        };
        ProductCatalog::from_products(vec![
            mk(
                "Oxycodone",
                "N02AA05",
                Form::Capsule,
                vec![Variant { strength: Some("5 mg".into()), product_numbers: vec![31114] }],
            ),
            mk(
                "OxyContin",
                "N02AA05",
                Form::ExtendedReleaseTablet,
                vec![
                    Variant { strength: Some("10 mg".into()), product_numbers: vec![123456] },
                    Variant { strength: Some("20 mg".into()), product_numbers: vec![123457] },
                ],
            ),
        ])
    }

    #[test]
    fn longest_name_wins_over_shorter() {
        let index = ProductNameIndex::build(catalog());
        let hit = index.find_by_name(&normalise_input("OxyContin 10mg")).unwrap();
        assert_eq!(hit.name, "OxyContin");
    }

    #[test]
    fn identifier_lookup_pins_the_variant() {
        let index = ProductNameIndex::build(catalog());
        let hit = index.find_by_number(123457).unwrap();
        assert_eq!(hit.product.name, "OxyContin");
        assert_eq!(hit.variant.strength.as_deref(), Some("20 mg"));
        assert!(index.find_by_number(999999).is_none());
    }

    #[test]
    fn normalisation_strips_parens_and_commas() {
        assert_eq!(normalise_input("OxyContin (Mundipharma), depottab"), "oxycontin mundipharma depottab");
    }

    #[test]
    fn substring_fallback_when_no_word_boundary() {
        let index = ProductNameIndex::build(catalog());
        // Name glued to surrounding text defeats the boundary pass but not
        // the substring pass.
        let hit = index.find_by_name("xoxycontinx").unwrap();
        assert_eq!(hit.name, "OxyContin");
    }
}
