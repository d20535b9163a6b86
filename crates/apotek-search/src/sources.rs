//! Per-source catalog row shapes and their mapping into the common
//! [`SearchIndexItem`](crate::index::SearchIndexItem) shape.
//!
//! The national registry export (FEST) and the supplier catalog (PIM) are
//! shaped differently; each gets a dedicated mapper, and ids are prefixed
//! by source so the two catalogs can never collide.

use serde::Deserialize;

use crate::index::{SearchIndexItem, Source};
use crate::normalise::{normalise, tokenize};

/// One row of the national drug registry export. Field aliases follow the
/// Norwegian export spelling.
#[derive(Debug, Clone, Deserialize)]
pub struct FestRow {
    #[serde(alias = "navn")]
    pub name: Option<String>,
    #[serde(default, alias = "varenummer")]
    pub product_number: Option<String>,
    #[serde(default)]
    pub atc: Option<String>,
    #[serde(default, alias = "virkestoff")]
    pub substance: Option<String>,
    #[serde(default, alias = "reseptgruppe")]
    pub prescription_group: Option<String>,
    #[serde(default, alias = "styrke")]
    pub strength: Option<String>,
    #[serde(default, alias = "pakning")]
    pub packaging: Option<String>,
}

/// One row of the supplier (PIM) catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct PimRow {
    #[serde(alias = "navn")]
    pub name: Option<String>,
    #[serde(default, alias = "varenummer", alias = "pimNumber")]
    pub item_number: Option<u64>,
    #[serde(default, alias = "beskrivelse")]
    pub description: Option<String>,
}

fn is_combination_text(name: &str, substance: Option<&str>) -> bool {
    let lower = name.to_lowercase();
    if lower.contains('/') || lower.contains(" and ") || lower.contains(" og ") {
        return true;
    }
    substance
        .map(|s| {
            let lower = s.to_lowercase();
            lower.contains('/') || lower.contains(" and ") || lower.contains(" og ")
        })
        .unwrap_or(false)
}

impl FestRow {
    /// Rows without a display name carry no search value and are skipped
    /// (skipped, not rejected — the build never fails).
    pub fn to_item(&self, seq: usize) -> Option<SearchIndexItem> {
        let name = self.name.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        let id = match &self.product_number {
            Some(number) => format!("fest:{number}"),
            None => format!("fest:row{seq}"),
        };
        let raw_text = [
            Some(name),
            self.substance.as_deref(),
            self.strength.as_deref(),
            self.packaging.as_deref(),
            self.atc.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
        let search_text = normalise(&raw_text);
        let tokens = tokenize(&search_text);
        Some(SearchIndexItem {
            id,
            source: Source::Fest,
            name: name.to_string(),
            search_text,
            raw_text,
            tokens,
            atc: self.atc.clone(),
            substance: self.substance.clone(),
            prescription_group: self.prescription_group.clone(),
            supplier_number: None,
            is_combination: is_combination_text(name, self.substance.as_deref()),
        })
    }
}

impl PimRow {
    pub fn to_item(&self) -> Option<SearchIndexItem> {
        let name = self.name.as_deref()?.trim();
        let number = self.item_number?;
        if name.is_empty() {
            return None;
        }
        let raw_text = match self.description.as_deref() {
            Some(desc) => format!("{name} {desc}").to_lowercase(),
            None => name.to_lowercase(),
        };
        let search_text = normalise(&raw_text);
        let tokens = tokenize(&search_text);
        Some(SearchIndexItem {
            id: format!("pim:{number}"),
            source: Source::Pim,
            name: name.to_string(),
            search_text,
            raw_text,
            tokens,
            atc: None,
            substance: None,
            prescription_group: None,
            supplier_number: Some(number.to_string()),
            is_combination: is_combination_text(name, None),
        })
    }
}
