//! Inverted interaction index.
//!
//! Terms are normalised substance names and every non-empty prefix of each
//! normalised ATC code: indexing "N02AA01" under "N", "N0", "N02", ...
//! makes a class-level selection ("N02A") retrieve all interactions
//! involving any child code. Built once per dataset load, read-only after.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::model::InteractionRecord;

/// A deduplicated autocomplete entity. Identity is the ATC code when
/// present, else the normalised substance name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub key: String,
    pub label: String,
    pub atc: Option<String>,
}

/// One place a term occurs: which interaction, which substance group
/// within it, and under what identity/label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub interaction_index: usize,
    pub group_index: usize,
    pub key: String,
    pub atc: Option<String>,
    pub label: String,
}

pub struct InteractionIndex {
    records: Vec<InteractionRecord>,
    entities: Vec<Entity>,
    terms: HashMap<String, Vec<Occurrence>>,
    /// Flat occurrence list for the linear ATC-prefix fallback scan.
    occurrences: Vec<Occurrence>,
}

/// Normalise a substance name for use as a term: lowercase, trimmed,
/// single-spaced.
pub fn normalise_name(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalise an ATC code or prefix: uppercase, whitespace compacted away.
pub fn normalise_atc(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_uppercase()
}

/// ATC codes and their prefixes start with a letter followed by digits
/// ("N", "N0", "N02", "N02A", ..., "N02AA01"); substance names do not.
pub fn is_atc_shaped(term: &str) -> bool {
    let compact = normalise_atc(term);
    let mut chars = compact.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() || compact.len() > 7 {
        return false;
    }
    match chars.next() {
        None => true,
        Some(second) => second.is_ascii_digit() && compact.chars().all(|c| c.is_ascii_alphanumeric()),
    }
}

impl InteractionIndex {
    pub fn build(records: Vec<InteractionRecord>) -> Self {
        let mut entities: Vec<Entity> = Vec::new();
        let mut seen_keys: HashMap<String, ()> = HashMap::new();
        let mut terms: HashMap<String, Vec<Occurrence>> = HashMap::new();
        let mut occurrences: Vec<Occurrence> = Vec::new();

        for (ii, record) in records.iter().enumerate() {
            for (gi, group) in record.groups.iter().enumerate() {
                for substance in &group.substances {
                    let atc = substance.atc.as_deref().map(normalise_atc).filter(|a| !a.is_empty());
                    let name = substance
                        .name
                        .as_deref()
                        .map(normalise_name)
                        .filter(|n| !n.is_empty());
                    let label = substance
                        .name
                        .clone()
                        .or_else(|| atc.clone())
                        .unwrap_or_default();
                    let Some(key) = atc.clone().or_else(|| name.clone()) else {
                        // Neither name nor code: nothing to index, skip the
                        // pair but keep the record.
                        continue;
                    };

                    if let Entry::Vacant(e) = seen_keys.entry(key.clone()) {
                        e.insert(());
                        entities.push(Entity {
                            key: key.clone(),
                            label: label.clone(),
                            atc: atc.clone(),
                        });
                    }

                    let occurrence = Occurrence {
                        interaction_index: ii,
                        group_index: gi,
                        key,
                        atc: atc.clone(),
                        label,
                    };
                    occurrences.push(occurrence.clone());

                    if let Some(name) = &name {
                        terms.entry(name.clone()).or_default().push(occurrence.clone());
                    }
                    if let Some(atc) = &atc {
                        // ATC codes are ASCII; anything else is indexed
                        // whole rather than sliced at char boundaries.
                        if atc.is_ascii() {
                            for len in 1..=atc.len() {
                                terms
                                    .entry(atc[..len].to_string())
                                    .or_default()
                                    .push(occurrence.clone());
                            }
                        } else {
                            terms.entry(atc.clone()).or_default().push(occurrence.clone());
                        }
                    }
                }
            }
        }

        entities.sort_by(|a, b| compare_no(&a.label, &b.label));

        tracing::info!(
            "interaction index built: {} records, {} entities, {} terms",
            records.len(),
            entities.len(),
            terms.len()
        );

        InteractionIndex { records, entities, terms, occurrences }
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    /// Autocomplete entities, sorted by label (Norwegian collation).
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn occurrences_for_term(&self, term: &str) -> Option<&[Occurrence]> {
        self.terms.get(term).map(Vec::as_slice)
    }

    pub fn all_occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }
}

/// Norwegian-aware label comparison: æ, ø, å collate after z. The dataset
/// labels are Norwegian, so a full collation library is not warranted.
fn collate_char(c: char) -> u32 {
    match c {
        'æ' => 'z' as u32 + 1,
        'ø' => 'z' as u32 + 2,
        'å' => 'z' as u32 + 3,
        _ => c as u32,
    }
}

pub fn compare_no(a: &str, b: &str) -> std::cmp::Ordering {
    let ka = a.to_lowercase();
    let kb = b.to_lowercase();
    ka.chars().map(collate_char).cmp(kb.chars().map(collate_char))
}
