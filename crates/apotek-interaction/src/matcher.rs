//! Matching user-selected terms against the interaction index.
//!
//! Each selected term is either a substance label or an ATC code/prefix.
//! Occurrences accumulate per interaction into the set of distinct
//! substance-group indices hit; only interactions with hits in at least two
//! distinct groups are reported, in original dataset order.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::index::{is_atc_shaped, normalise_atc, normalise_name, InteractionIndex, Occurrence};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub interaction_index: usize,
    /// Distinct group indices hit, ascending.
    pub matched_groups: Vec<usize>,
    /// Which selected terms (as given by the caller) hit each group.
    pub group_terms: BTreeMap<usize, Vec<String>>,
}

pub fn match_selected_terms(index: &InteractionIndex, selected: &[String]) -> Vec<MatchResult> {
    // interaction → group → selected terms that hit it.
    let mut hits: BTreeMap<usize, BTreeMap<usize, BTreeSet<String>>> = BTreeMap::new();

    for raw_term in selected {
        let atc_shaped = is_atc_shaped(raw_term);
        let term =
            if atc_shaped { normalise_atc(raw_term) } else { normalise_name(raw_term) };
        if term.is_empty() {
            continue;
        }

        let direct = index.occurrences_for_term(&term);
        let fallback: Vec<&Occurrence>;
        let occurrences: &[&Occurrence] = match direct {
            Some(occs) => {
                fallback = occs.iter().collect();
                &fallback
            }
            // Safety net for an incomplete prefix table: linear scan for
            // ATC-prefix containment.
            None if atc_shaped => {
                fallback = index
                    .all_occurrences()
                    .iter()
                    .filter(|o| {
                        o.atc.as_deref().map(|a| a.starts_with(term.as_str())).unwrap_or(false)
                    })
                    .collect();
                &fallback
            }
            None => continue,
        };

        for occ in occurrences {
            hits.entry(occ.interaction_index)
                .or_default()
                .entry(occ.group_index)
                .or_default()
                .insert(raw_term.clone());
        }
    }

    hits.into_iter()
        .filter(|(_, groups)| groups.len() >= 2)
        .map(|(interaction_index, groups)| MatchResult {
            interaction_index,
            matched_groups: groups.keys().copied().collect(),
            group_terms: groups
                .into_iter()
                .map(|(g, terms)| (g, terms.into_iter().collect()))
                .collect(),
        })
        .collect()
}
