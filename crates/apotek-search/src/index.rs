//! The search index and its scored matcher.
//!
//! Build once per catalog load; `search` runs per keystroke. Exclusion is
//! strict (every required token must be satisfied), scoring is additive,
//! ties keep catalog order, and two cleanup rules run after scoring:
//! combination-product suppression and identifier-search exactness.

use serde::Serialize;

use crate::query::QueryProfile;
use apotek_common::text::is_numeric_token;

pub const DEFAULT_MAX_RESULTS: usize = 25;

// Score weights.
const NUMERIC_TOKEN_MATCH: i32 = 2;
const TEXT_TOKEN_MATCH: i32 = 1;
const REQUIRED_TEXT_BONUS: i32 = 3;
const REQUIRED_STRENGTH_BONUS: i32 = 3;
const ID_EXACT_BONUS: i32 = 20;
const ID_PREFIX_BONUS: i32 = 10;
const COMBINATION_STRENGTH_BONUS: i32 = 4;
const VERBATIM_QUERY_BONUS: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Fest,
    Pim,
}

/// Normalised, source-tagged catalog row. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct SearchIndexItem {
    /// Source-prefixed unique id ("fest:083182", "pim:311148").
    pub id: String,
    pub source: Source,
    pub name: String,
    /// Pre-normalised concatenation of all searchable fields.
    pub search_text: String,
    /// Lowercased original text, kept for the combination-strength bonus
    /// ("160/4.5" only reads as a combination in the unnormalised text).
    pub raw_text: String,
    pub tokens: Vec<String>,
    pub atc: Option<String>,
    pub substance: Option<String>,
    pub prescription_group: Option<String>,
    pub supplier_number: Option<String>,
    pub is_combination: bool,
}

pub struct SearchIndex {
    items: Vec<SearchIndexItem>,
}

struct Candidate<'a> {
    item: &'a SearchIndexItem,
    score: i32,
    exact_id: bool,
}

impl SearchIndex {
    /// Build from both catalogs. Rows that cannot be mapped are skipped,
    /// never rejected wholesale.
    pub fn build(fest: &[crate::sources::FestRow], pim: &[crate::sources::PimRow]) -> Self {
        let mut items: Vec<SearchIndexItem> = Vec::with_capacity(fest.len() + pim.len());
        for (seq, row) in fest.iter().enumerate() {
            if let Some(item) = row.to_item(seq) {
                items.push(item);
            }
        }
        for row in pim {
            if let Some(item) = row.to_item() {
                items.push(item);
            }
        }
        tracing::info!(
            "search index built: {} items ({} registry rows, {} supplier rows)",
            items.len(),
            fest.len(),
            pim.len()
        );
        SearchIndex { items }
    }

    pub fn from_items(items: Vec<SearchIndexItem>) -> Self {
        SearchIndex { items }
    }

    pub fn items(&self) -> &[SearchIndexItem] {
        &self.items
    }

    pub fn search(&self, raw_query: &str) -> Vec<&SearchIndexItem> {
        self.search_with_max(raw_query, DEFAULT_MAX_RESULTS)
    }

    pub fn search_with_max(&self, raw_query: &str, max: usize) -> Vec<&SearchIndexItem> {
        let profile = QueryProfile::classify(raw_query);
        if profile.tokens.is_empty() {
            return Vec::new();
        }
        let query_is_combination =
            raw_query.contains('/') || raw_query.to_lowercase().contains(" and ");

        let mut candidates: Vec<Candidate<'_>> = self
            .items
            .iter()
            .filter_map(|item| score_candidate(item, &profile))
            .collect();

        // Identifier-search exactness: when any exact identifier match
        // exists, prefix matches are dropped entirely.
        if profile.is_likely_id_search && candidates.iter().any(|c| c.exact_id) {
            candidates.retain(|c| c.exact_id);
        }

        // Combination suppression: a plain query with at least one
        // non-combination hit drops combination products from the list.
        // Never applied to identifier searches, where "/" can legitimately
        // sit inside a strength string.
        if !query_is_combination
            && !profile.is_likely_id_search
            && candidates.iter().any(|c| !c.item.is_combination)
        {
            candidates.retain(|c| !c.item.is_combination);
        }

        // Stable: ties keep catalog order.
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates.truncate(max);
        candidates.into_iter().map(|c| c.item).collect()
    }
}

fn score_candidate<'a>(item: &'a SearchIndexItem, profile: &QueryProfile) -> Option<Candidate<'a>> {
    if profile.is_likely_id_search {
        return score_id_candidate(item, profile);
    }

    // Exclusion: every required text token must match (prefix for
    // alphabetic terms, exact for numeric), every required strength token
    // exactly.
    for term in &profile.required_text_tokens {
        let ok = if is_numeric_token(term) {
            item.tokens.iter().any(|t| t == term)
        } else {
            item.tokens.iter().any(|t| t.starts_with(term.as_str()))
        };
        if !ok {
            return None;
        }
    }
    for term in &profile.required_strength_tokens {
        if !item.tokens.iter().any(|t| t == term) {
            return None;
        }
    }

    let mut score = 0;
    for token in &profile.tokens {
        if is_numeric_token(token) {
            if item.tokens.iter().any(|t| t == token) {
                score += NUMERIC_TOKEN_MATCH;
            }
        } else if item.search_text.contains(token.as_str()) {
            score += TEXT_TOKEN_MATCH;
        }
    }
    score += REQUIRED_TEXT_BONUS * profile.required_text_tokens.len() as i32;
    score += REQUIRED_STRENGTH_BONUS * profile.required_strength_tokens.len() as i32;

    // Identifier bonuses also apply in mixed queries.
    let mut exact_id = false;
    if let Some(number) = &item.supplier_number {
        for token in &profile.id_number_tokens {
            if token == number {
                score += ID_EXACT_BONUS;
                exact_id = true;
            } else if number.starts_with(token.as_str()) {
                score += ID_PREFIX_BONUS;
            }
        }
    }

    // A single required strength immediately followed by "/" in the raw
    // candidate text marks a combination strength ("80/4.5") the query
    // under-specified.
    if let [strength] = profile.required_strength_tokens.as_slice() {
        let dotted = format!("{strength}/");
        let comma = format!("{}/", strength.replace('.', ","));
        if item.raw_text.contains(&dotted) || item.raw_text.contains(&comma) {
            score += COMBINATION_STRENGTH_BONUS;
        }
    }

    if profile.normalised.chars().count() >= 8 && item.search_text.contains(&profile.normalised) {
        score += VERBATIM_QUERY_BONUS;
    }

    // A query with nothing required still has to touch the candidate
    // somewhere; otherwise every short query would return the whole catalog.
    if score == 0
        && profile.required_text_tokens.is_empty()
        && profile.required_strength_tokens.is_empty()
    {
        return None;
    }

    Some(Candidate { item, score, exact_id })
}

/// Identifier-only mode: supplier catalog only, every identifier token must
/// start or equal the candidate's number.
fn score_id_candidate<'a>(
    item: &'a SearchIndexItem,
    profile: &QueryProfile,
) -> Option<Candidate<'a>> {
    let number = item.supplier_number.as_deref()?;
    let mut score = 0;
    let mut exact_id = false;
    for token in &profile.id_number_tokens {
        if token == number {
            score += ID_EXACT_BONUS;
            exact_id = true;
        } else if number.starts_with(token.as_str()) {
            score += ID_PREFIX_BONUS;
        } else {
            return None;
        }
    }
    Some(Candidate { item, score, exact_id })
}
