//! Search over the shared JSON catalog fixtures, exercising both source
//! mappers and the query rules end to end.

use apotek_search::{FestRow, PimRow, SearchIndex, Source};
use apotek_test_utils::{FEST_ROWS_JSON, PIM_ROWS_JSON};
use pretty_assertions::assert_eq;

fn index() -> SearchIndex {
    let fest: Vec<FestRow> = serde_json::from_str(FEST_ROWS_JSON).unwrap();
    let pim: Vec<PimRow> = serde_json::from_str(PIM_ROWS_JSON).unwrap();
    SearchIndex::build(&fest, &pim)
}

#[test]
fn unmappable_rows_are_skipped_not_fatal() {
    let idx = index();
    // 6 registry rows with one nameless, 3 supplier rows with one numberless.
    assert_eq!(idx.items().len(), 7);
}

#[test]
fn strength_matching_is_exact_not_substring() {
    let idx = index();
    let hits = idx.search("voltaren 75 mg");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "fest:004175");
}

#[test]
fn plain_substance_query_suppresses_combinations() {
    let idx = index();
    let hits = idx.search("kandesartan");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Candesartan Krka");
}

#[test]
fn combination_query_finds_the_combination() {
    let idx = index();
    let hits = idx.search("candesartan/hydrochlorothiazide");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Candesartan/Hydrochlorothiazide Krka");
}

#[test]
fn identifier_search_is_supplier_only_and_exact_first() {
    let idx = index();

    let hits = idx.search("3111");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].source, Source::Pim);
    assert_eq!(hits[0].supplier_number.as_deref(), Some("3111"));

    // Without an exact match, prefix hits are allowed.
    let hits = idx.search("31114");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].supplier_number.as_deref(), Some("311148"));
}

#[test]
fn combination_strength_query_reaches_inhaler() {
    let idx = index();
    let hits = idx.search("symbicort 160/4,5");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Symbicort Turbuhaler");
}

#[test]
fn pasted_registry_line_matches_itself() {
    let idx = index();
    let hits = idx.search("Candesartan Krka 16 mg 98 tabletter");
    assert!(!hits.is_empty());
    assert_eq!(hits[0].name, "Candesartan Krka");
}
