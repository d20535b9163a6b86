//! Calculation against the shared opioid reference table fixture.

use apotek_common::{Strength, StrengthUnit};
use apotek_omeq::{calculate, ReasonCode};
use apotek_test_utils::{opioid_factor_table, product_catalog};
use pretty_assertions::assert_eq;

#[test]
fn null_and_zero_dose_give_missing_input_for_all_non_patches() {
    let factors = opioid_factor_table();
    let strength = Strength::new(10.0, StrengthUnit::Mg);
    for product in product_catalog().products() {
        if product.form == apotek_common::Form::Patch {
            continue;
        }
        for dose in [None, Some(0.0)] {
            let result = calculate(Some(product), dose, Some(&strength), &factors);
            assert_ne!(
                result.reason,
                ReasonCode::Ok,
                "{} must not compute without a dose",
                product.name
            );
            if result.reason == ReasonCode::MissingInput {
                assert_eq!(result.omeq, None);
            }
        }
    }
}

#[test]
fn route_selects_the_reference_row() {
    let factors = opioid_factor_table();
    // Oral oxycodone row (factor 1.5) precedes the parenteral row (2.0);
    // route picks the correct one.
    assert_eq!(factors.find("N02AA05", apotek_common::Route::Oral).unwrap().factor, 1.5);
    assert_eq!(factors.find("N02AA05", apotek_common::Route::Parenteral).unwrap().factor, 2.0);
    // The combination code shares the oral oxycodone row.
    assert_eq!(factors.find("N02AA55", apotek_common::Route::Oral).unwrap().factor, 1.5);
}

#[test]
fn patch_rows_are_flagged() {
    let factors = opioid_factor_table();
    let fentanyl = factors.find("N02AB03", apotek_common::Route::Transdermal).unwrap();
    assert!(fentanyl.is_patch);
    assert_eq!(fentanyl.factor, 2.4);
}
