//! OMEQ calculation.
//!
//! The reason codes and their evaluation order are a contract with the
//! presentation layer (each code maps to a localized guidance message);
//! both the set and the order are preserved exactly.

use apotek_common::{Form, OpioidFactorTable, Product, Strength, StrengthUnit};
use serde::{Deserialize, Serialize};

/// ATC code for methadone. Oral methadone is deliberately excluded from
/// calculation: its dose-response is non-linear and a fixed equianalgesic
/// factor would be clinically misleading. Parenteral methadone is not
/// excluded.
pub const METHADONE_ATC: &str = "N07BC02";

/// Why a calculation did (or did not) produce a value.
/// Evaluated in declaration order; the first applicable code wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReasonCode {
    MissingInput,
    NoRoute,
    UnsupportedForm,
    UnsupportedMethadone,
    NoOmeqFactor,
    MissingStrength,
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OmeqResult {
    pub omeq: Option<f64>,
    pub reason: ReasonCode,
}

impl OmeqResult {
    fn none(reason: ReasonCode) -> Self {
        OmeqResult { omeq: None, reason }
    }

    fn value(omeq: f64) -> Self {
        OmeqResult { omeq: Some(omeq), reason: ReasonCode::Ok }
    }
}

/// Compute the oral-morphine-equivalent dose for a resolved product.
///
/// `daily_dose` is the number of dose units taken per day (tablets,
/// capsules, ...); it is ignored for patches, which are dosed by delivery
/// rate. No rounding is applied here — presentation rounds for display.
pub fn calculate(
    product: Option<&Product>,
    daily_dose: Option<f64>,
    strength: Option<&Strength>,
    factors: &OpioidFactorTable,
) -> OmeqResult {
    let Some(product) = product else {
        return OmeqResult::none(ReasonCode::MissingInput);
    };

    let Some(route) = product.form.route() else {
        return OmeqResult::none(ReasonCode::NoRoute);
    };

    if matches!(product.form, Form::SublingualTablet | Form::SublingualFilm) {
        return OmeqResult::none(ReasonCode::UnsupportedForm);
    }

    if product.atc == METHADONE_ATC && route == apotek_common::Route::Oral {
        return OmeqResult::none(ReasonCode::UnsupportedMethadone);
    }

    let Some(def) = factors.find(&product.atc, route) else {
        return OmeqResult::none(ReasonCode::NoOmeqFactor);
    };

    if product.form == Form::Patch {
        // Patches are dosed by delivery rate; the daily dose field is ignored.
        let Some(rate) = patch_rate_mcg_per_hour(strength) else {
            return OmeqResult::none(ReasonCode::MissingStrength);
        };
        return OmeqResult::value(rate * def.factor);
    }

    let Some(strength_mg) = strength.and_then(Strength::to_mg) else {
        return OmeqResult::none(ReasonCode::MissingStrength);
    };
    let dose = match daily_dose {
        Some(d) if d != 0.0 && d.is_finite() => d,
        _ => return OmeqResult::none(ReasonCode::MissingInput),
    };

    OmeqResult::value(dose * strength_mg * def.factor)
}

/// A patch strength is only usable as a µg/hour delivery rate.
fn patch_rate_mcg_per_hour(strength: Option<&Strength>) -> Option<f64> {
    let s = strength?;
    if !s.per_hour || !s.value.is_finite() {
        return None;
    }
    match s.unit {
        StrengthUnit::Mcg | StrengthUnit::Microgram => Some(s.value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apotek_common::{OpioidDefinition, Route, Variant};
    use pretty_assertions::assert_eq;

    fn product(name: &str, atc: &str, form: Form) -> Product {
        Product {
            name: name.into(),
            manufacturer: None,
            atc: atc.into(),
            form,
            variants: vec![Variant { strength: None, product_numbers: vec![] }],
        }
    }

    fn table() -> OpioidFactorTable {
        OpioidFactorTable::new(vec![
            OpioidDefinition {
                substance: "tramadol".into(),
                atc_codes: vec!["N02AX02".into()],
                routes: vec![Route::Oral],
                factor: 0.15,
                is_patch: false,
                is_short_acting: false,
            },
            OpioidDefinition {
                substance: "fentanyl".into(),
                atc_codes: vec!["N02AB03".into()],
                routes: vec![Route::Transdermal],
                factor: 2.4,
                is_patch: true,
                is_short_acting: false,
            },
            OpioidDefinition {
                substance: "metadon".into(),
                atc_codes: vec![METHADONE_ATC.into()],
                routes: vec![Route::Parenteral],
                factor: 4.0,
                is_patch: false,
                is_short_acting: false,
            },
            OpioidDefinition {
                substance: "buprenorfin".into(),
                atc_codes: vec!["N02AE01".into()],
                routes: vec![Route::Sublingual],
                factor: 75.0,
                is_patch: false,
                is_short_acting: false,
            },
        ])
    }

    #[test]
    fn missing_product_wins_first() {
        let r = calculate(None, Some(2.0), None, &table());
        assert_eq!(r.reason, ReasonCode::MissingInput);
        assert_eq!(r.omeq, None);
    }

    #[test]
    fn unmapped_form_has_no_route() {
        let p = product("Ukjent", "N02AX02", Form::Other);
        let r = calculate(Some(&p), Some(2.0), Some(&Strength::new(50.0, StrengthUnit::Mg)), &table());
        assert_eq!(r.reason, ReasonCode::NoRoute);
    }

    #[test]
    fn sublingual_forms_are_unsupported_even_with_factor() {
        // A factor row for sublingual buprenorphine exists; the form check
        // still fires first.
        let p = product("Temgesic", "N02AE01", Form::SublingualTablet);
        let r = calculate(Some(&p), Some(2.0), Some(&Strength::new(0.2, StrengthUnit::Mg)), &table());
        assert_eq!(r.reason, ReasonCode::UnsupportedForm);
    }

    #[test]
    fn oral_methadone_is_excluded_parenteral_is_not() {
        let oral = product("Metadon", METHADONE_ATC, Form::Mixture);
        let r = calculate(Some(&oral), Some(1.0), Some(&Strength::new(20.0, StrengthUnit::Mg)), &table());
        assert_eq!(r.reason, ReasonCode::UnsupportedMethadone);

        let inj = product("Metadon", METHADONE_ATC, Form::Injection);
        let r = calculate(Some(&inj), Some(1.0), Some(&Strength::new(20.0, StrengthUnit::Mg)), &table());
        assert_eq!(r.reason, ReasonCode::Ok);
        assert_eq!(r.omeq, Some(80.0));
    }

    #[test]
    fn unknown_atc_has_no_factor() {
        let p = product("Paracet", "N02BE01", Form::Tablet);
        let r = calculate(Some(&p), Some(3.0), Some(&Strength::new(500.0, StrengthUnit::Mg)), &table());
        assert_eq!(r.reason, ReasonCode::NoOmeqFactor);
    }

    #[test]
    fn tablet_dose_times_strength_times_factor() {
        let p = product("Tramagetic OD", "N02AX02", Form::ExtendedReleaseTablet);
        let s = Strength::new(200.0, StrengthUnit::Mg);
        let r = calculate(Some(&p), Some(2.0), Some(&s), &table());
        assert_eq!(r.reason, ReasonCode::Ok);
        assert_eq!(r.omeq, Some(60.0));
    }

    #[test]
    fn zero_or_missing_daily_dose_is_missing_input() {
        let p = product("Tramagetic OD", "N02AX02", Form::ExtendedReleaseTablet);
        let s = Strength::new(200.0, StrengthUnit::Mg);
        assert_eq!(calculate(Some(&p), None, Some(&s), &table()).reason, ReasonCode::MissingInput);
        assert_eq!(calculate(Some(&p), Some(0.0), Some(&s), &table()).reason, ReasonCode::MissingInput);
    }

    #[test]
    fn tablet_without_convertible_strength() {
        let p = product("Tramagetic OD", "N02AX02", Form::ExtendedReleaseTablet);
        assert_eq!(calculate(Some(&p), Some(2.0), None, &table()).reason, ReasonCode::MissingStrength);
        // A per-hour rate is not convertible to per-dose mg.
        let rate = Strength::per_hour(25.0, StrengthUnit::Mcg);
        assert_eq!(
            calculate(Some(&p), Some(2.0), Some(&rate), &table()).reason,
            ReasonCode::MissingStrength
        );
    }

    #[test]
    fn patch_uses_delivery_rate_and_ignores_dose() {
        let p = product("Durogesic", "N02AB03", Form::Patch);
        let s = Strength::per_hour(25.0, StrengthUnit::Mcg);
        let r = calculate(Some(&p), None, Some(&s), &table());
        assert_eq!(r.reason, ReasonCode::Ok);
        assert_eq!(r.omeq, Some(60.0));

        // A plain mg strength is not a delivery rate.
        let s = Strength::new(25.0, StrengthUnit::Mg);
        let r = calculate(Some(&p), None, Some(&s), &table());
        assert_eq!(r.reason, ReasonCode::MissingStrength);
    }
}
