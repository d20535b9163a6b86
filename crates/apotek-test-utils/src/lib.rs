//! Shared fixtures for the Apotek workspace tests: a small but realistic
//! product catalog, the opioid factor reference table, and JSON samples of
//! the registry/supplier/interaction datasets.

use apotek_common::{
    Form, OpioidDefinition, OpioidFactorTable, Product, ProductCatalog, Route, Variant,
};

fn product(name: &str, atc: &str, form: Form, variants: Vec<Variant>) -> Product {
    Product { name: name.into(), manufacturer: None, atc: atc.into(), form, variants }
}

fn variant(strength: &str, numbers: &[u64]) -> Variant {
    Variant { strength: Some(strength.into()), product_numbers: numbers.to_vec() }
}

/// Catalog with the products the end-to-end scenarios exercise.
pub fn product_catalog() -> ProductCatalog {
    ProductCatalog::from_products(vec![
        product(
            "Tramagetic OD",
            "N02AX02",
            Form::ExtendedReleaseTablet,
            vec![variant("200 mg", &[88123]), variant("150 mg", &[88122])],
        ),
        product(
            "Durogesic",
            "N02AB03",
            Form::Patch,
            vec![variant("25 mikrog/time", &[112233]), variant("50 mikrog/time", &[112234])],
        ),
        product(
            "OxyContin",
            "N02AA05",
            Form::ExtendedReleaseTablet,
            vec![variant("10 mg", &[123456]), variant("20 mg", &[123457])],
        ),
        product("Oxycodone", "N02AA05", Form::Capsule, vec![variant("5 mg", &[552211])]),
        product(
            "Oxycodone Comp",
            "N02AA05",
            Form::ExtendedReleaseTablet,
            vec![variant("5 mg/2,5 mg", &[398004])],
        ),
        product(
            "Paralgin forte",
            "N02AJ06",
            Form::Tablet,
            vec![variant("500 mg/30 mg", &[440055])],
        ),
        product("Metadon", "N07BC02", Form::Mixture, vec![variant("2 mg/ml", &[667788])]),
        product("Temgesic", "N02AE01", Form::SublingualTablet, vec![variant("0,2 mg", &[771100])]),
    ])
}

/// The opioid conversion reference table. List order is a matching
/// precedence contract; keep it as published.
pub fn opioid_factor_table() -> OpioidFactorTable {
    let def = |substance: &str,
               atc_codes: &[&str],
               routes: &[Route],
               factor: f64,
               is_patch: bool,
               is_short_acting: bool| OpioidDefinition {
        substance: substance.into(),
        atc_codes: atc_codes.iter().map(|s| s.to_string()).collect(),
        routes: routes.to_vec(),
        factor,
        is_patch,
        is_short_acting,
    };
    OpioidFactorTable::new(vec![
        def("morfin", &["N02AA01"], &[Route::Oral, Route::Rectal], 1.0, false, false),
        def("morfin", &["N02AA01"], &[Route::Parenteral], 3.0, false, false),
        def("oksykodon", &["N02AA05", "N02AA55"], &[Route::Oral], 1.5, false, false),
        def("oksykodon", &["N02AA05"], &[Route::Parenteral], 2.0, false, false),
        def("kodein", &["N02AJ06", "N02AA59", "R05DA04"], &[Route::Oral], 0.1, false, true),
        def("tramadol", &["N02AX02"], &[Route::Oral], 0.15, false, true),
        def("fentanyl", &["N02AB03"], &[Route::Transdermal], 2.4, true, false),
        def("buprenorfin", &["N02AE01"], &[Route::Transdermal], 1.8, true, false),
        def("metadon", &["N07BC02"], &[Route::Parenteral], 4.0, false, false),
    ])
}

/// National registry export sample, shaped like the upstream JSON.
pub const FEST_ROWS_JSON: &str = r#"[
    {"navn": "Candesartan Krka", "varenummer": "083182", "atc": "C09CA06",
     "virkestoff": "kandesartan", "reseptgruppe": "C", "styrke": "16 mg",
     "pakning": "98 tabletter"},
    {"navn": "Candesartan/Hydrochlorothiazide Krka", "varenummer": "083190",
     "atc": "C09DA06", "virkestoff": "kandesartan og hydroklortiazid",
     "reseptgruppe": "C", "styrke": "16 mg/12,5 mg", "pakning": "98 tabletter"},
    {"navn": "Voltaren", "varenummer": "004175", "atc": "M01AB05",
     "virkestoff": "diklofenak", "styrke": "75 mg", "pakning": "20 stk"},
    {"navn": "Voltaren", "varenummer": "004176", "atc": "M01AB05",
     "virkestoff": "diklofenak", "styrke": "7,5 mg", "pakning": "20 stk"},
    {"navn": "Symbicort Turbuhaler", "varenummer": "015672", "atc": "R03AK07",
     "virkestoff": "budesonid og formoterol", "styrke": "160/4,5 mikrog",
     "pakning": "120 doser"},
    {"styrke": "row without a name is skipped"}
]"#;

/// Supplier catalog sample.
pub const PIM_ROWS_JSON: &str = r#"[
    {"navn": "Kompresser sterile 10x10", "varenummer": 3111},
    {"navn": "Kompresser sterile 5x5", "varenummer": 311148,
     "beskrivelse": "100 stk"},
    {"navn": "Row without number"}
]"#;

/// Interaction extract sample: two-group records plus the partial shapes
/// the loader has to tolerate.
pub const INTERACTIONS_JSON: &str = r#"[
    {"id": "ID_WARF_NSAID", "timestamp": "2024-01-15T08:00:00Z",
     "status": "active",
     "relevance": {"code": "1", "text": "Bør unngås"},
     "consequence": "Økt blødningsrisiko.",
     "mechanism": "Platehemming og GI-irritasjon.",
     "handling": "Unngå kombinasjonen.",
     "groups": [
        {"name": "Antikoagulantia",
         "substances": [{"name": "warfarin", "atc": "B01AA03"}]},
        {"name": "NSAID",
         "substances": [{"name": "ibuprofen", "atc": "M01AE01"},
                        {"name": "naproksen", "atc": "M01AE02"}]}
     ]},
    {"id": "ID_OPIOID_BENZO",
     "relevance": {"code": "2", "text": "Ta forholdsregler"},
     "groups": [
        {"name": "Opioider",
         "substances": [{"name": "morfin", "atc": "N02AA01"},
                        {"name": "oksykodon", "atc": "N02AA05"}]},
        {"name": "Benzodiazepiner",
         "substances": [{"name": "diazepam", "atc": "N05BA01"}]}
     ]},
    {"id": "ID_SINGLE_GROUP",
     "groups": [
        {"name": "SSRI",
         "substances": [{"name": "escitalopram", "atc": "N06AB10"},
                        {"name": "sertralin", "atc": "N06AB06"}]}
     ]},
    {"groups": [
        {"substances": [{"name": "johannesurt"}]},
        {"substances": [{"atc": "N06AB10"}, {}]}
     ]}
]"#;
