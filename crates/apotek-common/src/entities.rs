/// Core domain types shared by the parsing, calculation, search and
/// interaction engines. These mirror the static catalog tables the host
/// application loads at startup.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Administration form / route
// ---------------------------------------------------------------------------

/// Administration form as it appears in the product catalog.
/// Serde aliases cover the Norwegian catalog spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Form {
    #[serde(alias = "depotplaster")]
    Patch,
    #[serde(alias = "resoriblett")]
    SublingualTablet,
    #[serde(alias = "sublingvalfilm")]
    SublingualFilm,
    #[serde(alias = "smeltetablett")]
    LyophilisateTablet,
    #[serde(alias = "nesespray")]
    NasalSpray,
    #[serde(alias = "mikstur")]
    Mixture,
    #[serde(alias = "dråper", alias = "draper")]
    Drops,
    #[serde(alias = "kapsel")]
    Capsule,
    #[serde(alias = "tablett")]
    Tablet,
    #[serde(alias = "brusetablett")]
    EffervescentTablet,
    #[serde(alias = "depottablett")]
    ExtendedReleaseTablet,
    #[serde(alias = "stikkpille")]
    Suppository,
    #[serde(alias = "injeksjon")]
    Injection,
    #[serde(other)]
    Other,
}

/// Derived administration route. `Form::Other` maps to no route, which is a
/// terminal state for OMEQ calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Oral,
    Parenteral,
    Transdermal,
    Sublingual,
    Intranasal,
    Rectal,
}

impl Form {
    /// Deterministic form → route mapping.
    pub fn route(self) -> Option<Route> {
        match self {
            Form::Patch => Some(Route::Transdermal),
            Form::SublingualTablet | Form::SublingualFilm | Form::LyophilisateTablet => {
                Some(Route::Sublingual)
            }
            Form::NasalSpray => Some(Route::Intranasal),
            Form::Mixture
            | Form::Drops
            | Form::Capsule
            | Form::Tablet
            | Form::EffervescentTablet
            | Form::ExtendedReleaseTablet => Some(Route::Oral),
            Form::Suppository => Some(Route::Rectal),
            Form::Injection => Some(Route::Parenteral),
            Form::Other => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Strength
// ---------------------------------------------------------------------------

/// Unit of a parsed strength. `Mcg` and `Microgram` are spelling variants of
/// the same unit class (microgram) and must convert identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthUnit {
    Mg,
    Mcg,
    #[serde(rename = "µg")]
    Microgram,
    G,
}

/// A parsed quantity. `per_hour` marks transdermal patch delivery rates
/// (e.g. "25 µg/time"), which are consumed directly rather than converted
/// to a per-dose milligram amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Strength {
    pub value: f64,
    pub unit: StrengthUnit,
    #[serde(default)]
    pub per_hour: bool,
}

impl Strength {
    pub fn new(value: f64, unit: StrengthUnit) -> Self {
        Strength { value, unit, per_hour: false }
    }

    pub fn per_hour(value: f64, unit: StrengthUnit) -> Self {
        Strength { value, unit, per_hour: true }
    }

    /// Convert to milligrams. Per-hour rates and unsupported unit spellings
    /// have no per-dose milligram equivalent and yield `None`.
    pub fn to_mg(&self) -> Option<f64> {
        if self.per_hour || !self.value.is_finite() {
            return None;
        }
        match self.unit {
            StrengthUnit::Mg => Some(self.value),
            StrengthUnit::G => Some(self.value * 1000.0),
            StrengthUnit::Mcg | StrengthUnit::Microgram => Some(self.value / 1000.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Product catalog
// ---------------------------------------------------------------------------

/// A concrete packaging/strength variant of a product, identified by one or
/// more national product numbers (varenummer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Strength as printed in the catalog, e.g. "10 mg" or "5 mg/2,5 mg".
    pub strength: Option<String>,
    #[serde(default)]
    pub product_numbers: Vec<u64>,
}

/// Catalog product entry as stored (several legacy shapes tolerated).
/// Normalised into [`Product`] once at load time so downstream code never
/// branches on shape.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    pub name: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
    pub form: Form,
    #[serde(default)]
    pub variants: Option<Vec<Variant>>,
    // Legacy flat identifier fields, superseded by `variants`.
    #[serde(default)]
    pub product_numbers: Option<Vec<u64>>,
    #[serde(default)]
    pub product_number: Option<u64>,
}

/// Normalised, immutable catalog product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub name: String,
    pub manufacturer: Option<String>,
    pub atc: String,
    pub form: Form,
    pub variants: Vec<Variant>,
}

impl Product {
    /// Migrate a raw catalog entry under a given ATC code. Legacy flat
    /// identifier fields become a single strength-less variant.
    pub fn from_raw(atc: &str, raw: RawProduct) -> Self {
        let variants = if let Some(variants) = raw.variants {
            variants
        } else if let Some(numbers) = raw.product_numbers {
            vec![Variant { strength: None, product_numbers: numbers }]
        } else if let Some(number) = raw.product_number {
            vec![Variant { strength: None, product_numbers: vec![number] }]
        } else {
            Vec::new()
        };
        Product {
            name: raw.name,
            manufacturer: raw.manufacturer,
            atc: atc.to_string(),
            form: raw.form,
            variants,
        }
    }
}

/// The product catalog: ATC code → products, flattened into a stable order
/// at load time.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    /// Build from the static ATC-keyed table.
    pub fn from_raw(table: BTreeMap<String, Vec<RawProduct>>) -> Self {
        let mut products = Vec::new();
        for (atc, entries) in table {
            for raw in entries {
                products.push(Product::from_raw(&atc, raw));
            }
        }
        tracing::info!("product catalog loaded: {} products", products.len());
        ProductCatalog { products }
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        ProductCatalog { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Opioid factor reference table
// ---------------------------------------------------------------------------

/// One row of the static opioid conversion reference table. Several rows may
/// share a substance but differ by route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpioidDefinition {
    pub substance: String,
    pub atc_codes: Vec<String>,
    pub routes: Vec<Route>,
    /// Equianalgesic ratio relative to oral morphine.
    pub factor: f64,
    #[serde(default)]
    pub is_patch: bool,
    #[serde(default)]
    pub is_short_acting: bool,
}

/// Ordered reference table. Row order is a matching-precedence contract and
/// is preserved exactly as loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpioidFactorTable {
    entries: Vec<OpioidDefinition>,
}

impl OpioidFactorTable {
    pub fn new(entries: Vec<OpioidDefinition>) -> Self {
        OpioidFactorTable { entries }
    }

    /// First entry matching (ATC ∈ codes) AND (route ∈ routes).
    pub fn find(&self, atc: &str, route: Route) -> Option<&OpioidDefinition> {
        self.entries
            .iter()
            .find(|e| e.atc_codes.iter().any(|c| c == atc) && e.routes.contains(&route))
    }

    pub fn entries(&self) -> &[OpioidDefinition] {
        &self.entries
    }
}
