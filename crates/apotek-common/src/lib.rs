//! apotek-common — Shared domain types, errors, and text helpers used
//! across all Apotek engine crates.

pub mod error;
pub mod entities;
pub mod text;

// Re-export commonly used types
pub use entities::{
    Form, OpioidDefinition, OpioidFactorTable, Product, ProductCatalog, Route, Strength,
    StrengthUnit, Variant,
};
pub use error::{ApotekError, Result};
