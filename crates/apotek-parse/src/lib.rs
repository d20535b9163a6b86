//! apotek-parse — Free-text medication input parsing.
//!
//! Turns pasted clinical text ("OxyContin depottab 10 mg", a bare
//! varenummer, "25 mcg/time") into a structured (product, strength) pair
//! against a prebuilt product name index. Absence is represented by `None`
//! on either side; nothing in here throws.

pub mod name_index;
pub mod parser;
pub mod strength;

pub use name_index::ProductNameIndex;
pub use parser::{parse_medication_input, ParsedMedicationInput};
