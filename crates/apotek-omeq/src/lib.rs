//! apotek-omeq — Oral-morphine-equivalent (OMEQ) dose calculation.
//!
//! A pure function from (product, daily dose, strength) to either a numeric
//! OMEQ value or a typed reason why no value can be computed. All failure
//! modes are representable values; nothing in here panics or returns `Err`.

pub mod calc;

pub use calc::{calculate, OmeqResult, ReasonCode, METHADONE_ATC};
