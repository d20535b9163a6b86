//! apotek-search — Normalised, tokenised product search over the national
//! drug registry export (FEST) and the supplier catalog (PIM).
//!
//! The index is built once per catalog load and queried per keystroke;
//! queries classify into text/strength/identifier components with exactness
//! rules for numeric tokens (a "75 mg" query must not match "7.5 mg").

pub mod index;
pub mod normalise;
pub mod query;
pub mod sources;

pub use index::{SearchIndex, SearchIndexItem, Source, DEFAULT_MAX_RESULTS};
pub use query::QueryProfile;
pub use sources::{FestRow, PimRow};
