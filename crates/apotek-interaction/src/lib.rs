//! apotek-interaction — Drug-interaction index and matcher.
//!
//! Builds an inverted index from substance names and ATC codes (including
//! every code prefix, so a class-level selection reaches all child codes)
//! to interaction records, and matches user-selected terms against it. An
//! interaction is only reported when at least two distinct substance groups
//! are hit: interactions are between substances, never within one group.

pub mod index;
pub mod matcher;
pub mod model;

pub use index::{Entity, InteractionIndex, Occurrence};
pub use matcher::{match_selected_terms, MatchResult};
pub use model::{InteractionRecord, Reference, Relevance, Substance, SubstanceGroup};
