//! Interaction dataset model.
//!
//! The regulatory extract is loosely shaped: nearly every field can be
//! missing or empty. All tolerance lives here, in one normalisation step at
//! the ingestion boundary; the index and matcher downstream work on fully
//! typed records and never guard against shape.

use apotek_common::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Relevance descriptor: a severity-ish code plus display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relevance {
    pub code: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A (substance name, ATC code) pair. Either side may be absent; a pair
/// with neither is ignored at indexing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substance {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub atc: Option<String>,
}

/// A named cluster of substances within one interaction. The clinical
/// meaning of an interaction requires at least two groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstanceGroup {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub substances: Vec<Substance>,
}

/// Normalised interaction record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionRecord {
    pub id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub relevance: Option<Relevance>,
    pub consequence: Option<String>,
    pub mechanism: Option<String>,
    pub handling: Option<String>,
    pub display_rules: Vec<String>,
    pub references: Vec<Reference>,
    pub groups: Vec<SubstanceGroup>,
}

/// Wire shape of one record in the extract. Every field is optional;
/// a record is never rejected wholesale for partial data.
#[derive(Debug, Clone, Deserialize)]
pub struct RawInteraction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "updated")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub relevance: Option<Relevance>,
    #[serde(default, alias = "clinical_consequence")]
    pub consequence: Option<String>,
    #[serde(default)]
    pub mechanism: Option<String>,
    #[serde(default, alias = "management")]
    pub handling: Option<String>,
    #[serde(default)]
    pub display_rules: Vec<String>,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default, alias = "substance_groups")]
    pub groups: Vec<SubstanceGroup>,
}

impl RawInteraction {
    /// Normalise one raw record. `seq` supplies a fallback id for records
    /// the extract shipped without one.
    pub fn normalise(self, seq: usize) -> InteractionRecord {
        let timestamp = self.timestamp.as_deref().and_then(|t| {
            DateTime::parse_from_rfc3339(t).ok().map(|dt| dt.with_timezone(&Utc))
        });
        if self.id.is_none() {
            tracing::debug!("interaction record {seq} has no id, using sequence number");
        }
        InteractionRecord {
            id: self.id.unwrap_or_else(|| format!("interaction-{seq}")),
            timestamp,
            status: self.status,
            relevance: self.relevance,
            consequence: self.consequence,
            mechanism: self.mechanism,
            handling: self.handling,
            display_rules: self.display_rules,
            references: self.references,
            groups: self.groups,
        }
    }
}

/// Parse the full extract. The only error here is malformed JSON at the
/// document level; partial records inside a well-formed document are
/// tolerated field by field.
pub fn records_from_json(json: &str) -> Result<Vec<InteractionRecord>> {
    let raw: Vec<RawInteraction> = serde_json::from_str(json)?;
    Ok(raw.into_iter().enumerate().map(|(seq, r)| r.normalise(seq)).collect())
}
