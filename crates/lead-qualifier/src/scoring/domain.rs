use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Stable identifier assigned to a lead at import time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(pub String);

impl LeadId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sales prospect. Every descriptive field is optional free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LeadId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub linkedin_bio: Option<String>,
}

impl Lead {
    /// The six descriptive fields tracked for profile completeness.
    pub fn profile_fields(&self) -> [Option<&str>; 6] {
        [
            self.name.as_deref(),
            self.role.as_deref(),
            self.company.as_deref(),
            self.industry.as_deref(),
            self.location.as_deref(),
            self.linkedin_bio.as_deref(),
        ]
    }
}

/// Product offer leads are qualified against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub name: String,
    #[serde(default, deserialize_with = "string_list_or_empty")]
    pub value_props: Vec<String>,
    #[serde(default, deserialize_with = "string_list_or_empty")]
    pub ideal_use_cases: Vec<String>,
    /// Remaining descriptive attributes, kept verbatim for the classifier prompt.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Offer {
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Null or non-list values read as an empty list; non-string entries are dropped.
fn string_list_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Categorical buying intent.
///
/// `Unknown` never comes out of the label parser; it marks a lead whose
/// classification call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    High,
    Medium,
    Low,
    Unknown,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::High => "High",
            Intent::Medium => "Medium",
            Intent::Low => "Low",
            Intent::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Successful classifier answer for one (lead, offer) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    pub reasoning: String,
}

/// What the orchestrator knows about a lead's intent after the classifier ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationOutcome {
    Classified(Classification),
    Unavailable { reason: String },
}

/// Persisted score for a single lead, denormalized for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub id: LeadId,
    pub name: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub intent: Intent,
    pub score: u8,
    /// Classifier reasoning followed by the two contributing point values.
    pub reasoning: String,
}
