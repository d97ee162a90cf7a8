//! Deterministic rule layer, worth at most 50 points.

use serde::{Deserialize, Serialize};

use super::domain::Lead;

pub const DECISION_MAKER_POINTS: u8 = 20;
pub const INFLUENCER_POINTS: u8 = 10;
pub const INDUSTRY_EXACT_POINTS: u8 = 20;
pub const INDUSTRY_ADJACENT_POINTS: u8 = 10;
pub const COMPLETENESS_POINTS: u8 = 10;

const DECISION_MAKER_KEYWORDS: &[&str] = &[
    "head",
    "vp",
    "vice",
    "director",
    "chief",
    "ceo",
    "coo",
    "cto",
    "founder",
    "owner",
    "president",
];

const INFLUENCER_KEYWORDS: &[&str] = &[
    "manager",
    "lead",
    "senior",
    "principal",
    "growth",
    "marketing",
];

/// Per-heuristic contributions so callers can audit the rule total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBreakdown {
    pub role: u8,
    pub industry: u8,
    pub completeness: u8,
}

impl RuleBreakdown {
    pub fn total(&self) -> u8 {
        self.role + self.industry + self.completeness
    }
}

pub fn rule_score(lead: &Lead, ideal_use_cases: &[String]) -> RuleBreakdown {
    RuleBreakdown {
        role: role_score(lead.role.as_deref()),
        industry: industry_score(lead.industry.as_deref(), ideal_use_cases),
        completeness: completeness_score(lead),
    }
}

/// Keyword match is substring containment, so "cofounder" counts as "founder".
pub fn role_score(role: Option<&str>) -> u8 {
    let Some(role) = role else {
        return 0;
    };
    let role = role.to_lowercase();

    if DECISION_MAKER_KEYWORDS
        .iter()
        .any(|keyword| role.contains(keyword))
    {
        DECISION_MAKER_POINTS
    } else if INFLUENCER_KEYWORDS
        .iter()
        .any(|keyword| role.contains(keyword))
    {
        INFLUENCER_POINTS
    } else {
        0
    }
}

pub fn industry_score(industry: Option<&str>, ideal_use_cases: &[String]) -> u8 {
    let industry = match industry.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_lowercase(),
        _ => return 0,
    };

    let ideals: Vec<String> = ideal_use_cases
        .iter()
        .map(|ideal| ideal.trim().to_lowercase())
        .filter(|ideal| !ideal.is_empty())
        .collect();

    if ideals.iter().any(|ideal| *ideal == industry) {
        INDUSTRY_EXACT_POINTS
    } else if ideals
        .iter()
        .any(|ideal| industry.contains(ideal.as_str()) || ideal.contains(industry.as_str()))
    {
        INDUSTRY_ADJACENT_POINTS
    } else {
        0
    }
}

/// All six profile fields must be non-blank; there is no partial credit.
pub fn completeness_score(lead: &Lead) -> u8 {
    let complete = lead
        .profile_fields()
        .iter()
        .all(|field| field.map(|value| !value.trim().is_empty()).unwrap_or(false));

    if complete {
        COMPLETENESS_POINTS
    } else {
        0
    }
}
