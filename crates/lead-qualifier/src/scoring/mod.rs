//! Lead scoring engine: rule layer, AI intent classification, fusion and
//! batch orchestration, plus the store seams and HTTP surface around them.

pub mod classifier;
pub mod domain;
pub mod engine;
pub mod export;
pub mod fusion;
pub mod gemini;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use classifier::{build_prompt, parse_completion, parse_intent, ClassifierError, IntentClassifier};
pub use domain::{
    Classification, ClassificationOutcome, Intent, Lead, LeadId, Offer, ScoreResult,
};
pub use engine::{ScoreRun, ScoringEngine, ScoringError};
pub use export::{results_to_csv, write_results_csv, ExportError};
pub use fusion::{ai_points, fuse, FusedScore};
pub use gemini::GeminiClassifier;
pub use repository::{
    LeadRepository, OfferRepository, ResultSink, ScoringStore, StoreError,
};
pub use router::scoring_router;
pub use rules::{rule_score, RuleBreakdown};
pub use service::{ScoringService, ScoringServiceError};
