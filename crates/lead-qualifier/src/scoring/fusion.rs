use super::domain::{ClassificationOutcome, Intent};

pub const CLASSIFICATION_FAILED: &str = "classification failed";

/// Rule score and AI points combined into the persisted values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FusedScore {
    pub intent: Intent,
    pub ai_points: u8,
    pub score: u8,
    pub explanation: String,
}

pub fn ai_points(intent: Intent) -> u8 {
    match intent {
        Intent::High => 50,
        Intent::Medium => 30,
        Intent::Low => 10,
        Intent::Unknown => 0,
    }
}

/// A failed classification contributes no AI points and is labelled `Unknown`.
pub fn fuse(rule_score: u8, outcome: &ClassificationOutcome) -> FusedScore {
    let (intent, reasoning) = match outcome {
        ClassificationOutcome::Classified(classification) => {
            (classification.intent, classification.reasoning.as_str())
        }
        ClassificationOutcome::Unavailable { .. } => (Intent::Unknown, CLASSIFICATION_FAILED),
    };

    let ai_points = ai_points(intent);
    FusedScore {
        intent,
        ai_points,
        score: rule_score + ai_points,
        explanation: format!("{reasoning} (rule_score={rule_score}, ai_points={ai_points})"),
    }
}
