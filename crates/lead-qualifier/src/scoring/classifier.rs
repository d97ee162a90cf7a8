use async_trait::async_trait;

use super::domain::{Classification, Intent, Lead, Offer};

/// Seam over the external text-generation service.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, lead: &Lead, offer: &Offer)
        -> Result<Classification, ClassifierError>;
}

/// Failure talking to, or understanding, the text-generation service.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("text-generation request failed: {0}")]
    Transport(String),
    #[error("text-generation service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed text-generation response: {0}")]
    MalformedResponse(String),
    #[error("text-generation service returned an empty completion")]
    EmptyCompletion,
    #[error("failed to serialize prompt input: {0}")]
    Serialization(#[from] serde_json::Error),
}

const INSTRUCTION: &str = "Classify intent (High/Medium/Low) and explain in 1–2 sentences.";

/// Prompt embedding the offer and the prospect as JSON.
pub fn build_prompt(lead: &Lead, offer: &Offer) -> Result<String, ClassifierError> {
    let offer_json = serde_json::to_string(offer)?;
    let lead_json = serde_json::to_string(lead)?;
    Ok(format!(
        "Offer: {offer_json}\nProspect: {lead_json}\n{INSTRUCTION}"
    ))
}

/// Turns a raw completion into a classification.
///
/// Best-effort: the earliest whole-word `high`, `medium` or `low` (any case)
/// decides the intent. A completion naming none of them is treated as
/// `Medium`. The trimmed completion is kept as the reasoning either way.
pub fn parse_completion(text: &str) -> Classification {
    let reasoning = text.trim().to_string();
    let intent = parse_intent(&reasoning).unwrap_or(Intent::Medium);
    Classification { intent, reasoning }
}

/// Earliest whole-word intent label in `text`, if any.
pub fn parse_intent(text: &str) -> Option<Intent> {
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let lowered = text.to_ascii_lowercase();
    let bytes = lowered.as_bytes();

    let mut best: Option<(usize, Intent)> = None;
    for (label, intent) in [
        ("high", Intent::High),
        ("medium", Intent::Medium),
        ("low", Intent::Low),
    ] {
        let first = lowered.match_indices(label).find_map(|(start, _)| {
            let end = start + label.len();
            let left_ok = start == 0 || !is_word_byte(bytes[start - 1]);
            let right_ok = end == bytes.len() || !is_word_byte(bytes[end]);
            (left_ok && right_ok).then_some(start)
        });

        if let Some(start) = first {
            if best.map(|(current, _)| start < current).unwrap_or(true) {
                best = Some((start, intent));
            }
        }
    }

    best.map(|(_, intent)| intent)
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}
