use super::domain::{Lead, Offer, ScoreResult};

/// Supplies the leads a scoring run works through.
pub trait LeadRepository: Send + Sync {
    fn all(&self) -> Result<Vec<Lead>, StoreError>;
    /// Appends imported leads, returning how many were added.
    fn append(&self, leads: Vec<Lead>) -> Result<usize, StoreError>;
}

/// Holds the single current offer; `replace` overwrites it wholesale.
pub trait OfferRepository: Send + Sync {
    fn current(&self) -> Result<Option<Offer>, StoreError>;
    fn replace(&self, offer: Offer) -> Result<(), StoreError>;
}

/// Destination for a finished run. A new run replaces the previous result set.
pub trait ResultSink: Send + Sync {
    fn replace_all(&self, results: &[ScoreResult]) -> Result<(), StoreError>;
    fn latest(&self) -> Result<Option<Vec<ScoreResult>>, StoreError>;
}

/// Everything the scoring service needs from storage.
pub trait ScoringStore: LeadRepository + OfferRepository + ResultSink {}

impl<T> ScoringStore for T where T: LeadRepository + OfferRepository + ResultSink {}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored document is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
