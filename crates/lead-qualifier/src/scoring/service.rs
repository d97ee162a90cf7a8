use std::io::Read;
use std::sync::Arc;

use tracing::info;

use super::classifier::IntentClassifier;
use super::domain::{Lead, Offer, ScoreResult};
use super::engine::{ScoreRun, ScoringEngine, ScoringError};
use super::repository::{ScoringStore, StoreError};
use crate::leads::{LeadCsvImporter, LeadImportError};

/// Service composing the store collaborators with the scoring engine.
pub struct ScoringService<S, C> {
    store: Arc<S>,
    engine: ScoringEngine<C>,
}

impl<S, C> ScoringService<S, C>
where
    S: ScoringStore + 'static,
    C: IntentClassifier + 'static,
{
    pub fn new(store: Arc<S>, classifier: Arc<C>) -> Self {
        Self::with_engine(store, ScoringEngine::new(classifier))
    }

    pub fn with_engine(store: Arc<S>, engine: ScoringEngine<C>) -> Self {
        Self { store, engine }
    }

    /// Replace the current offer. The offer must carry a non-blank name.
    pub fn save_offer(&self, offer: Offer) -> Result<Offer, ScoringServiceError> {
        if !offer.has_name() {
            return Err(ScoringServiceError::InvalidOffer);
        }
        self.store.replace(offer.clone())?;
        info!(offer = %offer.name, "offer replaced");
        Ok(offer)
    }

    pub fn current_offer(&self) -> Result<Option<Offer>, ScoringServiceError> {
        Ok(self.store.current()?)
    }

    /// Parse a CSV upload and append its rows to the stored leads.
    pub fn import_leads<R: Read>(&self, reader: R) -> Result<usize, ScoringServiceError> {
        let leads = LeadCsvImporter::from_reader(reader)?;
        let added = self.store.append(leads)?;
        info!(added, "leads imported");
        Ok(added)
    }

    pub fn leads(&self) -> Result<Vec<Lead>, ScoringServiceError> {
        Ok(self.store.all()?)
    }

    /// Score every stored lead against the current offer and persist the run.
    ///
    /// Preconditions are checked before any classification work starts and the
    /// sink only ever receives a complete result set.
    pub async fn score_all(&self) -> Result<ScoreRun, ScoringError> {
        let offer = self.store.current()?.ok_or(ScoringError::NoOffer)?;
        let leads = self.store.all()?;
        if leads.is_empty() {
            return Err(ScoringError::NoLeads);
        }

        let run = self.engine.run(&leads, &offer).await?;
        self.store.replace_all(&run.results)?;
        Ok(run)
    }

    pub fn results(&self) -> Result<Option<Vec<ScoreResult>>, ScoringServiceError> {
        Ok(self.store.latest()?)
    }
}

/// Error raised by the non-scoring service operations.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error("offer.name is required")]
    InvalidOffer,
    #[error(transparent)]
    Import(#[from] LeadImportError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
