use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::classifier::IntentClassifier;
use super::domain::{ClassificationOutcome, Lead, LeadId, Offer, ScoreResult};
use super::fusion::fuse;
use super::repository::StoreError;
use super::rules::rule_score;

/// Drives rule scoring, classification and fusion over a batch of leads.
pub struct ScoringEngine<C> {
    classifier: Arc<C>,
    concurrency: usize,
}

/// Ordered result set of one scoring run.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRun {
    pub results: Vec<ScoreResult>,
    pub count: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Reasons a whole run is rejected.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("no offer uploaded")]
    NoOffer,
    #[error("no leads uploaded")]
    NoLeads,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl<C> ScoringEngine<C>
where
    C: IntentClassifier + 'static,
{
    /// Engine classifying one lead at a time.
    pub fn new(classifier: Arc<C>) -> Self {
        Self {
            classifier,
            concurrency: 1,
        }
    }

    /// Allows up to `limit` classification calls in flight. Output order
    /// still follows input order.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Scores every lead against `offer`, one result per lead in input order.
    pub async fn run(&self, leads: &[Lead], offer: &Offer) -> Result<ScoreRun, ScoringError> {
        if leads.is_empty() {
            return Err(ScoringError::NoLeads);
        }

        let started_at = Utc::now();
        info!(
            leads = leads.len(),
            offer = %offer.name,
            concurrency = self.concurrency,
            "scoring run started"
        );

        let pending: Vec<_> = leads
            .iter()
            .map(|lead| self.score_lead(lead, offer))
            .collect();
        let results: Vec<ScoreResult> = stream::iter(pending)
            .buffered(self.concurrency)
            .collect()
            .await;

        let finished_at = Utc::now();
        let count = results.len();
        info!(
            count,
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            "scoring run finished"
        );

        Ok(ScoreRun {
            results,
            count,
            started_at,
            finished_at,
        })
    }

    async fn score_lead(&self, lead: &Lead, offer: &Offer) -> ScoreResult {
        // Generated ids live on the result only; the source lead is not touched.
        let id = lead.id.clone().unwrap_or_else(LeadId::generate);
        let rules = rule_score(lead, &offer.ideal_use_cases);

        let outcome = match self.classifier.classify(lead, offer).await {
            Ok(classification) => ClassificationOutcome::Classified(classification),
            Err(err) => {
                warn!(lead_id = %id, error = %err, "intent classification unavailable");
                ClassificationOutcome::Unavailable {
                    reason: err.to_string(),
                }
            }
        };

        let fused = fuse(rules.total(), &outcome);
        debug!(
            lead_id = %id,
            role_points = rules.role,
            industry_points = rules.industry,
            completeness_points = rules.completeness,
            ai_points = fused.ai_points,
            score = fused.score,
            "lead scored"
        );

        ScoreResult {
            id,
            name: lead.name.clone(),
            role: lead.role.clone(),
            company: lead.company.clone(),
            industry: lead.industry.clone(),
            intent: fused.intent,
            score: fused.score,
            reasoning: fused.explanation,
        }
    }
}
