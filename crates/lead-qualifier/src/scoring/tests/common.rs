use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::scoring::classifier::{parse_completion, ClassifierError, IntentClassifier};
use crate::scoring::domain::{Classification, Lead, LeadId, Offer, ScoreResult};
use crate::scoring::repository::{LeadRepository, OfferRepository, ResultSink, StoreError};
use crate::scoring::{scoring_router, ScoringService};

pub(super) fn fintech_offer() -> Offer {
    Offer {
        name: "X".to_string(),
        ideal_use_cases: vec!["fintech".to_string()],
        ..Offer::default()
    }
}

pub(super) fn complete_lead(id: &str, role: &str, industry: &str) -> Lead {
    Lead {
        id: Some(LeadId(id.to_string())),
        name: Some("Ava Patel".to_string()),
        role: Some(role.to_string()),
        company: Some("FlowMetrics".to_string()),
        industry: Some(industry.to_string()),
        location: Some("Mumbai".to_string()),
        linkedin_bio: Some("Builds revenue teams at fintech startups".to_string()),
    }
}

pub(super) fn intern_lead() -> Lead {
    Lead {
        id: None,
        name: Some("Sam Lee".to_string()),
        role: Some("Intern".to_string()),
        ..Lead::default()
    }
}

type Script = dyn Fn(&Lead) -> Result<String, ClassifierError> + Send + Sync;

/// Classifier answering from a closure, counting calls and optionally pausing.
pub(super) struct ScriptedClassifier {
    script: Box<Script>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    pub(super) fn new<F>(script: F) -> Self
    where
        F: Fn(&Lead) -> Result<String, ClassifierError> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn always(text: &'static str) -> Self {
        Self::new(move |_| Ok(text.to_string()))
    }

    pub(super) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IntentClassifier for ScriptedClassifier {
    async fn classify(
        &self,
        lead: &Lead,
        _offer: &Offer,
    ) -> Result<Classification, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.script)(lead).map(|text| parse_completion(&text))
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) leads: Mutex<Vec<Lead>>,
    pub(super) offer: Mutex<Option<Offer>>,
    pub(super) results: Mutex<Option<Vec<ScoreResult>>>,
    pub(super) sink_writes: AtomicUsize,
}

impl MemoryStore {
    pub(super) fn seeded(leads: Vec<Lead>, offer: Option<Offer>) -> Self {
        Self {
            leads: Mutex::new(leads),
            offer: Mutex::new(offer),
            ..Self::default()
        }
    }
}

impl LeadRepository for MemoryStore {
    fn all(&self) -> Result<Vec<Lead>, StoreError> {
        Ok(self.leads.lock().expect("leads mutex poisoned").clone())
    }

    fn append(&self, leads: Vec<Lead>) -> Result<usize, StoreError> {
        let added = leads.len();
        self.leads.lock().expect("leads mutex poisoned").extend(leads);
        Ok(added)
    }
}

impl OfferRepository for MemoryStore {
    fn current(&self) -> Result<Option<Offer>, StoreError> {
        Ok(self.offer.lock().expect("offer mutex poisoned").clone())
    }

    fn replace(&self, offer: Offer) -> Result<(), StoreError> {
        *self.offer.lock().expect("offer mutex poisoned") = Some(offer);
        Ok(())
    }
}

impl ResultSink for MemoryStore {
    fn replace_all(&self, results: &[ScoreResult]) -> Result<(), StoreError> {
        self.sink_writes.fetch_add(1, Ordering::SeqCst);
        *self.results.lock().expect("results mutex poisoned") = Some(results.to_vec());
        Ok(())
    }

    fn latest(&self) -> Result<Option<Vec<ScoreResult>>, StoreError> {
        Ok(self.results.lock().expect("results mutex poisoned").clone())
    }
}

/// Store whose result sink is offline.
pub(super) struct ReadOnlyStore {
    pub(super) inner: MemoryStore,
}

impl LeadRepository for ReadOnlyStore {
    fn all(&self) -> Result<Vec<Lead>, StoreError> {
        self.inner.all()
    }

    fn append(&self, _leads: Vec<Lead>) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }
}

impl OfferRepository for ReadOnlyStore {
    fn current(&self) -> Result<Option<Offer>, StoreError> {
        self.inner.current()
    }

    fn replace(&self, _offer: Offer) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }
}

impl ResultSink for ReadOnlyStore {
    fn replace_all(&self, _results: &[ScoreResult]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }

    fn latest(&self) -> Result<Option<Vec<ScoreResult>>, StoreError> {
        Ok(None)
    }
}

pub(super) fn build_service(
    store: MemoryStore,
    classifier: ScriptedClassifier,
) -> (
    ScoringService<MemoryStore, ScriptedClassifier>,
    Arc<MemoryStore>,
    Arc<ScriptedClassifier>,
) {
    let store = Arc::new(store);
    let classifier = Arc::new(classifier);
    let service = ScoringService::new(store.clone(), classifier.clone());
    (service, store, classifier)
}

pub(super) fn router_with_service(
    service: ScoringService<MemoryStore, ScriptedClassifier>,
) -> axum::Router {
    scoring_router(Arc::new(service))
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}
