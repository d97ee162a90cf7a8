use lead_qualifier::config::AppConfig;
use lead_qualifier::error::AppError;
use lead_qualifier::scoring::{GeminiClassifier, ScoringEngine, ScoringService};
use lead_qualifier::storage::JsonFileStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

pub(crate) type LeadScoringService = ScoringService<JsonFileStore, GeminiClassifier>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn build_classifier(config: &AppConfig) -> Result<Arc<GeminiClassifier>, AppError> {
    if config.classifier.api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; every classification will fall back to the failure sentinel");
    }
    Ok(Arc::new(GeminiClassifier::new(&config.classifier)?))
}

pub(crate) fn build_engine(
    config: &AppConfig,
    concurrency: Option<usize>,
) -> Result<ScoringEngine<GeminiClassifier>, AppError> {
    let classifier = build_classifier(config)?;
    Ok(ScoringEngine::new(classifier)
        .with_concurrency(concurrency.unwrap_or(config.scoring.concurrency)))
}

pub(crate) fn build_scoring_service(
    config: &AppConfig,
) -> Result<Arc<LeadScoringService>, AppError> {
    let store = Arc::new(JsonFileStore::open(&config.storage.data_dir)?);
    let engine = build_engine(config, None)?;
    Ok(Arc::new(ScoringService::with_engine(store, engine)))
}
