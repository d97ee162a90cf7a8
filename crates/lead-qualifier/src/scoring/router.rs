use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::error;

use super::classifier::IntentClassifier;
use super::domain::Offer;
use super::engine::ScoringError;
use super::export::{results_to_csv, EXPORT_FILENAME};
use super::repository::ScoringStore;
use super::service::{ScoringService, ScoringServiceError};

const UPLOAD_FIELD: &str = "file";

/// Router builder exposing offer, lead intake and scoring endpoints.
pub fn scoring_router<S, C>(service: Arc<ScoringService<S, C>>) -> Router
where
    S: ScoringStore + 'static,
    C: IntentClassifier + 'static,
{
    Router::new()
        .route(
            "/offer",
            post(save_offer_handler::<S, C>).get(current_offer_handler::<S, C>),
        )
        .route("/leads", get(list_leads_handler::<S, C>))
        .route("/leads/upload", post(upload_leads_handler::<S, C>))
        .route("/score", post(score_handler::<S, C>))
        .route("/score/results", get(results_handler::<S, C>))
        .route("/score/export", get(export_handler::<S, C>))
        .with_state(service)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, Json(payload)).into_response()
}

fn internal_error(context: &str, err: &dyn std::error::Error) -> Response {
    error!(error = %err, "{context}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, context)
}

pub(crate) async fn save_offer_handler<S, C>(
    State(service): State<Arc<ScoringService<S, C>>>,
    Json(payload): Json<Value>,
) -> Response
where
    S: ScoringStore + 'static,
    C: IntentClassifier + 'static,
{
    let has_name = payload
        .get("name")
        .and_then(Value::as_str)
        .map(|name| !name.trim().is_empty())
        .unwrap_or(false);
    if !has_name {
        return error_response(
            StatusCode::BAD_REQUEST,
            ScoringServiceError::InvalidOffer.to_string(),
        );
    }

    let offer: Offer = match serde_json::from_value(payload) {
        Ok(offer) => offer,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, format!("invalid offer: {err}")),
    };

    match service.save_offer(offer) {
        Ok(offer) => (StatusCode::OK, Json(json!({ "ok": true, "offer": offer }))).into_response(),
        Err(ScoringServiceError::InvalidOffer) => error_response(
            StatusCode::BAD_REQUEST,
            ScoringServiceError::InvalidOffer.to_string(),
        ),
        Err(other) => internal_error("failed to save offer", &other),
    }
}

pub(crate) async fn current_offer_handler<S, C>(
    State(service): State<Arc<ScoringService<S, C>>>,
) -> Response
where
    S: ScoringStore + 'static,
    C: IntentClassifier + 'static,
{
    match service.current_offer() {
        Ok(Some(offer)) => (StatusCode::OK, Json(offer)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "no offer found"),
        Err(err) => internal_error("failed to read offer", &err),
    }
}

pub(crate) async fn upload_leads_handler<S, C>(
    State(service): State<Arc<ScoringService<S, C>>>,
    mut multipart: Multipart,
) -> Response
where
    S: ScoringStore + 'static,
    C: IntentClassifier + 'static,
{
    let mut upload = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(UPLOAD_FIELD) => match field.bytes().await {
                Ok(bytes) => {
                    upload = Some(bytes);
                    break;
                }
                Err(err) => return error_response(StatusCode::BAD_REQUEST, err.body_text()),
            },
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(err) => return error_response(StatusCode::BAD_REQUEST, err.body_text()),
        }
    }

    let Some(bytes) = upload else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "file (CSV) is required in field `file`",
        );
    };

    match service.import_leads(Cursor::new(bytes)) {
        Ok(added) => (StatusCode::OK, Json(json!({ "ok": true, "added": added }))).into_response(),
        Err(ScoringServiceError::Import(err)) => {
            tracing::warn!(error = %err, "rejected lead upload");
            error_response(StatusCode::BAD_REQUEST, "failed to parse CSV")
        }
        Err(other) => internal_error("failed to store leads", &other),
    }
}

pub(crate) async fn list_leads_handler<S, C>(
    State(service): State<Arc<ScoringService<S, C>>>,
) -> Response
where
    S: ScoringStore + 'static,
    C: IntentClassifier + 'static,
{
    match service.leads() {
        Ok(leads) => (StatusCode::OK, Json(leads)).into_response(),
        Err(err) => internal_error("failed to read leads", &err),
    }
}

pub(crate) async fn score_handler<S, C>(
    State(service): State<Arc<ScoringService<S, C>>>,
) -> Response
where
    S: ScoringStore + 'static,
    C: IntentClassifier + 'static,
{
    match service.score_all().await {
        Ok(run) => {
            let payload = json!({
                "ok": true,
                "counted": run.count,
                "finished_at": run.finished_at,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(ScoringError::NoOffer) => error_response(
            StatusCode::BAD_REQUEST,
            "No offer uploaded. POST /offer first.",
        ),
        Err(ScoringError::NoLeads) => error_response(
            StatusCode::BAD_REQUEST,
            "No leads uploaded. POST /leads/upload first.",
        ),
        Err(err @ ScoringError::Store(_)) => internal_error("scoring failed", &err),
    }
}

pub(crate) async fn results_handler<S, C>(
    State(service): State<Arc<ScoringService<S, C>>>,
) -> Response
where
    S: ScoringStore + 'static,
    C: IntentClassifier + 'static,
{
    match service.results() {
        Ok(Some(results)) => (StatusCode::OK, Json(results)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "no results found; run POST /score first",
        ),
        Err(err) => internal_error("failed to read results", &err),
    }
}

pub(crate) async fn export_handler<S, C>(
    State(service): State<Arc<ScoringService<S, C>>>,
) -> Response
where
    S: ScoringStore + 'static,
    C: IntentClassifier + 'static,
{
    let results = match service.results() {
        Ok(Some(results)) => results,
        Ok(None) => {
            return error_response(
                StatusCode::NOT_FOUND,
                "no results found; run POST /score first",
            )
        }
        Err(err) => return internal_error("failed to read results", &err),
    };

    match results_to_csv(&results) {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, mime::TEXT_CSV.as_ref().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={EXPORT_FILENAME}"),
                ),
            ],
            body,
        )
            .into_response(),
        Err(err) => internal_error("failed to export results", &err),
    }
}
