use std::io::Cursor;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::common::*;

use crate::scoring::domain::{Intent, Offer};
use crate::scoring::engine::ScoringError;
use crate::scoring::repository::{LeadRepository, ResultSink, StoreError};
use crate::scoring::service::{ScoringService, ScoringServiceError};

#[tokio::test]
async fn score_all_persists_the_full_result_set_once() {
    let store = MemoryStore::seeded(
        vec![
            complete_lead("lead-1", "VP of Sales", "fintech"),
            intern_lead(),
        ],
        Some(fintech_offer()),
    );
    let (service, store, _) = build_service(store, ScriptedClassifier::always("High"));

    let run = service.score_all().await.expect("run succeeds");

    assert_eq!(run.count, 2);
    assert_eq!(store.sink_writes.load(Ordering::SeqCst), 1);
    let persisted = store.latest().expect("read").expect("results stored");
    assert_eq!(persisted, run.results);
    assert_eq!(persisted[0].score, 100);
    assert_eq!(persisted[1].score, 50);
}

#[tokio::test]
async fn missing_offer_is_reported_before_classification() {
    let store = MemoryStore::seeded(vec![intern_lead()], None);
    let (service, store, classifier) = build_service(store, ScriptedClassifier::always("High"));

    let error = service.score_all().await.expect_err("no offer");

    assert!(matches!(error, ScoringError::NoOffer));
    assert_eq!(classifier.calls(), 0);
    assert_eq!(store.sink_writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_lead_store_with_offer_produces_no_results() {
    let store = MemoryStore::seeded(Vec::new(), Some(fintech_offer()));
    let (service, store, classifier) = build_service(store, ScriptedClassifier::always("High"));

    let error = service.score_all().await.expect_err("no leads");

    assert!(matches!(error, ScoringError::NoLeads));
    assert_eq!(classifier.calls(), 0);
    assert!(store.latest().expect("read").is_none());
}

#[tokio::test]
async fn a_new_run_replaces_previous_results() {
    let store = MemoryStore::seeded(
        vec![complete_lead("lead-1", "CEO", "fintech")],
        Some(fintech_offer()),
    );
    let (service, store, _) = build_service(store, ScriptedClassifier::always("Low"));

    service.score_all().await.expect("first run");
    store
        .append(vec![complete_lead("lead-2", "Director", "fintech")])
        .expect("append");
    service.score_all().await.expect("second run");

    let persisted = store.latest().expect("read").expect("results stored");
    assert_eq!(persisted.len(), 2);
    assert!(persisted.iter().all(|result| result.intent == Intent::Low));
}

#[tokio::test]
async fn sink_failure_fails_the_run() {
    let store = ReadOnlyStore {
        inner: MemoryStore::seeded(vec![intern_lead()], Some(fintech_offer())),
    };
    let service = ScoringService::new(
        Arc::new(store),
        Arc::new(ScriptedClassifier::always("Medium")),
    );

    let error = service.score_all().await.expect_err("sink offline");
    assert!(matches!(error, ScoringError::Store(StoreError::Unavailable(_))));
}

#[test]
fn save_offer_requires_a_name() {
    let (service, store, _) =
        build_service(MemoryStore::default(), ScriptedClassifier::always("High"));

    let error = service
        .save_offer(Offer {
            name: "  ".to_string(),
            ..Offer::default()
        })
        .expect_err("blank name rejected");
    assert!(matches!(error, ScoringServiceError::InvalidOffer));
    assert!(store.offer.lock().expect("offer mutex poisoned").is_none());

    service.save_offer(fintech_offer()).expect("offer saved");
    assert_eq!(
        service.current_offer().expect("read"),
        Some(fintech_offer())
    );
}

#[test]
fn import_leads_appends_parsed_rows() {
    let (service, _, _) = build_service(
        MemoryStore::seeded(vec![intern_lead()], None),
        ScriptedClassifier::always("High"),
    );

    let added = service
        .import_leads(Cursor::new(
            "name,role,industry\nAva,Head of Sales,Fintech\nRavi,Analyst,\n",
        ))
        .expect("import succeeds");

    assert_eq!(added, 2);
    let leads = service.leads().expect("leads");
    assert_eq!(leads.len(), 3);
    assert_eq!(leads[1].name.as_deref(), Some("Ava"));
    assert_eq!(leads[2].industry, None);
}

#[test]
fn import_leads_reports_malformed_csv() {
    let (service, store, _) =
        build_service(MemoryStore::default(), ScriptedClassifier::always("High"));

    let error = service
        .import_leads(Cursor::new("name,role\nAva,CEO,extra\n"))
        .expect_err("ragged csv");

    assert!(matches!(error, ScoringServiceError::Import(_)));
    assert!(store.all().expect("leads").is_empty());
}
