mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use common::{days_ago, quote, InMemoryQuoteRepository};
use voltline_backend::config::AutosaveConfig;
use voltline_backend::dto::quote_dto::{LineItemInput, QuoteInput};
use voltline_backend::model::quote::QuoteStatus;
use voltline_backend::service::quote_service::{summarize, QuoteService, QuoteServiceImpl};
use voltline_backend::util::autosave::SaveStatus;
use voltline_backend::util::error::ServiceError;
use voltline_backend::util::profit::ProfitTier;

fn service(repo: Arc<InMemoryQuoteRepository>) -> QuoteServiceImpl {
    QuoteServiceImpl::new(repo, AutosaveConfig { enabled: true, delay_ms: 5000, saved_reset_ms: 2000 })
}

fn input(name: &str) -> QuoteInput {
    QuoteInput {
        customer_name: name.to_string(),
        customer_email: Some("homeowner@example.com".to_string()),
        line_items: vec![LineItemInput {
            id: None,
            material_id: None,
            name: "Level 2 EV charger".to_string(),
            quantity: 1.0,
            unit_price: 600.0,
            unit_type: Some("each".to_string()),
        }],
        labor_hours: 4.0,
        labor_rate: 100.0,
        markup_percent: 25.0,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_quote_numbers_and_totals() {
    let repo = Arc::new(InMemoryQuoteRepository::default());
    let service = service(repo.clone());

    let first = service.create_quote(input("Dana Ortiz")).await.unwrap();
    let second = service.create_quote(input("Sam Lee")).await.unwrap();

    let year = Utc::now().format("%Y").to_string();
    assert_eq!(first.quote_number, format!("Q-{}-0001", year));
    assert_eq!(second.quote_number, format!("Q-{}-0002", year));
    assert_eq!(first.status, QuoteStatus::Draft);
    // (600 + 400) * 1.25
    assert_eq!(first.total, 1250.0);
    assert_eq!(first.line_items.len(), 1);
    assert!(!first.line_items[0].id.is_empty());
}

#[tokio::test]
async fn test_create_rejects_bad_material_id() {
    let service = service(Arc::new(InMemoryQuoteRepository::default()));
    let mut bad = input("Dana");
    bad.line_items[0].material_id = Some("not-an-object-id".to_string());

    let err = service.create_quote(bad).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn test_get_quote_includes_health_and_profit() {
    let repo = Arc::new(InMemoryQuoteRepository::default());
    let service = service(repo.clone());
    let mut no_email = input("Dana");
    no_email.customer_email = None;
    let created = service.create_quote(no_email).await.unwrap();

    let view = service.get_quote(created.id.unwrap()).await.unwrap();
    assert_eq!(view.total_display, "$1,250.00");
    assert_eq!(view.line_items[0].subtotal, 600.0);
    assert_eq!(view.last_updated, "just now");
    assert_eq!(view.warnings.len(), 1);
    assert_eq!(view.warnings[0].message, "No email - quote cannot be emailed");
    // 250 profit on 1250
    assert!((view.profit.margin_percent - 20.0).abs() < 1e-9);
    assert_eq!(view.profit.tier, ProfitTier::Low);
}

#[tokio::test]
async fn test_missing_quote_is_not_found() {
    let service = service(Arc::new(InMemoryQuoteRepository::default()));
    let err = service.quote_health(bson::oid::ObjectId::new()).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_attention_and_summary() {
    let now = Utc::now();
    let quotes = vec![
        quote("Q-1", QuoteStatus::Sent, days_ago(now, 6)),
        quote("Q-2", QuoteStatus::Sent, days_ago(now, 1)),
        quote("Q-3", QuoteStatus::Draft, days_ago(now, 9)),
        quote("Q-4", QuoteStatus::Accepted, days_ago(now, 20)),
        quote("Q-5", QuoteStatus::Declined, days_ago(now, 20)),
        quote("Q-6", QuoteStatus::Accepted, days_ago(now, 2)),
    ];
    let quote_total = quotes[0].total;
    let service = service(Arc::new(InMemoryQuoteRepository::with_quotes(quotes)));

    let items = service.attention(now).await.unwrap();
    let numbers: Vec<&str> = items.iter().map(|i| i.quote_number.as_str()).collect();
    assert_eq!(numbers, vec!["Q-1", "Q-3"]);

    let summary = service.summary().await.unwrap();
    assert_eq!(summary.counts["sent"], 2);
    assert_eq!(summary.counts["accepted"], 2);
    assert_eq!(summary.counts["expired"], 0);
    assert_eq!(summary.pipeline_value, quote_total * 2.0);
    assert_eq!(summary.won_value, quote_total * 2.0);
    assert!((summary.win_rate_percent - 200.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_summary_without_decisions_has_zero_win_rate() {
    let now = Utc::now();
    let summary = summarize(&[quote("Q-1", QuoteStatus::Sent, now)]);
    assert_eq!(summary.win_rate_percent, 0.0);
    assert_eq!(summarize(&[]).pipeline_value, 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_draft_edits_are_debounced_into_one_update() {
    let now = Utc::now();
    let existing = quote("Q-1", QuoteStatus::Draft, now);
    let id = existing.id.unwrap();
    let repo = Arc::new(InMemoryQuoteRepository::with_quotes(vec![existing]));
    let service = service(repo.clone());

    for name in ["D", "Da", "Dan", "Dana"] {
        let snapshot = service.save_draft(id, input(name)).await.unwrap();
        assert!(snapshot.has_unsaved_changes);
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    assert_eq!(repo.updates(), 0);

    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert_eq!(repo.updates(), 1);
    assert_eq!(repo.stored(id).unwrap().customer_name, "Dana");

    // stored draft closes its session
    assert!(service.draft_status(id).is_none());
    assert_eq!(service.open_drafts(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_draft_flush_and_failure() {
    let now = Utc::now();
    let existing = quote("Q-1", QuoteStatus::Draft, now);
    let id = existing.id.unwrap();
    let repo = Arc::new(InMemoryQuoteRepository::with_quotes(vec![existing]));
    let service = service(repo.clone());

    repo.fail_updates.store(true, Ordering::SeqCst);
    service.save_draft(id, input("Dana")).await.unwrap();
    let snapshot = service.flush_draft(id).await.unwrap();
    assert_eq!(snapshot.status, SaveStatus::Error);
    assert!(snapshot.has_unsaved_changes);

    // a failed save keeps the session open for another attempt
    assert!(service.draft_status(id).is_some());

    repo.fail_updates.store(false, Ordering::SeqCst);
    let snapshot = service.flush_draft(id).await.unwrap();
    assert_eq!(snapshot.status, SaveStatus::Saved);
    assert!(!snapshot.has_unsaved_changes);
    assert_eq!(repo.updates(), 2);
    assert!(service.draft_status(id).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_discarded_draft_is_never_written() {
    let now = Utc::now();
    let existing = quote("Q-1", QuoteStatus::Draft, now);
    let id = existing.id.unwrap();
    let repo = Arc::new(InMemoryQuoteRepository::with_quotes(vec![existing]));
    let service = service(repo.clone());

    service.save_draft(id, input("Dana")).await.unwrap();
    assert!(service.discard_draft(id));
    assert!(!service.discard_draft(id));
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(repo.updates(), 0);
    assert!(service.draft_status(id).is_none());
}

#[tokio::test]
async fn test_draft_for_unknown_quote_is_rejected() {
    let service = service(Arc::new(InMemoryQuoteRepository::default()));
    let id = bson::oid::ObjectId::new();

    let err = service.save_draft(id, input("Dana")).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert!(matches!(service.flush_draft(id).await.unwrap_err(), ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_quote_numbers_are_not_reused_after_delete() {
    let repo = Arc::new(InMemoryQuoteRepository::default());
    let service = service(repo.clone());

    let first = service.create_quote(input("Dana Ortiz")).await.unwrap();
    let second = service.create_quote(input("Sam Lee")).await.unwrap();
    service.delete_quote(first.id.unwrap()).await.unwrap();
    let third = service.create_quote(input("Ari Chen")).await.unwrap();

    let year = Utc::now().format("%Y").to_string();
    assert_eq!(second.quote_number, format!("Q-{}-0002", year));
    assert_eq!(third.quote_number, format!("Q-{}-0003", year));
    assert_ne!(third.quote_number, second.quote_number);
}

#[tokio::test(start_paused = true)]
async fn test_explicit_update_wins_over_pending_draft() {
    let now = Utc::now();
    let existing = quote("Q-1", QuoteStatus::Draft, now);
    let id = existing.id.unwrap();
    let repo = Arc::new(InMemoryQuoteRepository::with_quotes(vec![existing]));
    let service = service(repo.clone());

    service.save_draft(id, input("Stale Draft Name")).await.unwrap();
    let updated = service.update_quote(id, input("Final Name")).await.unwrap();
    assert_eq!(updated.customer_name, "Final Name");
    assert!(service.draft_status(id).is_none());

    // well past the autosave delay
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(repo.stored(id).unwrap().customer_name, "Final Name");
    assert_eq!(repo.updates(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stored_draft_session_reopens_on_next_edit() {
    let now = Utc::now();
    let existing = quote("Q-1", QuoteStatus::Draft, now);
    let id = existing.id.unwrap();
    let repo = Arc::new(InMemoryQuoteRepository::with_quotes(vec![existing]));
    let service = service(repo.clone());

    service.save_draft(id, input("Dana")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5100)).await;
    assert_eq!(repo.updates(), 1);
    assert_eq!(service.open_drafts(), 0);

    // a new edit reopens a session, which closes again once stored
    service.save_draft(id, input("Dana Ortiz")).await.unwrap();
    assert_eq!(service.open_drafts(), 1);
    tokio::time::sleep(Duration::from_millis(5100)).await;
    assert_eq!(repo.updates(), 2);
    assert_eq!(repo.stored(id).unwrap().customer_name, "Dana Ortiz");
    assert_eq!(service.open_drafts(), 0);
}
