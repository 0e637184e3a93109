//! Not-found and failure paths through the router.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::http::{StatusCode, header};

use crate::common::{FailingRepository, TestHarness, voice};

#[tokio::test]
async fn test_unknown_slug_is_404() {
    let (status, response, html) = TestHarness::default().get("/unknown-slug").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    assert!(html.contains("<title>Seite nicht gefunden</title>"));
    assert!(!html.contains("Acme Realty"));
    assert!(!html.contains("call-widget"));
}

#[tokio::test]
async fn test_slug_match_is_exact() {
    let harness = TestHarness::default();
    for uri in ["/Acme-Realty", "/acme-realty-2", "/acme"] {
        let (status, _, _) = harness.get(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn test_backend_fault_renders_not_found() {
    let repo = Arc::new(FailingRepository::default());
    let harness = TestHarness::with_repository(repo.clone(), voice());

    let (status, _, html) = harness.get("/acme-realty").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Die angeforderte Seite existiert nicht."));
    assert!(!html.contains("503"));
    assert_eq!(repo.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_health_reports_backend() {
    let repo = Arc::new(FailingRepository::default());
    let harness = TestHarness::with_repository(repo, voice());

    let (status, _, body) = harness.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["repository"], "failing");
    assert_eq!(json["voice_configured"], true);
}
