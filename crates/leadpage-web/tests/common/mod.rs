//! Common test utilities for leadpage-web integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode};
use leadpage_core::{Error, Lead, Slug, VoiceConfig};
use leadpage_store::{InMemoryLeadRepository, LeadRepository};
use leadpage_web::{AppState, PageResolver, create_router};
use tower::ServiceExt;

/// Public key used by every harness with voice enabled.
pub const PUBLIC_KEY: &str = "pk_test_123";

/// The lead from the acme-realty walkthrough.
pub fn acme_lead() -> Lead {
    lead("acme-realty", "Acme Realty", "Jana", "agent_123")
}

/// Build a lead row.
pub fn lead(slug: &str, company: &str, first_name: &str, agent: &str) -> Lead {
    serde_json::from_value(serde_json::json!({
        "id": format!("id-{slug}"),
        "slug": slug,
        "company_name": company,
        "first_name": first_name,
        "email": format!("{}@{slug}.de", first_name.to_lowercase()),
        "vapi_agent_id": agent,
        "created_at": "2024-05-01T10:00:00Z"
    }))
    .expect("valid lead row")
}

/// A repository that always fails, counting lookups.
#[derive(Default)]
pub struct FailingRepository {
    /// Lookups made
    pub calls: AtomicUsize,
}

#[async_trait]
impl LeadRepository for FailingRepository {
    async fn lookup(&self, _slug: &Slug) -> leadpage_core::Result<Option<Lead>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::backend("lead query rejected (HTTP 503): upstream down"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Test harness: a router over a given repository.
pub struct TestHarness {
    /// The application router
    pub router: Router,
}

impl TestHarness {
    /// Harness over the given leads, with voice configured.
    pub fn with_leads(leads: Vec<Lead>) -> Self {
        let repo = InMemoryLeadRepository::with_leads(leads).expect("unique slugs");
        Self::with_repository(Arc::new(repo), voice())
    }

    /// Harness over any repository and voice settings.
    pub fn with_repository(repo: Arc<dyn LeadRepository>, voice: VoiceConfig) -> Self {
        let state = AppState::new(PageResolver::new(repo, voice), "/demo");
        Self {
            router: create_router(state),
        }
    }

    /// Send a GET and return status, response and body text.
    pub async fn get(&self, uri: &str) -> (StatusCode, Response<Body>, String) {
        let response = self
            .router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let (parts, body) = response.into_parts();
        let bytes = to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        (status, Response::from_parts(parts, Body::empty()), text)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::with_leads(vec![acme_lead()])
    }
}

/// Voice settings with a public key.
pub fn voice() -> VoiceConfig {
    VoiceConfig {
        public_key: Some(PUBLIC_KEY.to_string()),
    }
}
