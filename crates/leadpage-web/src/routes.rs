//! HTTP routes.

use std::any::Any;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::{StatusCode, header};
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::render;
use crate::resolver::{PageResolver, ResolvedPage};

const NO_STORE: [(header::HeaderName, &str); 1] = [(header::CACHE_CONTROL, "no-store")];

/// Shared state for all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    resolver: Arc<PageResolver>,
    demo_path: String,
}

impl AppState {
    /// Create state from a resolver and the path `/` redirects to.
    pub fn new(resolver: PageResolver, demo_path: impl Into<String>) -> Self {
        Self {
            resolver: Arc::new(resolver),
            demo_path: demo_path.into(),
        }
    }

    /// The page resolver.
    pub fn resolver(&self) -> &PageResolver {
        &self.resolver
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server answers
    pub status: &'static str,
    /// Service name
    pub service: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Lead store backend
    pub repository: String,
    /// Lead store has credentials
    pub repository_configured: bool,
    /// Voice public key present
    pub voice_configured: bool,
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/{slug}", get(lead_page))
        .fallback(not_found)
        .with_state(state);
    with_layers(router)
}

/// Wrap a router with request tracing and the panic page.
pub fn with_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_page))
        .layer(TraceLayer::new_for_http())
}

async fn index(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.demo_path)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let resolver = state.resolver();
    Json(HealthResponse {
        status: "ok",
        service: "leadpage",
        version: env!("CARGO_PKG_VERSION"),
        repository: resolver.repository().name().to_string(),
        repository_configured: resolver.repository().is_configured(),
        voice_configured: resolver.voice().public_key().is_some(),
    })
}

async fn lead_page(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.resolver().resolve(&slug).await {
        ResolvedPage::Found(page) => (NO_STORE, Html(render::lead_page(&page))).into_response(),
        ResolvedPage::NotFound => not_found_response(),
    }
}

async fn not_found() -> Response {
    not_found_response()
}

fn not_found_response() -> Response {
    (StatusCode::NOT_FOUND, NO_STORE, Html(render::not_found_page())).into_response()
}

fn panic_page(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(%detail, "request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        NO_STORE,
        Html(render::error_page()),
    )
        .into_response()
}
