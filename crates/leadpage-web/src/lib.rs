//! # leadpage-web
//!
//! HTTP server for personalized lead landing pages.
//!
//! - `GET /{slug}`: the lead's page, or the not-found page with 404
//! - `GET /`: redirect to the demo lead
//! - `GET /api/health`: JSON health check
//!
//! Pages are rendered on the server from a single lead lookup and are never
//! cached. The call widget runs in the browser from a table embedded in the
//! page (see [`client`]).

pub mod client;
pub mod error;
pub mod metadata;
pub mod render;
pub mod resolver;
pub mod routes;
pub mod server;

pub use error::{Error, Result};
pub use metadata::PageMetadata;
pub use resolver::{PageResolver, RenderablePage, ResolvedPage, contact_link};
pub use routes::{AppState, HealthResponse, create_router};
pub use server::Server;
