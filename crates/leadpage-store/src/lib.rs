//! # leadpage-store
//!
//! Read-only lead lookup for Leadpage.
//!
//! - [`LeadRepository`]: the lookup contract (one exact-match query, no caching)
//! - [`SupabaseLeadRepository`]: hosted PostgREST table
//! - [`InMemoryLeadRepository`]: JSON-seeded local store and test double
//! - [`create_lead_repository`]: picks a backend from [`AppConfig`](leadpage_core::AppConfig)

#![forbid(unsafe_code)]

pub mod memory;
pub mod repository;
pub mod supabase;

pub use memory::InMemoryLeadRepository;
pub use repository::{LeadRepository, create_lead_repository};
pub use supabase::SupabaseLeadRepository;
