//! Leadpage Core: shared types, configuration, and errors.
//!
//! This crate has no internal Leadpage dependencies.
//!
//! # Modules
//!
//! - [`lead`]: The [`Lead`] record, [`Slug`] and [`LeadId`]
//! - [`config`]: [`AppConfig`], resolved once at startup
//! - [`traits`]: [`ConfigManager`], the file/env config contract
//! - [`error`]: Error types and Result alias

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod lead;
pub mod traits;

// Re-export key types at crate root for convenience
pub use config::{AppConfig, ServerConfig, StoreConfig, SupabaseConfig, SupabaseEndpoint, VoiceConfig};
pub use error::{Error, Result};
pub use lead::{Lead, LeadId, Slug};
pub use traits::ConfigManager;
