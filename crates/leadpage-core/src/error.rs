//! Error types for leadpage-core.

use std::path::{Path, PathBuf};

/// Errors shared by all Leadpage crates.
///
/// Lookup failures are split into [`Error::NotFound`] (an expected outcome
/// that maps to a 404) and [`Error::Backend`] (a transport or query fault
/// that is logged and then shown to the user like a 404).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No lead matches the slug.
    #[error("Lead not found: {slug}")]
    NotFound {
        /// Slug that was looked up
        slug: String,
    },

    /// The lead backend could not be queried.
    #[error("Backend error: {message}")]
    Backend {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A required configuration value is absent.
    #[error("Missing configuration: {key}")]
    ConfigMissing {
        /// Configuration key (or environment variable) that is missing
        key: String,
    },

    /// Configuration is present but invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// Input validation error.
    #[error("Validation error: {message}")]
    Validation {
        /// What went wrong
        message: String,
    },

    /// I/O error, optionally tied to a path.
    #[error("I/O error{}: {source}", display_path(.path))]
    Io {
        /// Path involved in the failed operation
        path: Option<PathBuf>,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" at {}", p.display()))
        .unwrap_or_default()
}

/// Convenience `Result` type alias for Leadpage operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a not-found error for a slug.
    pub fn not_found<S: Into<String>>(slug: S) -> Self {
        Error::NotFound { slug: slug.into() }
    }

    /// Creates a backend error with a message.
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Error::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a backend error with a message and source error.
    pub fn backend_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Backend {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a missing-configuration error.
    pub fn config_missing<S: Into<String>>(key: S) -> Self {
        Error::ConfigMissing { key: key.into() }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path it occurred on.
    pub fn io_with_path(source: std::io::Error, path: &Path) -> Self {
        Error::Io {
            path: Some(path.to_path_buf()),
            source,
        }
    }

    /// Returns `true` if the user should see the not-found view for this error.
    ///
    /// Backend faults and missing configuration fail closed: the visitor gets
    /// the same 404 as for an unknown slug.
    pub fn is_not_found_for_user(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. }
                | Error::Backend { .. }
                | Error::ConfigMissing { .. }
                | Error::Validation { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { path: None, source }
    }
}
