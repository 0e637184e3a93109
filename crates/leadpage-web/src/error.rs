//! Error types for leadpage-web

use thiserror::Error;

/// Result type alias for leadpage-web operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in leadpage-web
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from leadpage-core
    #[error("Core error: {0}")]
    Core(#[from] leadpage_core::Error),

    /// The listener could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address tried
        addr: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
