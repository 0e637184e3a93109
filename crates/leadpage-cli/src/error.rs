//! Error types for leadpage-cli

use thiserror::Error;

/// Result type alias for leadpage-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in leadpage-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from leadpage-core
    #[error(transparent)]
    Core(#[from] leadpage_core::Error),

    /// Error from leadpage-web
    #[error(transparent)]
    Web(#[from] leadpage_web::Error),

    /// Error from the call widget
    #[error("call widget: {0}")]
    Widget(#[from] leadpage_widget::WidgetError),

    /// Writing output failed
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// Serializing output failed
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
