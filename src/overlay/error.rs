//! Overlay errors
//!
//! Only the outer surfaces (configuration and trace files) can fail. Tracking,
//! gating and the enable policy have no error paths.

use thiserror::Error;

/// Errors that can occur around the overlay pipeline
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Trace error: {0}")]
    Trace(String),
}

/// Result type for overlay operations
pub type OverlayResult<T> = Result<T, OverlayError>;
