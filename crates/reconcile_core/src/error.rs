//! Store error type
//!
//! The store never returns these to its callers. Each one is rendered with
//! `to_string()` into the store's error message, so the `Display` text is
//! what the user reads.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Please upload all required files")]
    MissingFiles,

    #[error("No data to export")]
    NothingToExport,

    /// The backend answered with `success: false`
    #[error("{0}")]
    Rejected(String),

    #[error("{0:#}")]
    Transport(#[from] anyhow::Error),

    #[error("Draft is not valid JSON: {0}")]
    Draft(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Failure reported by the backend, with the generic fallback text
    pub fn rejected(message: Option<&str>) -> Self {
        match message {
            Some(m) if !m.is_empty() => StoreError::Rejected(m.to_string()),
            _ => StoreError::Rejected("Parsing failed".to_string()),
        }
    }
}
