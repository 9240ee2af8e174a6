//! Error types for cubox-sync.
//!
//! Provides structured error handling with:
//! - Category-based exit codes (6=sync/fetch, 7=config, 8=io)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use thiserror::Error;

/// Result type alias for cubox-sync operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cubox-sync operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not configured: domain and API key are required")]
    NotConfigured,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No folders found matching: {names}")]
    FoldersNotFound { names: String },

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("A sync run is already in progress")]
    SyncInProgress,

    #[error("Duplicate cubox-id property: {id} matches {count} pages")]
    DuplicateIdentity { id: String, count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Other(_) => 1,
            Self::Fetch(_)
            | Self::Store(_)
            | Self::Http(_)
            | Self::SyncInProgress
            | Self::DuplicateIdentity { .. } => 6,
            Self::NotConfigured | Self::Config(_) | Self::FoldersNotFound { .. } => 7,
            Self::Io(_) | Self::Json(_) => 8,
        }
    }

    /// Context-aware recovery hint for humans and scripts.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotConfigured => Some(
                "Set your Cubox credentials first:\n  \
                 cubox-sync config set domain cubox.pro\n  \
                 cubox-sync config set api-key <key>"
                    .to_string(),
            ),

            Self::FoldersNotFound { names } => Some(format!(
                "None of the configured folders ({names}) exist in your Cubox account. \
                 Run `cubox-sync folders` to list available folders."
            )),

            Self::SyncInProgress => {
                Some("Wait for the current run to finish before starting another.".to_string())
            }

            Self::DuplicateIdentity { id, .. } => Some(format!(
                "More than one Logseq page carries cubox-id {id}. \
                 Delete the duplicates, then sync again."
            )),

            Self::Fetch(_) | Self::Http(_) => Some(
                "Partial progress is kept; re-running the sync resumes from the last \
                 fully-processed page."
                    .to_string(),
            ),

            Self::Config(_) | Self::Store(_) | Self::Io(_) | Self::Json(_) | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let mut obj = serde_json::json!({
            "error": {
                "message": self.to_string(),
                "exit_code": self.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
