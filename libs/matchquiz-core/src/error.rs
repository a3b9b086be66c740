//! Error types for matchquiz-core.

use thiserror::Error;

/// Errors raised while loading a taxonomy file.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("invalid taxonomy format: {0}")]
    InvalidFormat(String),

    #[error("malformed taxonomy JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors raised while fetching a translation map.
#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("no translations for language {code}")]
    NotFound { code: String },

    #[error("invalid language code: {code:?}")]
    InvalidCode { code: String },

    #[error("malformed translations for {code}: {reason}")]
    Malformed { code: String, reason: String },

    #[error("failed to read translations for {code}: {reason}")]
    Io { code: String, reason: String },
}
