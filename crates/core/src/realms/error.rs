//! Error types for the realms module.

use thiserror::Error;

use crate::config::RealmSelector;

/// Errors that can occur when talking to the realms service.
#[derive(Debug, Error)]
pub enum RealmsError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("Realms API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded or lacked a required field.
    #[error("Malformed realms response: {0}")]
    MalformedResponse(String),

    /// Positional selection past the end of the listing.
    #[error("Realm index {index} out of range: account has {available} realm(s)")]
    IndexOutOfRange { index: usize, available: usize },

    /// No realm matched a name or id selector.
    #[error("No realm matches {selector}")]
    NoMatch { selector: RealmSelector },
}
