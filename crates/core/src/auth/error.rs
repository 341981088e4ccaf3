//! Error types for the auth module.

use thiserror::Error;

/// Errors that can occur while exchanging credentials for a session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service rejected the credentials (401/403).
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The service returned another non-success status.
    #[error("Authentication service error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response body lacked the token or profile fields.
    #[error("Malformed authentication response: {0}")]
    MalformedResponse(String),
}
