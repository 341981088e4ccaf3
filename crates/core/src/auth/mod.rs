//! Account authentication.
//!
//! Exchanges [`Credentials`] for a [`Session`] with a single request to the
//! account service. There is no token refresh: a session lives for one run.

mod client;
mod error;
mod types;

pub use client::Authenticator;
pub use error::AuthError;
pub use types::{Credentials, Session};
