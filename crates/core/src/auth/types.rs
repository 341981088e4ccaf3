use serde::{Deserialize, Serialize};
use std::fmt;

/// Account credentials supplied by the invoker.
///
/// Never persisted. `Debug` output hides the password.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authenticated session, discarded at process exit.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub display_name: String,
    pub account_id: String,
}

impl Session {
    /// Cookie header value expected by the realms service.
    pub fn cookie_header(&self, game_version: &str) -> String {
        format!(
            "sid=token:{}:{}; user={}; version={}",
            self.access_token, self.account_id, self.display_name, game_version
        )
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("display_name", &self.display_name)
            .field("account_id", &self.account_id)
            .finish()
    }
}

/// Body of the authentication request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthPayload<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub client_token: &'a str,
    pub agent: AgentDescriptor<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AgentDescriptor<'a> {
    pub name: &'a str,
    pub version: &'a str,
}

/// Body of a successful authentication response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    pub access_token: Option<String>,
    pub selected_profile: Option<SelectedProfile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SelectedProfile {
    pub name: Option<String>,
    pub id: Option<String>,
}
