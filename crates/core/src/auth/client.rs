//! Authentication service client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::config::AuthConfig;

use super::error::AuthError;
use super::types::{AgentDescriptor, AuthPayload, AuthResponse, Credentials, Session};

/// Client for the account authentication endpoint.
pub struct Authenticator {
    client: Client,
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator.
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Exchange credentials for a session.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let payload = AuthPayload {
            username: &credentials.username,
            password: &credentials.password,
            client_token: &self.config.client_token,
            agent: AgentDescriptor {
                name: &self.config.agent_name,
                version: &self.config.agent_version,
            },
        };

        debug!(
            "Authenticating '{}' against {}",
            credentials.username, self.config.url
        );

        let response = self
            .client
            .post(&self.config.url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::InvalidCredentials(error_message(&body, status)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: AuthResponse = response.json().await.map_err(|e| {
            AuthError::MalformedResponse(format!("Failed to parse response body: {}", e))
        })?;

        let session = into_session(body)?;
        info!("Authenticated as {}", session.display_name);
        Ok(session)
    }
}

fn into_session(body: AuthResponse) -> Result<Session, AuthError> {
    let access_token = body
        .access_token
        .ok_or_else(|| AuthError::MalformedResponse("missing accessToken".to_string()))?;
    let profile = body
        .selected_profile
        .ok_or_else(|| AuthError::MalformedResponse("missing selectedProfile".to_string()))?;
    let display_name = profile
        .name
        .ok_or_else(|| AuthError::MalformedResponse("missing selectedProfile.name".to_string()))?;
    let account_id = profile
        .id
        .ok_or_else(|| AuthError::MalformedResponse("missing selectedProfile.id".to_string()))?;

    Ok(Session {
        access_token,
        display_name,
        account_id,
    })
}

/// Prefer the service's `errorMessage` field over the raw body.
fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("errorMessage").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| format!("HTTP {}", status))
}
