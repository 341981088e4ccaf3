//! Realms API client.

use std::time::Duration;

use reqwest::header::COOKIE;
use reqwest::{Client, Response};
use tracing::{debug, info};

use crate::auth::Session;
use crate::config::RealmsConfig;

use super::error::RealmsError;
use super::select::select_realm;
use super::types::{
    DownloadDescriptor, DownloadLinkResponse, RealmReference, RealmSummary, WorldListResponse,
};

/// Realms API client.
///
/// Every request carries the session cookie built from [`Session::cookie_header`].
pub struct RealmsClient {
    client: Client,
    config: RealmsConfig,
}

impl RealmsClient {
    /// Create a new realms client.
    pub fn new(config: RealmsConfig) -> Result<Self, RealmsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the listing URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    /// Make a cookie-authenticated GET request.
    async fn get(&self, session: &Session, url: &str) -> Result<Response, RealmsError> {
        debug!("Realms GET {}", url);

        let response = self
            .client
            .get(url)
            .header(COOKIE, session.cookie_header(&self.config.game_version))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RealmsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response)
    }

    /// List the realms hosted by the session's account.
    pub async fn list_worlds(&self, session: &Session) -> Result<Vec<RealmSummary>, RealmsError> {
        let response = self.get(session, self.base_url()).await?;

        let listing: WorldListResponse = response.json().await.map_err(|e| {
            RealmsError::MalformedResponse(format!("Failed to parse realm listing: {}", e))
        })?;

        listing
            .servers
            .ok_or_else(|| RealmsError::MalformedResponse("missing servers".to_string()))
    }

    /// List realms and pick the configured one.
    pub async fn locate(&self, session: &Session) -> Result<RealmReference, RealmsError> {
        let realms = self.list_worlds(session).await?;
        debug!("Account hosts {} realm(s)", realms.len());

        let reference = select_realm(&realms, &self.config.selector)?;
        info!(
            "Selected realm {} by {}",
            reference.world_id, self.config.selector
        );
        Ok(reference)
    }

    /// Request a download link for a backup slot of a realm.
    pub async fn download_link(
        &self,
        session: &Session,
        realm: &RealmReference,
        slot: &str,
    ) -> Result<DownloadDescriptor, RealmsError> {
        let url = format!("{}/{}/slot/{}/download", self.base_url(), realm.world_id, slot);
        let response = self.get(session, &url).await?;

        let body: DownloadLinkResponse = response.json().await.map_err(|e| {
            RealmsError::MalformedResponse(format!("Failed to parse download link: {}", e))
        })?;

        let download_link = body
            .download_link
            .ok_or_else(|| RealmsError::MalformedResponse("missing downloadLink".to_string()))?;

        debug!("Got download link for realm {} slot {}", realm.world_id, slot);
        Ok(DownloadDescriptor { download_link })
    }

    /// Backup slot configured for this run.
    pub fn backup_slot(&self) -> &str {
        &self.config.backup_slot
    }
}
