use serde::{Deserialize, Deserializer, Serialize};

/// One entry of the realm listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmSummary {
    /// Realm id; the service sends a number, older mocks a string.
    #[serde(default, deserialize_with = "id_as_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// The realm selected for this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmReference {
    pub world_id: String,
}

/// A single-use, time-limited backup download link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadDescriptor {
    pub download_link: String,
}

/// Body of `GET /worlds`.
#[derive(Debug, Deserialize)]
pub(crate) struct WorldListResponse {
    pub servers: Option<Vec<RealmSummary>>,
}

/// Body of `GET /worlds/{id}/slot/{slot}/download`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DownloadLinkResponse {
    pub download_link: Option<String>,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    }))
}
