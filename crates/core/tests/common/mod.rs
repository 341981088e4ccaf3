//! Common test utilities for end-to-end testing against a mock realms service.
//!
//! Starts an in-process axum server that stands in for the authentication
//! endpoint, the realm listing, the download-link endpoint and the file host.
//! Every response is configurable and every request is recorded.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path as UrlPath, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use realmsync_core::testing::fixtures;
use realmsync_core::Config;

/// Canned response for one endpoint.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub content_type: &'static str,
}

impl MockResponse {
    pub fn json(value: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: value.to_string().into_bytes(),
            content_type: "application/json",
        }
    }

    pub fn bytes(body: Vec<u8>) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            content_type: "application/octet-stream",
        }
    }

    pub fn status(code: u16) -> Self {
        Self {
            status: StatusCode::from_u16(code).expect("valid status code"),
            body: Vec::new(),
            content_type: "text/plain",
        }
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self
    }
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}

/// A request received by the mock service.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub cookie: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json_body(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

struct MockState {
    auth: Mutex<MockResponse>,
    worlds: Mutex<MockResponse>,
    link: Mutex<MockResponse>,
    archive: Mutex<MockResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockState {
    fn record(&self, path: String, headers: &HeaderMap, body: &[u8]) {
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        self.requests.lock().unwrap().push(RecordedRequest {
            path,
            cookie,
            body: body.to_vec(),
        });
    }
}

/// Default auth response: token `T`, profile `N` / `ID`.
pub fn auth_ok() -> MockResponse {
    MockResponse::json(json!({
        "accessToken": "T",
        "clientToken": "github.com/air/minecraft-tools",
        "selectedProfile": { "name": "N", "id": "ID" }
    }))
}

/// Listing with `W1` at the default index 1.
pub fn worlds_ok() -> MockResponse {
    MockResponse::json(json!({
        "servers": [
            { "id": "W0", "name": "Creative", "owner": "N", "state": "OPEN" },
            { "id": "W1", "name": "Survival", "owner": "N", "state": "OPEN" }
        ]
    }))
}

/// In-process mock of every remote endpoint the pipeline talks to.
pub struct MockRealmsService {
    pub base_url: String,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockRealmsService {
    /// Start the service with responses for a successful run.
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock service");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let state = Arc::new(MockState {
            auth: Mutex::new(auth_ok()),
            worlds: Mutex::new(worlds_ok()),
            link: Mutex::new(MockResponse::json(json!({
                "downloadLink": format!("{}/files/world.tar.gz", base_url),
                "resourcePackUrl": null
            }))),
            archive: Mutex::new(MockResponse::bytes(fixtures::world_archive())),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/authenticate", post(authenticate))
            .route("/worlds", get(list_worlds))
            .route("/worlds/{id}/slot/{slot}/download", get(download_link))
            .route("/files/world.tar.gz", get(archive))
            .with_state(Arc::clone(&state));

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock service failed");
        });

        Self {
            base_url,
            state,
            handle,
        }
    }

    pub fn auth_url(&self) -> String {
        format!("{}/authenticate", self.base_url)
    }

    pub fn worlds_url(&self) -> String {
        format!("{}/worlds", self.base_url)
    }

    pub fn archive_url(&self) -> String {
        format!("{}/files/world.tar.gz", self.base_url)
    }

    pub fn set_auth(&self, response: MockResponse) {
        *self.state.auth.lock().unwrap() = response;
    }

    pub fn set_worlds(&self, response: MockResponse) {
        *self.state.worlds.lock().unwrap() = response;
    }

    pub fn set_link(&self, response: MockResponse) {
        *self.state.link.lock().unwrap() = response;
    }

    pub fn set_archive(&self, response: MockResponse) {
        *self.state.archive.lock().unwrap() = response;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Recorded request paths, in order.
    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    /// Pipeline config pointing at this service, with all local paths under `dir`.
    pub fn config(&self, dir: &Path) -> Config {
        let mut config = Config::default();
        config.auth.url = self.auth_url();
        config.auth.timeout_secs = 5;
        config.realms.url = self.worlds_url();
        config.realms.timeout_secs = 5;
        config.download.output_file = dir.join("world.tar.gz");
        config.download.timeout_secs = Some(5);
        config.unpack.dest_dir = dir.join("unpacked");
        config.publish.local_dir = dir.join("map");
        config.publish.remote_user = "maps".to_string();
        config.publish.remote_host = "example.org".to_string();
        config.publish.remote_path = "~/example.org/mc-map".to_string();
        config
    }
}

impl Drop for MockRealmsService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn authenticate(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> MockResponse {
    state.record("/authenticate".to_string(), &headers, &body);
    state.auth.lock().unwrap().clone()
}

async fn list_worlds(State(state): State<Arc<MockState>>, headers: HeaderMap) -> MockResponse {
    state.record("/worlds".to_string(), &headers, &[]);
    state.worlds.lock().unwrap().clone()
}

async fn download_link(
    State(state): State<Arc<MockState>>,
    UrlPath((id, slot)): UrlPath<(String, String)>,
    headers: HeaderMap,
) -> MockResponse {
    state.record(format!("/worlds/{}/slot/{}/download", id, slot), &headers, &[]);
    state.link.lock().unwrap().clone()
}

async fn archive(State(state): State<Arc<MockState>>, headers: HeaderMap) -> MockResponse {
    state.record("/files/world.tar.gz".to_string(), &headers, &[]);
    state.archive.lock().unwrap().clone()
}
