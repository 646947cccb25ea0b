// src/platforms/twitch/client.rs

use std::sync::Arc;

use reqwest::Client as ReqwestClient;

/// A small wrapper client for calling various Helix endpoints.
///
/// Holds the shared HTTP client and the app client id; the bearer token is
/// passed into each request function because the app token rotates.
pub struct TwitchHelixClient {
    http: Arc<ReqwestClient>,
    client_id: String,
}

impl TwitchHelixClient {
    pub fn new(client_id: &str) -> Self {
        Self {
            http: Arc::new(ReqwestClient::new()),
            client_id: client_id.to_string(),
        }
    }

    /// Expose the client_id for Helix requests that require it.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns an `Arc<ReqwestClient>` reference for advanced usage.
    pub fn http_client(&self) -> Arc<ReqwestClient> {
        self.http.clone()
    }
}
