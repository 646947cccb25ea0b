// src/platforms/twitch/auth.rs
use chrono::{DateTime, Utc};
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::debug;

use crate::error::Error;

const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Request a fresh token this many seconds before the reported expiry, so a
/// token never goes stale mid-cycle.
const EXPIRY_MARGIN_SECS: i64 = 300;

#[derive(Deserialize)]
struct TwitchTokenResponse {
    access_token: String,
    expires_in: u64,
    token_type: String,
}

struct AppToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// App access token management for server-to-server Helix calls.
///
/// Uses the OAuth2 client-credentials grant: no user consent, no refresh
/// token. The token is cached together with its expiry and re-requested
/// whenever it is missing or close to expiring.
pub struct TwitchAppAuth {
    client_id: String,
    client_secret: String,
    token: Option<AppToken>,
}

impl TwitchAppAuth {
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token: None,
        }
    }

    /// Returns a currently valid app access token, hitting the token
    /// endpoint only when the cached one is absent or about to expire.
    pub async fn access_token(&mut self, http: &ReqwestClient) -> Result<String, Error> {
        if let Some(tok) = &self.token {
            if tok.expires_at > Utc::now() + chrono::Duration::seconds(EXPIRY_MARGIN_SECS) {
                return Ok(tok.access_token.clone());
            }
        }

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let resp = http
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::Auth(format!("HTTP error requesting app token: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Auth(format!("Twitch token endpoint error: {e}")))?
            .json::<TwitchTokenResponse>()
            .await
            .map_err(|e| Error::Auth(format!("Parse error on token JSON: {e}")))?;

        let expires_at = Utc::now() + chrono::Duration::seconds(resp.expires_in as i64);
        debug!(
            "obtained {} app token, expires_in={}s",
            resp.token_type, resp.expires_in
        );
        self.token = Some(AppToken {
            access_token: resp.access_token.clone(),
            expires_at,
        });
        Ok(resp.access_token)
    }
}
