// src/platforms/twitch/provider.rs
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::error::Error;
use crate::models::{AccountSnapshot, SnapshotSet};
use crate::platforms::StreamStatusProvider;
use crate::platforms::twitch::auth::TwitchAppAuth;
use crate::platforms::twitch::client::TwitchHelixClient;
use crate::platforms::twitch::requests::{stream, user};

/// Helix-backed status provider.
///
/// Construction performs no I/O: the app token is requested on first use and
/// the configured logins are resolved to user ids on the first successful
/// fetch, so every network failure stays a recoverable per-cycle error.
pub struct TwitchStatusProvider {
    client: TwitchHelixClient,
    auth: Mutex<TwitchAppAuth>,
    // login -> user id, resolved once and cached
    user_ids: Mutex<Option<HashMap<String, String>>>,
}

impl TwitchStatusProvider {
    pub fn new(app_id: &str, app_secret: &str) -> Self {
        Self {
            client: TwitchHelixClient::new(app_id),
            auth: Mutex::new(TwitchAppAuth::new(app_id, app_secret)),
            user_ids: Mutex::new(None),
        }
    }

    async fn ensure_user_ids(
        &self,
        bearer_token: &str,
        accounts: &[String],
    ) -> Result<HashMap<String, String>, Error> {
        let mut cached = self.user_ids.lock().await;
        if let Some(map) = cached.as_ref() {
            return Ok(map.clone());
        }

        let users = user::fetch_users(&self.client, bearer_token, accounts).await?;
        let mut map = HashMap::new();
        for u in users {
            map.insert(u.login.to_lowercase(), u.id);
        }
        for login in accounts {
            if !map.contains_key(login) {
                warn!("Twitch does not know login '{login}'; it will always report as offline");
            }
        }
        *cached = Some(map.clone());
        Ok(map)
    }
}

#[async_trait]
impl StreamStatusProvider for TwitchStatusProvider {
    async fn fetch_statuses(&self, accounts: &[String]) -> Result<SnapshotSet, Error> {
        let bearer_token = {
            let mut auth = self.auth.lock().await;
            auth.access_token(&self.client.http_client()).await?
        };

        let ids = self.ensure_user_ids(&bearer_token, accounts).await?;
        let user_ids: Vec<String> = accounts
            .iter()
            .filter_map(|login| ids.get(login).cloned())
            .collect();

        // An id-less "Get Streams" call would return the global top streams,
        // so skip the call entirely when no login resolved.
        let live = if user_ids.is_empty() {
            Vec::new()
        } else {
            stream::fetch_streams(&self.client, &bearer_token, &user_ids).await?
        };

        Ok(snapshot_from_streams(accounts, live))
    }
}

/// Normalizes one "Get Streams" result into a full snapshot set: every
/// tracked account gets an entry, with accounts absent from the live list
/// reported as explicit offline entries.
fn snapshot_from_streams(accounts: &[String], live: Vec<stream::StreamData>) -> SnapshotSet {
    let mut by_login: HashMap<String, stream::StreamData> = live
        .into_iter()
        .map(|s| (s.user_login.to_lowercase(), s))
        .collect();

    accounts
        .iter()
        .map(|login| {
            let snapshot = match by_login.remove(login) {
                Some(s) if s.type_field == "live" => {
                    AccountSnapshot::live(&s.user_name, &s.game_name, &s.title)
                }
                _ => AccountSnapshot::offline(),
            };
            (login.clone(), snapshot)
        })
        .collect()
}
