// ========================================================
// File: golive-core/src/platforms/twitch/requests/user.rs
// ========================================================
use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::platforms::twitch::client::TwitchHelixClient;

/// Response from "Get Users" endpoint.
#[derive(Debug, Deserialize)]
pub struct UsersResponse {
    pub data: Vec<UserData>,
}

/// Single user record.
#[derive(Debug, Deserialize)]
pub struct UserData {
    pub id: String,
    pub login: String,
    pub display_name: String,
}

/// Resolves Twitch logins to user records in one batched "Get Users" call.
/// Logins Twitch does not know are simply absent from the result.
pub async fn fetch_users(
    client: &TwitchHelixClient,
    bearer_token: &str,
    logins: &[String],
) -> Result<Vec<UserData>, Error> {
    let query = logins
        .iter()
        .map(|login| format!("login={}", urlencoding::encode(login)))
        .collect::<Vec<_>>()
        .join("&");
    let users_url = format!("https://api.twitch.tv/helix/users?{query}");

    let users_resp = client
        .http_client()
        .get(&users_url)
        .header("Client-Id", client.client_id())
        .header("Authorization", format!("Bearer {}", bearer_token))
        .send()
        .await
        .map_err(|e| Error::Provider(format!("fetch_users network error: {}", e)))?;

    if !users_resp.status().is_success() {
        let status = users_resp.status();
        let body_text = users_resp.text().await.unwrap_or_default();
        return Err(Error::Provider(format!(
            "fetch_users: HTTP {} => {}",
            status, body_text
        )));
    }

    let users_body = users_resp.text().await?;
    let users_data: UsersResponse = serde_json::from_str(&users_body)
        .map_err(|e| Error::Provider(format!("fetch_users parse error: {}", e)))?;

    debug!(
        "Get Users resolved {} of {} requested logins",
        users_data.data.len(),
        logins.len()
    );
    Ok(users_data.data)
}
