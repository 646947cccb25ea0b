// ========================================================
// File: golive-core/src/platforms/twitch/requests/stream.rs
// ========================================================
use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::platforms::twitch::client::TwitchHelixClient;

/// Response from "Get Streams" endpoint.
#[derive(Debug, Deserialize)]
pub struct StreamsResponse {
    pub data: Vec<StreamData>,
}

/// Single stream data record. Only currently live streams are returned by
/// the endpoint; anyone absent from `data` is not streaming.
#[derive(Debug, Deserialize)]
pub struct StreamData {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub game_name: String,
    #[serde(rename = "type")]
    pub type_field: String, // "live", or empty on error
    pub title: String,
}

/// Fetches the live streams among the given Twitch user ids in one batched
/// "Get Streams" call (Helix accepts up to 100 ids per request).
pub async fn fetch_streams(
    client: &TwitchHelixClient,
    bearer_token: &str,
    user_ids: &[String],
) -> Result<Vec<StreamData>, Error> {
    // The default page size is 20; ask for the full batch so no live stream
    // is dropped when many tracked accounts are live at once.
    let query = user_ids
        .iter()
        .map(|id| format!("user_id={}", urlencoding::encode(id)))
        .collect::<Vec<_>>()
        .join("&");
    let streams_url = format!("https://api.twitch.tv/helix/streams?first=100&{query}");

    let streams_resp = client
        .http_client()
        .get(&streams_url)
        .header("Client-Id", client.client_id())
        .header("Authorization", format!("Bearer {}", bearer_token))
        .send()
        .await
        .map_err(|e| Error::Provider(format!("fetch_streams network error: {}", e)))?;

    if !streams_resp.status().is_success() {
        let status = streams_resp.status();
        let body_text = streams_resp.text().await.unwrap_or_default();
        return Err(Error::Provider(format!(
            "fetch_streams: HTTP {} => {}",
            status, body_text
        )));
    }

    let streams_body = streams_resp.text().await?;
    let streams_data: StreamsResponse = serde_json::from_str(&streams_body)
        .map_err(|e| Error::Provider(format!("fetch_streams parse error: {}", e)))?;

    debug!(
        "Get Streams returned {} live entries for {} requested ids",
        streams_data.data.len(),
        user_ids.len()
    );
    Ok(streams_data.data)
}
