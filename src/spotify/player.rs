use reqwest::{Client, header::CONTENT_LENGTH};

use crate::{
    spotify::{ApiError, check_status},
    types::{Device, DevicesResponse, PlayRequest},
};

/// Lists the playback devices currently registered for the account.
///
/// Devices without an id (restricted devices) cannot receive commands and are
/// left out.
pub async fn get_devices(
    client: &Client,
    api_url: &str,
    token: &str,
) -> Result<Vec<Device>, ApiError> {
    let response = client
        .get(format!("{uri}/me/player/devices", uri = api_url))
        .bearer_auth(token)
        .send()
        .await?;

    let devices = check_status(response)
        .await?
        .json::<DevicesResponse>()
        .await?;

    Ok(devices
        .devices
        .into_iter()
        .filter_map(|d| d.into_device())
        .collect())
}

/// Starts playback of `uris` on the device, optionally seeking into the first
/// track. Spotify rejects more than 50 URIs per call.
pub async fn play(
    client: &Client,
    api_url: &str,
    token: &str,
    uris: &[String],
    device_id: &str,
    position_ms: Option<u64>,
) -> Result<(), ApiError> {
    let body = PlayRequest {
        uris: uris.to_vec(),
        position_ms,
    };

    let response = client
        .put(format!("{uri}/me/player/play", uri = api_url))
        .query(&[("device_id", device_id)])
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?;

    check_status(response).await?;
    Ok(())
}

pub async fn add_to_queue(
    client: &Client,
    api_url: &str,
    token: &str,
    track_uri: &str,
    device_id: &str,
) -> Result<(), ApiError> {
    let response = client
        .post(format!("{uri}/me/player/queue", uri = api_url))
        .query(&[("uri", track_uri), ("device_id", device_id)])
        .bearer_auth(token)
        .header(CONTENT_LENGTH, 0)
        .send()
        .await?;

    check_status(response).await?;
    Ok(())
}

/// Pauses playback on whichever device the account is playing on.
pub async fn pause(client: &Client, api_url: &str, token: &str) -> Result<(), ApiError> {
    let response = client
        .put(format!("{uri}/me/player/pause", uri = api_url))
        .bearer_auth(token)
        .header(CONTENT_LENGTH, 0)
        .send()
        .await?;

    check_status(response).await?;
    Ok(())
}
