use reqwest::Client;

use crate::{
    spotify::{ApiError, check_status},
    types::{Page, PoolItem, PoolRef},
};

/// Retrieves one page of a pool's track listing from the Spotify Web API.
///
/// Saved tracks come from `/me/tracks`, playlists from `/playlists/{id}/tracks`.
/// Both endpoints page by `limit`/`offset` and report the pool's `total`, and both
/// wrap every track object in an item with a `track` field, so one response type
/// serves both.
///
/// # Arguments
///
/// * `client` - HTTP client used for the request
/// * `api_url` - Base URL of the Web API, e.g. `https://api.spotify.com/v1`
/// * `token` - Valid access token for Spotify API authentication
/// * `pool` - Which listing to read
/// * `limit` - Maximum number of items to return in this request (1-50)
/// * `offset` - Index of the first item to return
///
/// # Errors
///
/// Network failures and non-2xx responses (rate limiting, expired token,
/// unknown playlist id) are returned as [`ApiError`]. There is no retry.
pub async fn get_tracks_page(
    client: &Client,
    api_url: &str,
    token: &str,
    pool: &PoolRef,
    limit: u32,
    offset: u32,
) -> Result<Page<PoolItem>, ApiError> {
    let endpoint = match pool {
        PoolRef::Favorites => format!("{uri}/me/tracks", uri = api_url),
        PoolRef::Playlist(id) => format!("{uri}/playlists/{id}/tracks", uri = api_url, id = id),
    };

    let response = client
        .get(&endpoint)
        .query(&[("limit", limit), ("offset", offset)])
        .bearer_auth(token)
        .send()
        .await?;

    let page = check_status(response)
        .await?
        .json::<Page<PoolItem>>()
        .await?;
    Ok(page)
}
