use crate::{
    game::PAGE_LIMIT,
    info,
    spotify::{ApiError, SpotifyClient},
    types::{PoolRef, Track},
};

/// Fetches every track of `pool`, page by page.
///
/// Requests pages of up to [`PAGE_LIMIT`] items at increasing offset until the
/// number of items received reaches the total the API reports. At least one
/// request is made, so an empty pool costs exactly one call.
///
/// Playlist entries without a track object (removed or local files) are skipped
/// while the offset still moves past them. A page that comes back empty before
/// the total is reached ends the fetch; the pool changed underneath us and
/// asking again would loop forever.
///
/// # Errors
///
/// Any remote error is returned as is. Nothing is retried.
pub async fn fetch_pool<C: SpotifyClient>(
    client: &C,
    pool: &PoolRef,
) -> Result<Vec<Track>, ApiError> {
    let mut tracks: Vec<Track> = Vec::new();
    let mut offset: u32 = 0;

    loop {
        let page = client.tracks_page(pool, PAGE_LIMIT, offset).await?;
        let received = page.items.len() as u32;
        offset += received;

        tracks.extend(page.items.into_iter().filter_map(|item| item.into_track()));

        if received == 0 || u64::from(offset) >= page.total {
            break;
        }
    }

    info!("there were {} tracks in {}", tracks.len(), pool);
    Ok(tracks)
}
