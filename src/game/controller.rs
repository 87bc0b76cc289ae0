use crate::{
    game::PLAY_BATCH_LIMIT,
    spotify::{ApiError, SpotifyClient},
    types::Device,
    warning,
};

/// Result of one enqueue call.
#[derive(Debug)]
pub struct EnqueueOutcome {
    pub uri: String,
    pub result: Result<(), ApiError>,
}

/// What a bulk queue did: the initial play batch and every enqueue after it.
#[derive(Debug)]
pub struct QueueReport {
    pub device: Device,
    pub played: Vec<String>,
    pub play_error: Option<ApiError>,
    pub enqueued: Vec<EnqueueOutcome>,
}

impl QueueReport {
    pub fn succeeded(&self) -> usize {
        self.enqueued.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &EnqueueOutcome> {
        self.enqueued.iter().filter(|o| o.result.is_err())
    }

    /// Tracks acted upon, initial batch included.
    pub fn total(&self) -> usize {
        self.played.len() + self.enqueued.len()
    }
}

/// Starts playback of `uris` on `device`, seeking to `position_ms` in the first
/// track. Only the first [`PLAY_BATCH_LIMIT`] URIs are sent.
///
/// A failure (no active session, free-tier restriction, ...) is logged and
/// returned; it never aborts the caller.
pub async fn play_immediate_selection<C: SpotifyClient>(
    client: &C,
    uris: &[String],
    device: &Device,
    position_ms: Option<u64>,
) -> Result<(), ApiError> {
    let batch = &uris[..uris.len().min(PLAY_BATCH_LIMIT)];
    let result = client.play(batch, &device.id, position_ms).await;
    if let Err(e) = &result {
        warning!("Cannot start playback on {}: {}", device.name, e);
    }
    result
}

/// Appends `uris` to the device's queue one call at a time, in order. Each call
/// is awaited before the next; a failure does not stop the rest.
pub async fn enqueue_batch<C: SpotifyClient>(
    client: &C,
    uris: &[String],
    device: &Device,
) -> Vec<EnqueueOutcome> {
    let mut outcomes = Vec::with_capacity(uris.len());
    for uri in uris {
        let result = client.add_to_queue(uri, &device.id).await;
        if let Err(e) = &result {
            warning!("Cannot queue {}: {}", uri, e);
        }
        outcomes.push(EnqueueOutcome {
            uri: uri.clone(),
            result,
        });
    }
    outcomes
}

pub async fn stop<C: SpotifyClient>(client: &C) -> Result<(), ApiError> {
    let result = client.pause().await;
    if let Err(e) = &result {
        warning!("Cannot pause playback: {}", e);
    }
    result
}
