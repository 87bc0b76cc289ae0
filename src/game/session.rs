use std::{sync::Arc, time::Duration};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tokio::task::JoinHandle;

use crate::{
    config::DEFAULT_CLIP_MS,
    game::{
        DeviceSelector, PLAY_BATCH_LIMIT, QUEUE_LIMIT, QueueReport, RoundError, controller,
        device, pool, shuffle_with,
    },
    info,
    spotify::{ApiError, SpotifyClient},
    types::{Device, PoolRef, Track},
    utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No snippet is playing, or its stop already fired.
    Idle,
    /// A snippet was started and its stop timer is pending.
    Playing,
}

/// A started round.
#[derive(Debug)]
pub struct Round {
    pub pool: PoolRef,
    pub track: Track,
    pub device: Device,
    pub position_ms: u64,
    /// Set when the play call failed; the round still completed.
    pub play_error: Option<ApiError>,
}

impl Round {
    /// The clue shown to players, empty when the album has no release date.
    pub fn year_label(&self) -> &str {
        self.track.year.as_deref().unwrap_or("")
    }

    pub fn is_degraded(&self) -> bool {
        self.play_error.is_some()
    }
}

/// Game session: owns the remote client and the one stop timer.
///
/// Rounds run through `&mut self`, so a session is driven by one caller at a
/// time. At most one stop timer exists; [`Session::start_round`] cancels a pending
/// one before doing anything else.
pub struct Session<C> {
    client: Arc<C>,
    selector: DeviceSelector,
    clip_length: Duration,
    rng: StdRng,
    stop_timer: Option<JoinHandle<()>>,
}

impl<C: SpotifyClient> Session<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            selector: DeviceSelector::default(),
            clip_length: Duration::from_millis(DEFAULT_CLIP_MS),
            rng: StdRng::from_os_rng(),
            stop_timer: None,
        }
    }

    pub fn with_selector(mut self, selector: DeviceSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_clip_length(mut self, clip_length: Duration) -> Self {
        self.clip_length = clip_length;
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn selector(&self) -> &DeviceSelector {
        &self.selector
    }

    pub fn state(&self) -> SessionState {
        match &self.stop_timer {
            Some(handle) if !handle.is_finished() => SessionState::Playing,
            _ => SessionState::Idle,
        }
    }

    /// Aborts a pending stop timer. Returns whether one was still pending.
    pub fn cancel_stop_timer(&mut self) -> bool {
        match self.stop_timer.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Starts a round on one of `pools`, chosen uniformly.
    pub async fn pick_round(&mut self, pools: &[PoolRef]) -> Result<Round, RoundError> {
        let pool = pools.choose(&mut self.rng).cloned().ok_or(RoundError::NoPool)?;
        self.start_round(&pool).await
    }

    /// Plays a random snippet of a random track of `pool`.
    ///
    /// Cancels the previous round's stop timer first, then fetches the pool,
    /// picks a track, resolves the device and starts playback at
    /// [`random_offset`]. A new stop timer pauses playback after the clip length.
    ///
    /// # Errors
    ///
    /// Fetch and device-list errors, an empty pool and a missing device fail the
    /// round before anything is played. A failing play call does not: the round
    /// is returned with [`Round::play_error`] set and the timer still armed.
    pub async fn start_round(&mut self, pool: &PoolRef) -> Result<Round, RoundError> {
        if self.cancel_stop_timer() {
            info!("previous round superseded, its stop was cancelled");
        }

        let tracks = pool::fetch_pool(self.client.as_ref(), pool).await?;
        let track = tracks
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| RoundError::EmptyPool(pool.clone()))?;

        let device = device::resolve_device(self.client.as_ref(), &self.selector).await?;
        let position_ms = random_offset(track.duration_ms, &mut self.rng);

        let uris = [track.uri.clone()];
        let play_error = controller::play_immediate_selection(
            self.client.as_ref(),
            &uris,
            &device,
            Some(position_ms),
        )
        .await
        .err();

        self.arm_stop_timer();
        info!(
            "playing {} from {} on {}",
            track.name,
            utils::format_position(position_ms),
            device.name
        );

        Ok(Round {
            pool: pool.clone(),
            track,
            device,
            position_ms,
            play_error,
        })
    }

    /// Queues the whole pool in random order for continuous playback.
    ///
    /// The first [`PLAY_BATCH_LIMIT`] shuffled tracks start playing right away,
    /// the following ones up to [`QUEUE_LIMIT`] are enqueued one by one. The
    /// round stop timer is left alone.
    ///
    /// # Errors
    ///
    /// Fetch and device-list errors, an empty pool and a missing device. Player
    /// errors are reported per call inside the [`QueueReport`].
    pub async fn shuffle_and_queue_all(
        &mut self,
        pool: &PoolRef,
    ) -> Result<QueueReport, RoundError> {
        let tracks = pool::fetch_pool(self.client.as_ref(), pool).await?;
        if tracks.is_empty() {
            return Err(RoundError::EmptyPool(pool.clone()));
        }

        let uris: Vec<String> = tracks.into_iter().map(|t| t.uri).collect();
        let uris = shuffle_with(&uris, &mut self.rng);

        let device = device::resolve_device(self.client.as_ref(), &self.selector).await?;

        let head = &uris[..uris.len().min(PLAY_BATCH_LIMIT)];
        let play_error =
            controller::play_immediate_selection(self.client.as_ref(), head, &device, None)
                .await
                .err();

        let end = uris.len().min(QUEUE_LIMIT);
        let tail = uris.get(head.len()..end).unwrap_or_default();
        let enqueued = controller::enqueue_batch(self.client.as_ref(), tail, &device).await;

        Ok(QueueReport {
            device,
            played: head.to_vec(),
            play_error,
            enqueued,
        })
    }

    /// Waits until a pending stop timer has paused playback.
    pub async fn wait_for_stop(&mut self) {
        if let Some(handle) = self.stop_timer.take() {
            let _ = handle.await;
        }
    }

    fn arm_stop_timer(&mut self) {
        debug_assert!(self.state() == SessionState::Idle);

        let client = Arc::clone(&self.client);
        let delay = self.clip_length;
        self.stop_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = controller::stop(client.as_ref()).await;
        }));
    }
}

impl<C> Drop for Session<C> {
    fn drop(&mut self) {
        if let Some(handle) = self.stop_timer.take() {
            handle.abort();
        }
    }
}

/// Start position for a snippet of a `duration_ms` long track: uniform within
/// the middle 80 %, i.e. `[⌈0.1·D⌉, ⌊0.9·D⌋]`. Zero for an empty duration.
pub fn random_offset<R: Rng + ?Sized>(duration_ms: u64, rng: &mut R) -> u64 {
    let lo = duration_ms.div_ceil(10);
    let hi = (u128::from(duration_ms) * 9 / 10) as u64;
    if lo > hi {
        return duration_ms / 2;
    }
    rng.random_range(lo..=hi)
}
