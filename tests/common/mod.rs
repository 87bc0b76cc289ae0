#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use hitstercli::{
    game::Session,
    spotify::{ApiError, SpotifyClient},
    types::{Device, Page, PoolItem, PoolRef, RemoteAlbum, RemoteTrack},
};
use rand::{SeedableRng, rngs::StdRng};

/// Remote call recorded by [`FakeSpotify`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Page { pool: PoolRef, limit: u32, offset: u32 },
    Devices,
    Play {
        uris: Vec<String>,
        device_id: String,
        position_ms: Option<u64>,
    },
    Queue { uri: String, device_id: String },
    Pause,
}

/// In-memory Spotify that serves a fixed pool and records every call.
#[derive(Default)]
pub struct FakeSpotify {
    pub items: Vec<PoolItem>,
    pub devices: Vec<Device>,
    pub fail_pages: bool,
    pub fail_play: bool,
    pub fail_pause: bool,
    pub fail_queue: Vec<String>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeSpotify {
    pub fn new(items: Vec<PoolItem>, devices: Vec<Device>) -> Self {
        Self {
            items,
            devices,
            ..Default::default()
        }
    }

    /// Pool of `n` numbered tracks, one speaker.
    pub fn with_tracks(n: usize) -> Self {
        let items = (0..n)
            .map(|i| item(&format!("Track {}", i), &format!("spotify:track:{}", i), 200_000, Some("2001-05-12")))
            .collect();
        Self::new(items, vec![device("dev-1", "Kitchen", false)])
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn pauses(&self) -> usize {
        self.count(|c| matches!(c, Call::Pause))
    }

    pub fn plays(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Play { .. }))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn rejected(message: &str) -> ApiError {
    ApiError::Status {
        status: 403,
        message: message.to_string(),
    }
}

impl SpotifyClient for FakeSpotify {
    async fn tracks_page(
        &self,
        pool: &PoolRef,
        limit: u32,
        offset: u32,
    ) -> Result<Page<PoolItem>, ApiError> {
        self.record(Call::Page {
            pool: pool.clone(),
            limit,
            offset,
        });
        if self.fail_pages {
            return Err(ApiError::Status {
                status: 404,
                message: "Resource not found".to_string(),
            });
        }

        let start = (offset as usize).min(self.items.len());
        let end = (start + limit as usize).min(self.items.len());
        Ok(Page {
            items: self.items[start..end].to_vec(),
            total: self.items.len() as u64,
        })
    }

    async fn devices(&self) -> Result<Vec<Device>, ApiError> {
        self.record(Call::Devices);
        Ok(self.devices.clone())
    }

    async fn play(
        &self,
        uris: &[String],
        device_id: &str,
        position_ms: Option<u64>,
    ) -> Result<(), ApiError> {
        self.record(Call::Play {
            uris: uris.to_vec(),
            device_id: device_id.to_string(),
            position_ms,
        });
        if self.fail_play {
            return Err(rejected("Player command failed: Premium required"));
        }
        Ok(())
    }

    async fn add_to_queue(&self, uri: &str, device_id: &str) -> Result<(), ApiError> {
        self.record(Call::Queue {
            uri: uri.to_string(),
            device_id: device_id.to_string(),
        });
        if self.fail_queue.iter().any(|u| u == uri) {
            return Err(rejected("Player command failed: Restriction violated"));
        }
        Ok(())
    }

    async fn pause(&self) -> Result<(), ApiError> {
        self.record(Call::Pause);
        if self.fail_pause {
            return Err(rejected("Player command failed: No active device found"));
        }
        Ok(())
    }
}

pub fn item(name: &str, uri: &str, duration_ms: u64, release_date: Option<&str>) -> PoolItem {
    PoolItem {
        track: Some(RemoteTrack {
            name: name.to_string(),
            uri: uri.to_string(),
            duration_ms,
            album: Some(RemoteAlbum {
                release_date: release_date.map(str::to_string),
            }),
        }),
    }
}

pub fn device(id: &str, name: &str, is_active: bool) -> Device {
    Device {
        id: id.to_string(),
        kind: "Speaker".to_string(),
        name: name.to_string(),
        is_active,
    }
}

pub fn fake_session(fake: FakeSpotify) -> (Arc<FakeSpotify>, Session<FakeSpotify>) {
    let client = Arc::new(fake);
    let session = Session::new(Arc::clone(&client)).with_rng(StdRng::seed_from_u64(7));
    (client, session)
}
