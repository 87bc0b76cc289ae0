//! # Spotify Integration Module
//!
//! This module is the integration layer between the game and the Spotify Web API.
//! It handles HTTP communication, the OAuth flow and the translation of remote
//! responses into the crate's own types.
//!
//! ## Architecture
//!
//! ```text
//! Game Layer (Session, Controller, Fetcher)
//!          ↓
//! SpotifyClient port (this module)
//!     ├── Authentication (OAuth 2.0 PKCE)
//!     ├── Track listings (saved tracks, playlists)
//!     └── Player (devices, play, queue, pause)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! The game never talks HTTP itself. It depends on [`SpotifyClient`], which
//! names exactly the five remote capabilities a round needs. [`WebApiClient`] is
//! the production implementation; tests substitute a recording fake.
//!
//! ## Error Handling
//!
//! All remote calls return [`ApiError`]. Nothing in this module retries: rate
//! limits, expired sessions and unknown playlists are reported to the caller,
//! which decides whether the round can continue.
//!
//! ## API Coverage
//!
//! - `GET /me/tracks` - saved tracks, paginated by limit/offset
//! - `GET /playlists/{id}/tracks` - playlist entries, paginated by limit/offset
//! - `GET /me/player/devices` - available playback devices
//! - `PUT /me/player/play` - start playback of a URI list
//! - `POST /me/player/queue` - append one URI to the queue
//! - `PUT /me/player/pause` - pause playback
//! - `POST /api/token` - token exchange and refresh

use std::{future::Future, sync::Arc};

use reqwest::{Client, Response};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    config::ConfigError,
    management::TokenManager,
    types::{Device, ErrorResponse, Page, PoolItem, PoolRef},
};

pub mod auth;
pub mod player;
pub mod tracks;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not authenticated, run `hitstercli auth` or open /login first")]
    Unauthenticated,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("spotify responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Remote capabilities the game depends on.
///
/// Implementations live in this module (production) or in test fakes.
pub trait SpotifyClient: Send + Sync + 'static {
    /// One page of the pool's track listing.
    fn tracks_page(
        &self,
        pool: &PoolRef,
        limit: u32,
        offset: u32,
    ) -> impl Future<Output = Result<Page<PoolItem>, ApiError>> + Send;

    fn devices(&self) -> impl Future<Output = Result<Vec<Device>, ApiError>> + Send;

    fn play(
        &self,
        uris: &[String],
        device_id: &str,
        position_ms: Option<u64>,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn add_to_queue(
        &self,
        uri: &str,
        device_id: &str,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn pause(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// [`SpotifyClient`] backed by the Spotify Web API.
///
/// Holds the token manager behind a shared mutex so the OAuth callback can
/// install a token into a client the session already owns.
#[derive(Clone)]
pub struct WebApiClient {
    http: Client,
    api_url: String,
    tokens: Arc<Mutex<Option<TokenManager>>>,
}

impl WebApiClient {
    pub fn new(api_url: String) -> Self {
        Self {
            http: Client::new(),
            api_url,
            tokens: Arc::new(Mutex::new(None)),
        }
    }

    /// Client using the token cached by a previous login, if there is one.
    pub async fn from_cache(api_url: String) -> Self {
        let client = Self::new(api_url);
        if let Ok(manager) = TokenManager::load().await {
            client.install(manager).await;
        }
        client
    }

    pub async fn install(&self, manager: TokenManager) {
        *self.tokens.lock().await = Some(manager);
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens.lock().await.is_some()
    }

    async fn access_token(&self) -> Result<String, ApiError> {
        let mut tokens = self.tokens.lock().await;
        match tokens.as_mut() {
            Some(manager) => Ok(manager.get_valid_token().await),
            None => Err(ApiError::Unauthenticated),
        }
    }
}

impl SpotifyClient for WebApiClient {
    async fn tracks_page(
        &self,
        pool: &PoolRef,
        limit: u32,
        offset: u32,
    ) -> Result<Page<PoolItem>, ApiError> {
        let token = self.access_token().await?;
        tracks::get_tracks_page(&self.http, &self.api_url, &token, pool, limit, offset).await
    }

    async fn devices(&self) -> Result<Vec<Device>, ApiError> {
        let token = self.access_token().await?;
        player::get_devices(&self.http, &self.api_url, &token).await
    }

    async fn play(
        &self,
        uris: &[String],
        device_id: &str,
        position_ms: Option<u64>,
    ) -> Result<(), ApiError> {
        let token = self.access_token().await?;
        player::play(
            &self.http,
            &self.api_url,
            &token,
            uris,
            device_id,
            position_ms,
        )
        .await
    }

    async fn add_to_queue(&self, uri: &str, device_id: &str) -> Result<(), ApiError> {
        let token = self.access_token().await?;
        player::add_to_queue(&self.http, &self.api_url, &token, uri, device_id).await
    }

    async fn pause(&self) -> Result<(), ApiError> {
        let token = self.access_token().await?;
        player::pause(&self.http, &self.api_url, &token).await
    }
}

/// Turns a non-2xx response into [`ApiError::Status`], keeping the message
/// Spotify puts into its error body.
pub(crate) async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => err.error.message,
        Err(_) if body.is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        Err(_) => body,
    };

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}
