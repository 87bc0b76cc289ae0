//! # API Module
//!
//! HTTP endpoints of the game server.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - redirects to Spotify's authorization page (PKCE + `state`)
//! - [`callback`] - verifies `state`, exchanges the code and installs the token
//!
//! ### Game
//!
//! - [`next`] - starts the next round and renders its year clue
//! - [`queue`] - shuffles a pool into the playback queue
//! - [`devices`] - lists the available playback devices
//!
//! ### Monitoring
//!
//! - [`health`] - application status and version
//!
//! Handlers receive the shared [`crate::server::AppState`] through an axum
//! `Extension` layer.

use axum::http::StatusCode;

use crate::{game::RoundError, spotify::ApiError};

mod callback;
mod game;
mod health;
mod templates;

pub use callback::{callback, login};
pub use game::{devices, next, queue};
pub use health::health;
pub use templates::PlayTemplate;

/// HTTP status reported for a failed round.
pub fn status_for(err: &RoundError) -> StatusCode {
    match err {
        RoundError::Api(ApiError::Unauthenticated) => StatusCode::UNAUTHORIZED,
        RoundError::Api(ApiError::Status { status: 429, .. }) => StatusCode::TOO_MANY_REQUESTS,
        RoundError::Api(ApiError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        RoundError::Api(_) => StatusCode::BAD_GATEWAY,
        RoundError::EmptyPool(_) => StatusCode::NOT_FOUND,
        RoundError::NoDevice => StatusCode::CONFLICT,
        RoundError::NoPool => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
