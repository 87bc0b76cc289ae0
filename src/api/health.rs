use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::{game::SessionState, server::AppState};

/// Liveness plus login and round status.
pub async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    // a round holds the session lock while it talks to Spotify
    let (busy, playing) = match state.session.try_lock() {
        Ok(session) => (false, session.state() == SessionState::Playing),
        Err(_) => (true, false),
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "authenticated": state.client.is_authenticated().await,
        "playing": playing,
        "busy": busy,
    }))
}
