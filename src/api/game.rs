use std::sync::Arc;

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    api::{PlayTemplate, status_for},
    game::{QueueReport, RoundError},
    server::AppState,
    spotify::{ApiError, SpotifyClient},
    types::PoolRef,
    warning,
};

/// Starts the next round and renders its year clue.
pub async fn next(Extension(state): Extension<Arc<AppState>>) -> Response {
    let result = {
        let mut session = state.session.lock().await;
        session.pick_round(&state.pools).await
    };

    match result {
        Ok(round) => PlayTemplate::clue(round.year_label()).into_response(),
        Err(e) => {
            warning!("Round failed: {}", e);
            (status_for(&e), PlayTemplate::notice(e.to_string())).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QueueParams {
    pub pool: Option<String>,
}

/// Shuffles a pool into the playback queue. Without `pool` the first
/// configured pool is used.
pub async fn queue(
    Query(params): Query<QueueParams>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    let pool = match params.pool.as_deref() {
        Some(raw) => match raw.parse::<PoolRef>() {
            Ok(pool) => pool,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, Json(json!({ "error": e }))).into_response();
            }
        },
        None => match state.pools.first() {
            Some(pool) => pool.clone(),
            None => return round_error(RoundError::NoPool),
        },
    };

    let result = {
        let mut session = state.session.lock().await;
        session.shuffle_and_queue_all(&pool).await
    };

    match result {
        Ok(report) => Json(queue_summary(&report)).into_response(),
        Err(e) => round_error(e),
    }
}

pub async fn devices(Extension(state): Extension<Arc<AppState>>) -> Response {
    match state.client.devices().await {
        Ok(devices) => Json(devices).into_response(),
        Err(e) => round_error(RoundError::Api(e)),
    }
}

fn round_error(e: RoundError) -> Response {
    warning!("{}", e);
    (status_for(&e), Json(json!({ "error": e.to_string() }))).into_response()
}

pub fn queue_summary(report: &QueueReport) -> serde_json::Value {
    let failed: Vec<_> = report
        .failed()
        .map(|o| {
            json!({
                "uri": o.uri,
                "error": o.result.as_ref().err().map(ApiError::to_string),
            })
        })
        .collect();

    json!({
        "device": report.device.name,
        "played": report.played.len(),
        "play_error": report.play_error.as_ref().map(ApiError::to_string),
        "enqueued": report.succeeded(),
        "failed": failed,
    })
}
