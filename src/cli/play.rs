use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    cli::{build_session, pools},
    error, info, success,
    utils::format_position,
    warning,
};

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Plays one snippet and waits until it has been paused again.
pub async fn round(pool: Option<String>) {
    let pools = match pools(pool) {
        Ok(pools) => pools,
        Err(e) => error!("Invalid pool: {}", e),
    };
    let mut session = match build_session().await {
        Ok(session) => session,
        Err(e) => error!("Cannot prepare session: {}", e),
    };

    let pb = spinner("Picking a track...");
    let result = session.pick_round(&pools).await;
    pb.finish_and_clear();

    let round = match result {
        Ok(round) => round,
        Err(e) => error!("Round failed: {}", e),
    };

    if let Some(e) = &round.play_error {
        warning!("Playback did not start: {}", e);
    } else {
        info!(
            "Listening on {} from {}...",
            round.device.name,
            format_position(round.position_ms)
        );
    }

    session.wait_for_stop().await;

    match round.track.year.as_deref() {
        Some(year) => success!("{} ({})", round.track.name, year),
        None => success!("{} (no release date)", round.track.name),
    }
}

/// Shuffles a pool into the playback queue.
pub async fn queue(pool: Option<String>) {
    let pool = match pools(pool).map(|p| p.into_iter().next()) {
        Ok(Some(pool)) => pool,
        Ok(None) => error!("No pool configured"),
        Err(e) => error!("Invalid pool: {}", e),
    };
    let mut session = match build_session().await {
        Ok(session) => session,
        Err(e) => error!("Cannot prepare session: {}", e),
    };

    let pb = spinner(&format!("Queueing {}...", pool));
    let result = session.shuffle_and_queue_all(&pool).await;
    pb.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e) => error!("Cannot queue {}: {}", pool, e),
    };

    if let Some(e) = &report.play_error {
        warning!("Playback did not start: {}", e);
    }
    for outcome in report.failed() {
        if let Err(e) = &outcome.result {
            warning!("{} was not queued: {}", outcome.uri, e);
        }
    }

    success!(
        "Playing {} tracks on {}, {} of {} more queued.",
        report.played.len(),
        report.device.name,
        report.succeeded(),
        report.enqueued.len()
    );
}
