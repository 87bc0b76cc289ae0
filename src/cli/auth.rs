use std::sync::Arc;

use crate::{cli::build_session, config, error, server::AppState, spotify, success};

pub async fn auth() {
    let session = match build_session().await {
        Ok(session) => session,
        Err(e) => error!("Cannot prepare session: {}", e),
    };
    let pools = config::game_pools().unwrap_or_default();
    let state = Arc::new(AppState::new(session, pools));

    match spotify::auth::auth(state).await {
        Ok(_) => success!("Authentication successful! The token is cached for later commands."),
        Err(e) => error!("{}", e),
    }
}
