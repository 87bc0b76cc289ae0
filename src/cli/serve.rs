use std::sync::Arc;

use crate::{
    cli::{build_session, pools},
    config, error, info,
    server::{AppState, start_api_server},
    warning,
};

pub async fn serve(pool: Option<String>) {
    let pools = match pools(pool) {
        Ok(pools) => pools,
        Err(e) => error!("Invalid pool configuration: {}", e),
    };
    let session = match build_session().await {
        Ok(session) => session,
        Err(e) => error!("Cannot prepare session: {}", e),
    };

    if !session.client().is_authenticated().await {
        warning!(
            "No cached token. Open http://{}/login to authenticate.",
            config::server_addr()
        );
    }
    for pool in &pools {
        info!("round pool: {}", pool);
    }

    let state = Arc::new(AppState::new(session, pools));
    if let Err(e) = start_api_server(state).await {
        error!("Server stopped: {}", e);
    }
}
