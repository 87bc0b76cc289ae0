use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::sync::Mutex;

use crate::{
    Res, api, config,
    game::Session,
    info,
    spotify::WebApiClient,
    types::{PkceToken, PoolRef},
};

/// Everything the HTTP handlers share.
pub struct AppState {
    pub pkce: Mutex<Option<PkceToken>>,
    pub client: Arc<WebApiClient>,
    pub session: Mutex<Session<WebApiClient>>,
    pub pools: Vec<PoolRef>,
}

impl AppState {
    pub fn new(session: Session<WebApiClient>, pools: Vec<PoolRef>) -> Self {
        Self {
            pkce: Mutex::new(None),
            client: Arc::clone(session.client()),
            session: Mutex::new(session),
            pools,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/next", get(api::next))
        .route("/queue", get(api::queue))
        .route("/devices", get(api::devices))
        .layer(Extension(state))
}

pub async fn start_api_server(state: Arc<AppState>) -> Res<()> {
    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| format!("Failed to parse server address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{}/login", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
