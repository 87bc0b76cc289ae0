//! # CLI Module
//!
//! Command implementations of `hitstercli`. Every command loads the
//! configuration, builds a [`WebApiClient`] from the token cache and drives a
//! [`Session`]; the output goes through the crate's log macros.
//!
//! ## Commands
//!
//! - [`auth`] - browser login, stores the token in the cache
//! - [`serve`] - game server with `/next` and `/queue`
//! - [`round`] - a single round from the terminal, waits for the stop
//! - [`queue`] - shuffles a pool into the playback queue
//! - [`devices`] - table of the available playback devices
//!
//! ## Usage
//!
//! ```bash
//! hitstercli auth                          # Authenticate with Spotify
//! hitstercli devices                       # Check a device is online
//! hitstercli round --pool favorites        # Play one snippet
//! hitstercli queue spotify:playlist:4Vxd…  # Shuffle a playlist into the queue
//! hitstercli serve                         # Play from the browser at /next
//! ```

use std::sync::Arc;

use crate::{
    config,
    game::Session,
    spotify::WebApiClient,
    types::PoolRef,
};

mod auth;
mod devices;
mod play;
mod serve;

pub use auth::auth;
pub use devices::devices;
pub use play::{queue, round};
pub use serve::serve;

/// Session configured from the environment, using the cached token.
async fn build_session() -> Result<Session<WebApiClient>, String> {
    let client = Arc::new(WebApiClient::from_cache(config::spotify_apiurl()).await);
    let clip_length = config::clip_length().map_err(|e| e.to_string())?;

    Ok(Session::new(client)
        .with_selector(config::device_selector())
        .with_clip_length(clip_length))
}

/// Pools to play from: the one given on the command line, else the configured ones.
fn pools(pool: Option<String>) -> Result<Vec<PoolRef>, String> {
    match pool {
        Some(raw) => Ok(vec![raw.parse::<PoolRef>()?]),
        None => config::game_pools().map_err(|e| e.to_string()),
    }
}
