//! Configuration management for the blind listening game.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, server settings and the game
//! settings (pools, snippet length, target device).
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use thiserror::Error;

use crate::{game::DeviceSelector, types::PoolRef};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3050";
pub const DEFAULT_CLIP_MS: u64 = 5000;

const DEFAULT_SCOPE: &str = "user-read-playback-state user-modify-playback-state \
user-read-currently-playing playlist-read-private playlist-read-collaborative user-library-read";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("cannot prepare config directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `hitstercli/.env`. Variables already present in the
/// process environment win over the file.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/hitstercli/.env`
/// - macOS: `~/Library/Application Support/hitstercli/.env`
/// - Windows: `%LOCALAPPDATA%/hitstercli/.env`
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created. A missing `.env`
/// file is not an error, every setting can come from the environment as well.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| ConfigError::Invalid {
            key: ".env",
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

/// Platform specific data directory of the application.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("hitstercli");
    path
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Returns the address the game server binds to, e.g. `127.0.0.1:3050`.
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the Spotify API client ID for authentication.
///
/// Retrieves the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable which
/// contains the client ID obtained when registering the application with
/// Spotify's developer platform. There is no default.
pub fn spotify_client_id() -> Result<String, ConfigError> {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_ID"))
}

/// Returns the Spotify OAuth redirect URI.
///
/// Must match the redirect URI registered in the Spotify application settings.
/// Defaults to the `/callback` route of the local server.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| format!("http://{}/callback", server_addr()))
}

/// Returns the space separated scope permissions requested at login.
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    var_or(
        "SPOTIFY_API_AUTH_URL",
        "https://accounts.spotify.com/authorize",
    )
}

pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", "https://api.spotify.com/v1")
}

pub fn spotify_apitoken_url() -> String {
    var_or(
        "SPOTIFY_API_TOKEN_URL",
        "https://accounts.spotify.com/api/token",
    )
}

/// Returns the pools a round may draw from.
///
/// Reads `HITSTER_POOLS`, a comma separated list of pool references
/// (`favorites`, playlist ids, `spotify:playlist:` URIs or playlist links).
/// Defaults to the saved-tracks library.
pub fn game_pools() -> Result<Vec<PoolRef>, ConfigError> {
    parse_pools(&var_or("HITSTER_POOLS", "favorites"))
}

pub fn parse_pools(raw: &str) -> Result<Vec<PoolRef>, ConfigError> {
    let pools = raw
        .split(',')
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            p.parse::<PoolRef>().map_err(|reason| ConfigError::Invalid {
                key: "HITSTER_POOLS",
                reason,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if pools.is_empty() {
        return Err(ConfigError::Invalid {
            key: "HITSTER_POOLS",
            reason: "no pool configured".to_string(),
        });
    }
    Ok(pools)
}

/// Returns how long a snippet plays before it is paused again.
pub fn clip_length() -> Result<Duration, ConfigError> {
    let raw = var_or("HITSTER_CLIP_MS", &DEFAULT_CLIP_MS.to_string());
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| ConfigError::Invalid {
            key: "HITSTER_CLIP_MS",
            reason: e.to_string(),
        })
}

/// Returns the device selection policy. `HITSTER_DEVICE` names a device to
/// always play on, otherwise the first listed device is used.
pub fn device_selector() -> DeviceSelector {
    match env::var("HITSTER_DEVICE") {
        Ok(name) if !name.trim().is_empty() => DeviceSelector::Named(name.trim().to_string()),
        _ => DeviceSelector::FirstListed,
    }
}
