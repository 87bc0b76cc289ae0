use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// PKCE verifier and anti-forgery state of one pending login, plus the token
/// once the callback has exchanged the code.
#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub state: String,
    pub token: Option<Token>,
}

/// Source of candidate tracks for a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolRef {
    /// A playlist, by its bare Spotify id.
    Playlist(String),
    /// The account's saved-tracks library.
    Favorites,
}

impl FromStr for PoolRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("pool reference must not be empty".to_string());
        }

        match s.to_lowercase().as_str() {
            "favorites" | "ft" | "liked" => return Ok(PoolRef::Favorites),
            _ => {}
        }

        if let Some(id) = s.strip_prefix("spotify:playlist:") {
            return non_empty_id(id);
        }

        if let Some(rest) = s
            .strip_prefix("https://open.spotify.com/playlist/")
            .or_else(|| s.strip_prefix("http://open.spotify.com/playlist/"))
        {
            let id = rest.split(['?', '/', '#']).next().unwrap_or_default();
            return non_empty_id(id);
        }

        Ok(PoolRef::Playlist(s.to_string()))
    }
}

fn non_empty_id(id: &str) -> Result<PoolRef, String> {
    if id.is_empty() {
        Err("playlist reference is missing its id".to_string())
    } else {
        Ok(PoolRef::Playlist(id.to_string()))
    }
}

impl fmt::Display for PoolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolRef::Playlist(id) => write!(f, "playlist {}", id),
            PoolRef::Favorites => write!(f, "saved tracks"),
        }
    }
}

/// A playable candidate of a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub name: String,
    pub uri: String,
    pub duration_ms: u64,
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub id: String,
    pub kind: String,
    pub name: String,
    pub is_active: bool,
}

#[derive(Tabled)]
pub struct DeviceTableRow {
    pub name: String,
    #[tabled(rename = "type")]
    pub kind: String,
    pub active: String,
    pub id: String,
}

/// One page of a paginated track listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// A saved-track or playlist entry. Both listings wrap the track object in a
/// `track` field; playlists report `null` for removed or local entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolItem {
    #[serde(default)]
    pub track: Option<RemoteTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteTrack {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub album: Option<RemoteAlbum>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteAlbum {
    #[serde(default)]
    pub release_date: Option<String>,
}

impl PoolItem {
    pub fn into_track(self) -> Option<Track> {
        let track = self.track?;
        let year = track
            .album
            .and_then(|a| a.release_date)
            .map(|date| release_label(&date))
            .filter(|label| !label.is_empty());

        Some(Track {
            name: track.name,
            uri: track.uri,
            duration_ms: track.duration_ms,
            year,
        })
    }
}

/// Shortens a release date to `YYYY-MM` (or `YYYY` for year precision dates).
pub fn release_label(date: &str) -> String {
    date.chars().take(7).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<RemoteDevice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDevice {
    pub id: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl RemoteDevice {
    pub fn into_device(self) -> Option<Device> {
        Some(Device {
            id: self.id?,
            kind: self.kind,
            name: self.name,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRequest {
    pub uris: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
