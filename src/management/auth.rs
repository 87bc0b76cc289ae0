use std::path::PathBuf;

use chrono::Utc;

use crate::{config, spotify, types::Token, warning};

/// Seconds before the reported expiry at which a token is already refreshed.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    pub async fn load() -> Result<Self, String> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { token })
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(&path, json)
            .await
            .map_err(|e| e.to_string())
    }

    /// Returns the access token, refreshing it first when it is about to expire.
    /// A failed refresh keeps the old token; the next API call reports the
    /// expiry as a remote error.
    pub async fn get_valid_token(&mut self) -> String {
        if self.is_expired() {
            match spotify::auth::refresh_token(&self.token.refresh_token).await {
                Ok(new_token) => {
                    self.token = merge_refreshed(&self.token, new_token);
                    if let Err(e) = self.persist().await {
                        warning!("Failed to save refreshed token to cache: {}", e);
                    }
                }
                Err(e) => warning!("Token refresh failed, run `hitstercli auth` again: {}", e),
            }
        }

        self.token.access_token.clone()
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        is_expired_at(&self.token, now)
    }

    fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }
}

pub fn is_expired_at(token: &Token, now: u64) -> bool {
    now + EXPIRY_MARGIN_SECS >= token.obtained_at + token.expires_in
}

/// Token after a refresh. Refresh responses may omit the refresh token, the
/// old one stays valid then.
pub fn merge_refreshed(old: &Token, mut new_token: Token) -> Token {
    if new_token.refresh_token.is_empty() {
        new_token.refresh_token = old.refresh_token.clone();
    }
    new_token
}
