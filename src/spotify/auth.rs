use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{
    config::{self, ConfigError},
    server::{AppState, start_api_server},
    spotify::{ApiError, check_status},
    types::{PkceToken, Token},
    utils, warning,
};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl TokenResponse {
    fn into_token(self) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self.refresh_token.unwrap_or_default(),
            scope: self.scope.unwrap_or_default(),
            expires_in: self.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Starts a new login: generates the PKCE verifier and anti-forgery state and
/// returns them together with the URL the user has to visit.
pub fn begin_login() -> Result<(PkceToken, String), ConfigError> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let state = utils::generate_state();

    let url = authorize_url(&code_challenge, &state)?;
    Ok((
        PkceToken {
            code_verifier,
            state,
            token: None,
        },
        url,
    ))
}

/// Builds the Spotify authorization URL for the configured client, redirect URI
/// and scope, carrying the PKCE challenge and the anti-forgery `state`.
pub fn authorize_url(code_challenge: &str, state: &str) -> Result<String, ConfigError> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri();
    let scope = config::spotify_scope();

    let url = Url::parse_with_params(
        &config::spotify_apiauth_url(),
        &[
            ("client_id", client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri.as_str()),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("scope", scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| ConfigError::Invalid {
        key: "SPOTIFY_API_AUTH_URL",
        reason: e.to_string(),
    })?;

    Ok(url.to_string())
}

/// Runs the complete OAuth 2.0 PKCE login from the command line.
///
/// This function orchestrates the entire authentication process including:
/// 1. Starting the local server, whose `/callback` route completes the exchange
/// 2. Opening the authorization URL in the user's browser
/// 3. Waiting up to 60 seconds for the callback to deliver a token
///
/// The callback handler persists the token, so later commands find it in the
/// token cache.
///
/// # Error Handling
///
/// - Browser launch failures result in a warning with manual URL instructions
/// - A missing client id or a timeout is returned as an error message
pub async fn auth(state: Arc<AppState>) -> Result<Token, String> {
    let (pkce, auth_url) = begin_login().map_err(|e| e.to_string())?;

    // Store verifier in shared state before redirect
    {
        let mut lock = state.pkce.lock().await;
        *lock = Some(pkce);
    }

    let server_state = Arc::clone(&state);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    wait_for_token(state)
        .await
        .ok_or_else(|| "Authentication failed or timed out.".to_string())
}

/// Polls the shared state for the token the callback handler stores.
///
/// - Maximum wait time: 60 seconds
/// - Polling interval: 1 second
async fn wait_for_token(state: Arc<AppState>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = state.pkce.lock().await;
        if let Some(token) = lock.as_ref().and_then(|p| p.token.as_ref()) {
            return Some(token.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Refreshes an expired access token using a refresh token.
///
/// Spotify may or may not rotate the refresh token; when the response has none
/// the returned token carries an empty refresh token and the caller keeps the
/// old one.
pub async fn refresh_token(refresh_token: &str) -> Result<Token, String> {
    let client_id = config::spotify_client_id().map_err(|e| e.to_string())?;

    let client = Client::new();
    let res = client
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id.as_str()),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let res = check_status(res).await.map_err(|e| e.to_string())?;
    let json: TokenResponse = res.json().await.map_err(|e| e.to_string())?;

    Ok(json.into_token())
}

/// Exchanges an authorization code for an access token using PKCE.
///
/// The code verifier proves that the same client that initiated the auth flow
/// is completing it. The authorization code is single-use and expires quickly,
/// so the exchange happens right in the callback.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token, ApiError> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri();

    let client = Client::new();
    let res = client
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?;

    let json: TokenResponse = check_status(res).await?.json().await?;
    Ok(json.into_token())
}
