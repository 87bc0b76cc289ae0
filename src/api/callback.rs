use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    api::PlayTemplate,
    management::TokenManager,
    server::AppState,
    spotify, success, warning,
};

pub async fn login(Extension(state): Extension<Arc<AppState>>) -> Response {
    match spotify::auth::begin_login() {
        Ok((pkce, url)) => {
            *state.pkce.lock().await = Some(pkce);
            Redirect::to(&url).into_response()
        }
        Err(e) => {
            warning!("Cannot start login: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                PlayTemplate::notice(format!("Login unavailable: {}", e)),
            )
                .into_response()
        }
    }
}

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<AppState>>,
) -> Response {
    if let Some(error) = params.get("error") {
        warning!("Callback error: {}", error);
        return (
            StatusCode::BAD_REQUEST,
            PlayTemplate::notice(format!("Callback error: {}", error)),
        )
            .into_response();
    }

    let Some(code) = params.get("code") else {
        return (
            StatusCode::BAD_REQUEST,
            PlayTemplate::notice("Missing authorization code."),
        )
            .into_response();
    };

    let mut pkce_lock = shared_state.pkce.lock().await;
    let Some(pkce_state) = pkce_lock.as_mut() else {
        return (
            StatusCode::BAD_REQUEST,
            PlayTemplate::notice("No login pending, open /login first."),
        )
            .into_response();
    };

    if params.get("state") != Some(&pkce_state.state) {
        warning!("Callback state does not match the pending login");
        return (
            StatusCode::BAD_REQUEST,
            PlayTemplate::notice("Login state mismatch."),
        )
            .into_response();
    }

    let verifier = pkce_state.code_verifier.clone();
    match spotify::auth::exchange_code_pkce(code, &verifier).await {
        Ok(token) => {
            pkce_state.token = Some(token.clone());
            drop(pkce_lock);

            let manager = TokenManager::new(token);
            if let Err(e) = manager.persist().await {
                warning!("Failed to save token to cache: {}", e);
            }
            shared_state.client.install(manager).await;

            success!("Authentication successful!");
            PlayTemplate::clue("").into_response()
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            let status = match e {
                spotify::ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, PlayTemplate::notice("Login failed.")).into_response()
        }
    }
}
