use std::sync::Arc;

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    api::RANDOMIZE_ROUTE,
    info,
    types::{AppState, RunStatus},
    warning,
};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(shared_state): Extension<Arc<AppState>>,
) -> Response {
    // Spotify reports a denied consent as ?error=access_denied
    if let Some(reason) = params.error {
        warning!("Spotify authorization was not granted: {}", reason);
        shared_state
            .finish(RunStatus::Failed(format!(
                "authorization was not granted: {}",
                reason
            )))
            .await;
        return Html("<h4>Login failed.</h4>").into_response();
    }

    if params.state.as_deref() != Some(shared_state.csrf_state.as_str()) {
        warning!("Ignoring callback with an unexpected state parameter");
        return (StatusCode::BAD_REQUEST, Html("<h4>Invalid login state.</h4>")).into_response();
    }

    let Some(code) = params.code else {
        return (
            StatusCode::BAD_REQUEST,
            Html("<h4>Missing authorization code.</h4>"),
        )
            .into_response();
    };

    match shared_state.oauth.exchange_code(&code).await {
        Ok(token) => {
            shared_state.spotify.lock().await.tokens_mut().store(token);
            shared_state.mark_authorized();
            info!("Authorization with Spotify completed");
            Redirect::to(RANDOMIZE_ROUTE).into_response()
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            shared_state.finish(RunStatus::Failed(e.to_string())).await;
            Html("<h4>Login failed.</h4>").into_response()
        }
    }
}
