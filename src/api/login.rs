use std::sync::Arc;

use axum::{
    Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{types::AppState, warning};

pub async fn login(Extension(state): Extension<Arc<AppState>>) -> Response {
    match state.oauth.authorize_url(&state.csrf_state) {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(e) => {
            warning!("Cannot build authorization URL: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h4>Cannot build the Spotify login URL. Check the terminal.</h4>"),
            )
                .into_response()
        }
    }
}
