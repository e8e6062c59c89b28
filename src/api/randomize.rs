use std::sync::Arc;

use axum::{
    Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tokio::task::JoinHandle;

use crate::{
    api::LOGIN_ROUTE,
    management,
    types::{AppState, RunStatus},
    warning,
};

// Browsers only honour window.close() for script-opened tabs; the text
// covers the other case.
const DONE_PAGE: &str = "<h2>Done!</h2><p>Your playlists were shuffled. You can close this tab.</p>\
<script>window.close();</script>";

const ALREADY_STARTED_PAGE: &str =
    "<h4>This run has already started. Check the terminal for the result.</h4>";

/// Starts the shuffle run on its own task, detached from any request.
///
/// Only the first call starts a run; later calls return `None`. The returned
/// task always records a [`RunStatus`] on `state` before it completes, also
/// when the shuffle task panics or is aborted.
pub fn spawn_run(state: Arc<AppState>) -> Option<JoinHandle<RunStatus>> {
    if !state.begin_run() {
        return None;
    }

    let worker_state = state.clone();
    let worker = tokio::spawn(async move {
        let mut spotify = worker_state.spotify.lock().await;
        management::randomize_playlists(&mut spotify, &worker_state.playlist_ids).await
    });

    Some(tokio::spawn(async move {
        let status = match worker.await {
            Ok(Ok(reports)) => RunStatus::Finished(reports),
            Ok(Err(e)) => {
                warning!("{}", e);
                RunStatus::Failed(e.to_string())
            }
            Err(e) => RunStatus::Failed(format!("shuffle task aborted: {}", e)),
        };

        state.finish(status.clone()).await;
        status
    }))
}

pub async fn randomize(Extension(shared_state): Extension<Arc<AppState>>) -> Response {
    if !shared_state.is_authorized() {
        return Redirect::to(LOGIN_ROUTE).into_response();
    }

    let Some(run) = spawn_run(shared_state) else {
        return Html(ALREADY_STARTED_PAGE).into_response();
    };

    // Dropping this request only stops the wait; the run keeps going.
    match run.await {
        Ok(RunStatus::Finished(_)) => Html(DONE_PAGE).into_response(),
        _ => (
            StatusCode::BAD_GATEWAY,
            Html("<h4>Shuffling failed. Check the terminal for details.</h4>"),
        )
            .into_response(),
    }
}
