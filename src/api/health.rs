use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::types::AppState;

pub async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "authenticated": state.is_authorized(),
        "finished": state.current_status().await.is_some(),
    }))
}
