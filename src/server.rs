use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tokio::net::TcpListener;

use crate::{
    Res, api,
    errors::Error,
    types::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(api::LOGIN_ROUTE, get(api::login))
        .route(api::CALLBACK_ROUTE, get(api::callback))
        .route(api::RANDOMIZE_ROUTE, get(api::randomize))
        .route(api::HEALTH_ROUTE, get(api::health))
        .layer(Extension(state))
}

pub async fn bind(addr: &str) -> Res<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Config(format!("cannot listen on {}: {}", addr, e)))
}

pub async fn start_api_server(listener: TcpListener, state: Arc<AppState>) -> Res<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}
