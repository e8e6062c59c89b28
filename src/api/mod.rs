//! # API Module
//!
//! HTTP handlers for the local server that drives one shuffle run from the
//! browser.
//!
//! ## Endpoints
//!
//! - [`login`] - `GET /` redirects to Spotify's authorization page
//! - [`callback`] - `GET /callback` exchanges the authorization code and
//!   continues to the randomize route
//! - [`randomize`] - `GET /randomize` starts the shuffle run on a detached
//!   task (see [`spawn_run`]) and waits for its status
//! - [`health`] - `GET /health` reports whether the run is authenticated and
//!   finished
//!
//! All handlers receive the shared [`AppState`](crate::types::AppState)
//! through an axum `Extension`.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use playlist_shuffler::api::{callback, login};
//!
//! let app = Router::new()
//!     .route("/", get(login))
//!     .route("/callback", get(callback));
//! ```

mod callback;
mod health;
mod login;
mod randomize;

pub use callback::callback;
pub use health::health;
pub use login::login;
pub use randomize::{randomize, spawn_run};

pub const LOGIN_ROUTE: &str = "/";
pub const CALLBACK_ROUTE: &str = "/callback";
pub const RANDOMIZE_ROUTE: &str = "/randomize";
pub const HEALTH_ROUTE: &str = "/health";
