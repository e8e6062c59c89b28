//! # Spotify Integration Module
//!
//! This module is the integration layer between the shuffler and the Spotify
//! Web API. It handles the OAuth token exchange and the three playlist
//! operations the shuffle needs, all over plain `reqwest` calls.
//!
//! ## Architecture
//!
//! ```text
//! Orchestrator (management::randomize_playlists)
//!          ↓
//! SpotifyClient
//!     ├── read_all_tracks  (GET, paginated by 100)
//!     ├── clear_tracks     (DELETE, chunked by 100)
//!     └── append_tracks    (POST, chunked by 100 with explicit position)
//!          ↓
//! TokenManager → OAuthClient (authorization code + refresh grants)
//!          ↓
//! Spotify Web API / Accounts service
//! ```
//!
//! ## Authentication
//!
//! Every playlist call asks the [`TokenManager`] for a valid bearer token
//! first. The manager refreshes the token when it is less than a minute away
//! from expiring. When no token has been obtained yet the call fails with
//! [`Error::Unauthenticated`] before any request leaves the process.
//!
//! ## Error Handling
//!
//! - Network failures surface as [`Error::Http`]
//! - Non-2xx responses surface as [`Error::Api`] carrying status and body
//! - Nothing is retried; the first failure aborts the operation
//!
//! ## API Coverage
//!
//! - `GET /playlists/{id}/tracks` - Track listing with `fields=items(track(uri))`
//! - `DELETE /playlists/{id}/tracks` - Bulk removal by URI
//! - `POST /playlists/{id}/tracks` - Bulk insert at a position
//! - `POST /api/token` - Code exchange and token refresh
//!
//! [`TokenManager`]: crate::management::TokenManager

use reqwest::{Client, Response};

use crate::{Res, errors::Error, management::TokenManager};

pub mod auth;
pub mod playlist;

/// Authenticated client for the Spotify Web API.
///
/// Owns the HTTP connection pool and the run-scoped token slot.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: TokenManager,
}

impl SpotifyClient {
    pub fn new(api_url: &str, tokens: TokenManager) -> Self {
        SpotifyClient {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut TokenManager {
        &mut self.tokens
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    async fn bearer(&mut self) -> Res<String> {
        match self.tokens.get_valid_token().await? {
            Some(token) => Ok(token.access_token),
            None => Err(Error::Unauthenticated),
        }
    }

    fn tracks_url(&self, playlist_id: &str) -> String {
        format!(
            "{uri}/playlists/{id}/tracks",
            uri = self.api_url,
            id = playlist_id
        )
    }
}

/// Turns a non-2xx response into [`Error::Api`].
pub(crate) async fn ensure_success(response: Response, context: &str) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(Error::Api {
        status: status.as_u16(),
        context: context.to_string(),
        message,
    })
}
