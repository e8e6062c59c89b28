use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tabled::Tabled;
use tokio::sync::Mutex;

use crate::{
    config::Settings,
    errors::PlaylistStage,
    management::TokenManager,
    spotify::{SpotifyClient, auth::OAuthClient},
    utils,
};

/// An OAuth token pair held in memory for the lifetime of the process.
///
/// `expires_at` is an absolute Unix timestamp in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_at: i64,
}

impl Token {
    /// Builds a token from a token endpoint response received at `now`.
    ///
    /// Spotify may omit the refresh token on refresh; the previous one is
    /// carried over in that case.
    pub fn from_response(response: TokenResponse, previous_refresh: Option<&str>, now: i64) -> Self {
        Token {
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string))
                .unwrap_or_default(),
            scope: response.scope.unwrap_or_default(),
            expires_at: now + response.expires_in,
        }
    }
}

/// Body of a successful response from the Spotify token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
}

/// One page of `GET /playlists/{id}/tracks`, reduced to the track URIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksPage {
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<TrackRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRef {
    pub uri: String,
}

// Body of `DELETE /playlists/{id}/tracks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<TrackRef>,
}

// Body of `POST /playlists/{id}/tracks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
    pub position: usize,
}

/// Outcome of shuffling one playlist.
///
/// # Fields
///
/// * `tracks` - Number of tracks removed and written back
/// * `skipped` - Entries without a track URI, left untouched
/// * `stage` - Last stage reached, [`PlaylistStage::Done`] on success
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleReport {
    pub playlist_id: String,
    pub tracks: usize,
    pub skipped: usize,
    pub stage: PlaylistStage,
}

#[derive(Tabled)]
pub struct ShuffleTableRow {
    pub playlist: String,
    pub tracks: usize,
    pub skipped: usize,
    pub stage: String,
}

impl From<&ShuffleReport> for ShuffleTableRow {
    fn from(report: &ShuffleReport) -> Self {
        ShuffleTableRow {
            playlist: report.playlist_id.clone(),
            tracks: report.tracks,
            skipped: report.skipped,
            stage: report.stage.to_string(),
        }
    }
}

/// Terminal outcome of a run, observed by the CLI watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Finished(Vec<ShuffleReport>),
    Failed(String),
}

/// State shared between the HTTP handlers and the CLI watcher.
pub struct AppState {
    pub oauth: OAuthClient,
    pub csrf_state: String,
    pub playlist_ids: Vec<String>,
    pub spotify: Mutex<SpotifyClient>,
    pub authorized: AtomicBool,
    pub run_started: AtomicBool,
    pub status: Mutex<Option<RunStatus>>,
}

impl AppState {
    /// Builds the shared state for one process run.
    ///
    /// A fresh CSRF `state` value is generated here and reused for the login
    /// redirect and the callback check.
    pub fn new(settings: &Settings) -> Self {
        let oauth = OAuthClient::from_settings(settings);
        let spotify = SpotifyClient::new(&settings.api_url, TokenManager::new(oauth.clone()));

        AppState {
            oauth,
            csrf_state: utils::generate_state(),
            playlist_ids: settings.playlist_ids.clone(),
            spotify: Mutex::new(spotify),
            authorized: AtomicBool::new(false),
            run_started: AtomicBool::new(false),
            status: Mutex::new(None),
        }
    }

    /// Whether the OAuth callback has stored a token.
    pub fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::SeqCst)
    }

    pub fn mark_authorized(&self) {
        self.authorized.store(true, Ordering::SeqCst);
    }

    /// Claims the single shuffle run of this process.
    ///
    /// # Returns
    ///
    /// `true` for the first caller only; every later call returns `false`.
    pub fn begin_run(&self) -> bool {
        self.run_started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Records the outcome of the run. The first recorded status wins.
    pub async fn finish(&self, status: RunStatus) {
        let mut lock = self.status.lock().await;
        if lock.is_none() {
            *lock = Some(status);
        }
    }

    pub async fn current_status(&self) -> Option<RunStatus> {
        self.status.lock().await.clone()
    }
}
