//! Configuration management for the Playlist Shuffler.
//!
//! This module loads configuration values from environment variables and
//! `.env` files into a [`Settings`] value that is passed explicitly to the
//! rest of the application.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::{Res, errors::Error, utils};

pub const ENV_CLIENT_ID: &str = "SPOTIFY_API_AUTH_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SPOTIFY_API_AUTH_CLIENT_SECRET";
pub const ENV_REDIRECT_URI: &str = "SPOTIFY_API_REDIRECT_URI";
pub const ENV_SCOPE: &str = "SPOTIFY_API_AUTH_SCOPE";
pub const ENV_AUTH_URL: &str = "SPOTIFY_API_AUTH_URL";
pub const ENV_TOKEN_URL: &str = "SPOTIFY_API_TOKEN_URL";
pub const ENV_API_URL: &str = "SPOTIFY_API_URL";
pub const ENV_SERVER_ADDRESS: &str = "SERVER_ADDRESS";
pub const ENV_PLAYLIST_IDS: &str = "SHUFFLE_PLAYLIST_IDS";
pub const ENV_POLL_INTERVAL: &str = "SHUFFLE_POLL_INTERVAL_SECS";
pub const ENV_LOGIN_TIMEOUT: &str = "SHUFFLE_LOGIN_TIMEOUT_SECS";

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:5000/callback";
pub const DEFAULT_SCOPE: &str = "playlist-modify-private playlist-read-private playlist-read-collaborative playlist-modify-public";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;
pub const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 300;

/// Loads environment variables from `.env` files.
///
/// Looks for `playlist-shuffler/.env` in the platform-specific local data
/// directory first, then for a `.env` in the working directory. Variables that
/// are already set in the process environment are never overwritten, and a
/// missing file is not an error.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/playlist-shuffler/.env`
/// - macOS: `~/Library/Application Support/playlist-shuffler/.env`
/// - Windows: `%LOCALAPPDATA%/playlist-shuffler/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Res<()> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
    }
    dotenv::dotenv().ok();
    Ok(())
}

fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("playlist-shuffler/.env");
    path
}

/// Runtime configuration for one shuffle run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: String,
    pub playlist_ids: Vec<String>,
    pub poll_interval: Duration,
    pub login_timeout: Duration,
}

impl Settings {
    /// Builds settings from the process environment.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset. The client id and secret are
    /// required, everything else falls back to the Spotify defaults.
    ///
    /// # Example
    ///
    /// ```
    /// let settings = Settings::from_lookup(|key| match key {
    ///     "SPOTIFY_API_AUTH_CLIENT_ID" => Some("id".to_string()),
    ///     "SPOTIFY_API_AUTH_CLIENT_SECRET" => Some("secret".to_string()),
    ///     _ => None,
    /// })?;
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| Error::Config(format!("{} must be set", key)))
        };
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let playlist_ids = match get(ENV_PLAYLIST_IDS) {
            Some(raw) => utils::parse_playlist_list(&raw)?,
            None => Vec::new(),
        };

        Ok(Settings {
            client_id: required(ENV_CLIENT_ID)?,
            client_secret: required(ENV_CLIENT_SECRET)?,
            redirect_uri: or_default(ENV_REDIRECT_URI, DEFAULT_REDIRECT_URI),
            scope: or_default(ENV_SCOPE, DEFAULT_SCOPE),
            auth_url: or_default(ENV_AUTH_URL, DEFAULT_AUTH_URL),
            token_url: or_default(ENV_TOKEN_URL, DEFAULT_TOKEN_URL),
            api_url: or_default(ENV_API_URL, DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            server_addr: or_default(ENV_SERVER_ADDRESS, DEFAULT_SERVER_ADDRESS),
            playlist_ids,
            poll_interval: Duration::from_secs(parse_secs(
                get(ENV_POLL_INTERVAL),
                ENV_POLL_INTERVAL,
                DEFAULT_POLL_INTERVAL_SECS,
            )?),
            login_timeout: Duration::from_secs(parse_secs(
                get(ENV_LOGIN_TIMEOUT),
                ENV_LOGIN_TIMEOUT,
                DEFAULT_LOGIN_TIMEOUT_SECS,
            )?),
        })
    }
}

// Zero would make the watcher spin without sleeping.
fn parse_secs(value: Option<String>, key: &str, default: u64) -> Res<u64> {
    let Some(v) = value else {
        return Ok(default);
    };

    match v.trim().parse::<u64>() {
        Ok(0) => Err(Error::Config(format!("{} must be at least 1 second", key))),
        Ok(secs) => Ok(secs),
        Err(_) => Err(Error::Config(format!(
            "{} must be a whole number of seconds, got '{}'",
            key, v
        ))),
    }
}
