#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use playlist_shuffler::{
    config::Settings,
    management::TokenManager,
    spotify::{SpotifyClient, auth::OAuthClient},
    types::Token,
    utils,
};
use serde::Deserialize;
use serde_json::{Value, json};

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
pub const ACCESS_TOKEN: &str = "initial-access";
pub const REFRESH_TOKEN: &str = "initial-refresh";
pub const REFRESHED_ACCESS_TOKEN: &str = "refreshed-access";
pub const EXCHANGED_ACCESS_TOKEN: &str = "exchanged-access";
pub const EXCHANGED_REFRESH_TOKEN: &str = "exchanged-refresh";

/// Playlist entry rendered as `{"track": null}` by the fake.
pub const UNAVAILABLE: &str = "<unavailable>";

/// In-memory stand-in for the Spotify Web API and accounts service.
#[derive(Default)]
pub struct FakeSpotify {
    pub playlists: HashMap<String, Vec<String>>,
    /// (limit, offset) of every listing request
    pub page_requests: Vec<(usize, usize)>,
    /// number of URIs in every removal request
    pub delete_sizes: Vec<usize>,
    /// (position, number of URIs) of every insert request
    pub insert_calls: Vec<(usize, usize)>,
    /// grant_type of every token request
    pub token_grants: Vec<String>,
    pub reject_token_requests: bool,
    pub fail_inserts: bool,
    /// 1-based index of the removal request that answers 500
    pub fail_delete_call: Option<usize>,
    /// held before every insert is applied
    pub insert_delay: Option<Duration>,
}

pub type SharedFake = Arc<Mutex<FakeSpotify>>;

pub fn fake_with_playlist(playlist_id: &str, tracks: Vec<String>) -> SharedFake {
    let mut fake = FakeSpotify::default();
    fake.playlists.insert(playlist_id.to_string(), tracks);
    Arc::new(Mutex::new(fake))
}

pub fn track_uris(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("spotify:track:{:05}", i)).collect()
}

pub fn playlist(fake: &SharedFake, playlist_id: &str) -> Vec<String> {
    fake.lock().unwrap().playlists[playlist_id].clone()
}

pub fn sorted(mut tracks: Vec<String>) -> Vec<String> {
    tracks.sort();
    tracks
}

/// Starts the fake on an ephemeral port and returns its base URL.
pub async fn spawn(fake: SharedFake) -> String {
    let app = Router::new()
        .route(
            "/v1/playlists/{id}/tracks",
            get(list_tracks).delete(remove_tracks).post(add_tracks),
        )
        .route("/api/token", post(token))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub fn settings(base: &str, playlist_ids: &[&str]) -> Settings {
    let vars: HashMap<&str, String> = HashMap::from([
        ("SPOTIFY_API_AUTH_CLIENT_ID", CLIENT_ID.to_string()),
        ("SPOTIFY_API_AUTH_CLIENT_SECRET", CLIENT_SECRET.to_string()),
        ("SPOTIFY_API_AUTH_URL", format!("{}/authorize", base)),
        ("SPOTIFY_API_TOKEN_URL", format!("{}/api/token", base)),
        ("SPOTIFY_API_URL", format!("{}/v1", base)),
        ("SERVER_ADDRESS", "127.0.0.1:0".to_string()),
        ("SHUFFLE_PLAYLIST_IDS", playlist_ids.join(",")),
    ]);

    Settings::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub fn token_expiring_in(secs: i64) -> Token {
    Token {
        access_token: ACCESS_TOKEN.to_string(),
        refresh_token: REFRESH_TOKEN.to_string(),
        scope: "playlist-modify-public".to_string(),
        expires_at: utils::unix_now() + secs,
    }
}

pub fn token_manager(base: &str, token: Option<Token>) -> TokenManager {
    let oauth = OAuthClient::from_settings(&settings(base, &[]));
    match token {
        Some(token) => TokenManager::with_token(oauth, token),
        None => TokenManager::new(oauth),
    }
}

pub fn client(base: &str, token: Option<Token>) -> SpotifyClient {
    SpotifyClient::new(&format!("{}/v1", base), token_manager(base, token))
}

pub fn authorized_client(base: &str) -> SpotifyClient {
    client(base, Some(token_expiring_in(3600)))
}

fn has_bearer(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("Bearer ") && v.len() > "Bearer ".len())
        .unwrap_or(false)
}

#[derive(Deserialize)]
struct PageQuery {
    limit: usize,
    offset: usize,
    fields: String,
}

async fn list_tracks(
    State(fake): State<SharedFake>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    if !has_bearer(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if query.fields != "items(track(uri))" {
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut fake = fake.lock().unwrap();
    fake.page_requests.push((query.limit, query.offset));
    let tracks = fake.playlists.get(&id).ok_or(StatusCode::NOT_FOUND)?;

    let items: Vec<Value> = tracks
        .iter()
        .skip(query.offset)
        .take(query.limit)
        .map(|uri| {
            if uri == UNAVAILABLE {
                json!({ "track": null })
            } else {
                json!({ "track": { "uri": uri } })
            }
        })
        .collect();

    Ok(Json(json!({ "items": items })))
}

#[derive(Deserialize)]
struct UriRef {
    uri: String,
}

#[derive(Deserialize)]
struct RemoveBody {
    tracks: Vec<UriRef>,
}

async fn remove_tracks(
    State(fake): State<SharedFake>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<RemoveBody>,
) -> Result<Json<Value>, StatusCode> {
    if !has_bearer(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if body.tracks.is_empty() || body.tracks.len() > 100 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut fake = fake.lock().unwrap();
    fake.delete_sizes.push(body.tracks.len());
    if fake.fail_delete_call == Some(fake.delete_sizes.len()) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let tracks = fake.playlists.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;

    // Spotify removes every occurrence of each listed URI.
    let remove: HashSet<String> = body.tracks.into_iter().map(|t| t.uri).collect();
    tracks.retain(|uri| !remove.contains(uri));

    Ok(Json(json!({ "snapshot_id": "snapshot" })))
}

#[derive(Deserialize)]
struct AddBody {
    uris: Vec<String>,
    position: Option<usize>,
}

async fn add_tracks(
    State(fake): State<SharedFake>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<AddBody>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    if !has_bearer(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if body.uris.is_empty() || body.uris.len() > 100 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let delay = fake.lock().unwrap().insert_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut fake = fake.lock().unwrap();
    if fake.fail_inserts {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let position = body.position.unwrap_or(usize::MAX);
    fake.insert_calls.push((position, body.uris.len()));
    let tracks = fake.playlists.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let at = position.min(tracks.len());
    tracks.splice(at..at, body.uris);

    Ok((StatusCode::CREATED, Json(json!({ "snapshot_id": "snapshot" }))))
}

async fn token(
    State(fake): State<SharedFake>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let basic = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("Basic "))
        .unwrap_or(false);
    if !basic {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let grant_type = form.get("grant_type").cloned().unwrap_or_default();
    let mut fake = fake.lock().unwrap();
    fake.token_grants.push(grant_type.clone());
    if fake.reject_token_requests {
        return Err(StatusCode::BAD_REQUEST);
    }

    match grant_type.as_str() {
        "authorization_code" if form.contains_key("code") => Ok(Json(json!({
            "access_token": EXCHANGED_ACCESS_TOKEN,
            "token_type": "Bearer",
            "scope": "playlist-modify-public",
            "expires_in": 3600,
            "refresh_token": EXCHANGED_REFRESH_TOKEN,
        }))),
        "refresh_token" if form.contains_key("refresh_token") => Ok(Json(json!({
            "access_token": REFRESHED_ACCESS_TOKEN,
            "token_type": "Bearer",
            "scope": "playlist-modify-public",
            "expires_in": 3600,
        }))),
        _ => Err(StatusCode::BAD_REQUEST),
    }
}
