mod auth;
mod shuffle;

pub use auth::REFRESH_WINDOW_SECS;
pub use auth::TokenManager;
pub use auth::needs_refresh;
pub use shuffle::randomize_playlist;
pub use shuffle::randomize_playlists;
pub use shuffle::shuffle_tracks;
