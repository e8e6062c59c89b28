//! Error types shared by every layer of the shuffler.
//!
//! All fallible operations return [`crate::Res`], whose error is [`Error`].
//! Nothing is recovered locally: errors travel up to `main`, which prints
//! them and exits with code 1.

use std::fmt;

use thiserror::Error;

/// Stage a playlist has reached in a shuffle run.
///
/// A run moves `pending → cleared → shuffled → rewritten → done`. When clearing
/// fails after some chunks were already removed, the playlist is reported as
/// [`PlaylistStage::PartiallyCleared`]. Only [`PlaylistStage::Pending`] means
/// nothing was removed from the remote playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistStage {
    Pending,
    PartiallyCleared,
    Cleared,
    Shuffled,
    Rewritten,
    Done,
}

impl PlaylistStage {
    /// Returns the stage that follows a successful step.
    ///
    /// # Example
    ///
    /// ```
    /// assert_eq!(PlaylistStage::Pending.next(), PlaylistStage::Cleared);
    /// assert_eq!(PlaylistStage::Rewritten.next(), PlaylistStage::Done);
    /// ```
    pub fn next(self) -> Self {
        match self {
            PlaylistStage::Pending | PlaylistStage::PartiallyCleared => PlaylistStage::Cleared,
            PlaylistStage::Cleared => PlaylistStage::Shuffled,
            PlaylistStage::Shuffled => PlaylistStage::Rewritten,
            PlaylistStage::Rewritten | PlaylistStage::Done => PlaylistStage::Done,
        }
    }
}

impl fmt::Display for PlaylistStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaylistStage::Pending => "pending",
            PlaylistStage::PartiallyCleared => "partially cleared",
            PlaylistStage::Cleared => "cleared",
            PlaylistStage::Shuffled => "shuffled",
            PlaylistStage::Rewritten => "rewritten",
            PlaylistStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Every failure the shuffler can report.
///
/// # Variants
///
/// - `Unauthenticated` - a Spotify call was attempted before login
/// - `Http` / `Api` - network failure or non-2xx response
/// - `TokenRefresh` / `Auth` - accounts service failures
/// - `Incomplete` - a chunked write failed after earlier chunks were applied
/// - `Playlist` - any of the above, tagged with the playlist and its stage
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not authenticated with Spotify. Open the login page first.")]
    Unauthenticated,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spotify API returned {status} while {context}: {message}")]
    Api {
        status: u16,
        context: String,
        message: String,
    },

    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Shuffle run failed: {0}")]
    Run(String),

    #[error("{source} ({applied} of {total} tracks were already applied)")]
    Incomplete {
        applied: usize,
        total: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Playlist {playlist_id} failed at stage '{stage}': {source}")]
    Playlist {
        playlist_id: String,
        stage: PlaylistStage,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wraps the error with the playlist and the stage it had reached.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Playlist the failing operation worked on
    /// * `stage` - Stage the playlist was left in
    pub fn at_stage(self, playlist_id: &str, stage: PlaylistStage) -> Self {
        Error::Playlist {
            playlist_id: playlist_id.to_string(),
            stage,
            source: Box::new(self),
        }
    }

    /// Marks a chunked operation that failed after `applied` of `total`
    /// tracks went through. With nothing applied the error is returned as is.
    pub fn incomplete(self, applied: usize, total: usize) -> Self {
        if applied == 0 {
            return self;
        }

        Error::Incomplete {
            applied,
            total,
            source: Box::new(self),
        }
    }

    /// Number of tracks a failed chunked operation had already applied.
    pub fn applied(&self) -> usize {
        match self {
            Error::Incomplete { applied, .. } => *applied,
            _ => 0,
        }
    }

    /// Whether the root cause is a missing login, looking through wrappers.
    pub fn is_unauthenticated(&self) -> bool {
        match self {
            Error::Unauthenticated => true,
            Error::Incomplete { source, .. } | Error::Playlist { source, .. } => {
                source.is_unauthenticated()
            }
            _ => false,
        }
    }
}
