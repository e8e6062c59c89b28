use rand::{Rng, distr::Alphanumeric};

use crate::{Res, errors::Error};

/// Generates the random `state` value sent with the login redirect.
///
/// # Returns
///
/// A 32 character alphanumeric string, fresh for every process run.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Extracts the bare playlist id from an id, a `spotify:` URI or an
/// `open.spotify.com` link.
///
/// Returns `None` when nothing that looks like a playlist id can be found.
///
/// # Example
///
/// ```
/// assert_eq!(
///     parse_playlist_id("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=abc"),
///     Some("37i9dQZF1DXcBWIGoYBM5M".to_string())
/// );
/// ```
pub fn parse_playlist_id(input: &str) -> Option<String> {
    let input = input.trim();

    let candidate = if input.starts_with("spotify:") {
        // spotify:playlist:<id> or spotify:user:<user>:playlist:<id>
        let parts: Vec<&str> = input.split(':').collect();
        match parts.iter().rposition(|p| *p == "playlist") {
            Some(idx) if idx + 2 == parts.len() => parts[idx + 1],
            _ => return None,
        }
    } else if input.contains("open.spotify.com/") {
        let path = input.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.split('/').skip_while(|s| *s != "playlist");
        segments.next()?;
        segments.next()?
    } else {
        input
    };

    if !candidate.is_empty() && candidate.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(candidate.to_string())
    } else {
        None
    }
}

/// Parses a comma or whitespace separated list of playlist references.
///
/// # Arguments
///
/// * `raw` - Value of `SHUFFLE_PLAYLIST_IDS` or a similar list
///
/// # Errors
///
/// Returns [`Error::Config`] naming the first entry that is not a playlist.
pub fn parse_playlist_list(raw: &str) -> Res<Vec<String>> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            parse_playlist_id(s)
                .ok_or_else(|| Error::Config(format!("'{}' is not a valid playlist id", s)))
        })
        .collect()
}

/// Current Unix time in seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
