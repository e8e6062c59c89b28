use rand::{Rng, seq::SliceRandom};

use crate::{
    Res, info,
    errors::PlaylistStage,
    spotify::SpotifyClient,
    success,
    types::ShuffleReport,
    warning,
};

/// Applies a uniform random permutation (Fisher-Yates) to `tracks`.
pub fn shuffle_tracks<R: Rng + ?Sized>(tracks: &mut [String], rng: &mut R) {
    tracks.shuffle(rng);
}

/// Shuffles every playlist in `playlist_ids`, one after another.
///
/// Stops at the first failing playlist; playlists after it are not touched.
pub async fn randomize_playlists(
    client: &mut SpotifyClient,
    playlist_ids: &[String],
) -> Res<Vec<ShuffleReport>> {
    let mut reports = Vec::with_capacity(playlist_ids.len());

    for playlist_id in playlist_ids {
        let report = randomize_playlist(client, playlist_id).await?;
        reports.push(report);
    }

    Ok(reports)
}

/// Reads, clears, shuffles and rewrites a single playlist.
///
/// A failure is wrapped with the last stage the playlist reached. Past
/// `pending` the remote contents are partially or fully removed, and nothing
/// restores them.
pub async fn randomize_playlist(
    client: &mut SpotifyClient,
    playlist_id: &str,
) -> Res<ShuffleReport> {
    let mut stage = PlaylistStage::Pending;

    info!("Reading playlist {}", playlist_id);
    let listing = client
        .read_listing(playlist_id)
        .await
        .map_err(|e| e.at_stage(playlist_id, stage))?;
    let mut tracks = listing.tracks;

    info!("Removing {} tracks from playlist {}", tracks.len(), playlist_id);
    if let Err(e) = client.clear_tracks(playlist_id, &tracks).await {
        if e.applied() > 0 {
            warning!(
                "Playlist {} is partially cleared; {} of {} tracks were removed",
                playlist_id,
                e.applied(),
                tracks.len()
            );
            stage = PlaylistStage::PartiallyCleared;
        }
        return Err(e.at_stage(playlist_id, stage));
    }
    stage = stage.next();

    shuffle_tracks(&mut tracks, &mut rand::rng());
    stage = stage.next();

    info!("Writing {} tracks back to playlist {}", tracks.len(), playlist_id);
    if let Err(e) = client.append_tracks(playlist_id, &tracks).await {
        warning!(
            "Playlist {} was cleared but only {} of {} tracks were written back",
            playlist_id,
            e.applied(),
            tracks.len()
        );
        return Err(e.at_stage(playlist_id, stage));
    }
    stage = stage.next();

    success!("Shuffled {} tracks in playlist {}", tracks.len(), playlist_id);
    stage = stage.next();

    Ok(ShuffleReport {
        playlist_id: playlist_id.to_string(),
        tracks: tracks.len(),
        skipped: listing.skipped,
        stage,
    })
}
