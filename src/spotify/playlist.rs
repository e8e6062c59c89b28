use crate::{
    Res,
    spotify::{SpotifyClient, ensure_success},
    types::{AddTracksRequest, PlaylistTracksPage, RemoveTracksRequest, TrackRef},
    warning,
};

/// Maximum number of items Spotify returns or accepts per playlist call.
pub const PAGE_SIZE: usize = 100;

const TRACK_FIELDS: &str = "items(track(uri))";

/// Track URIs of a playlist in their current order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackListing {
    pub tracks: Vec<String>,
    /// Entries without a track object (removed or unavailable items).
    pub skipped: usize,
}

impl SpotifyClient {
    /// Retrieves every track URI of a playlist in order.
    ///
    /// See [`SpotifyClient::read_listing`] for the pagination rules.
    pub async fn read_all_tracks(&mut self, playlist_id: &str) -> Res<Vec<String>> {
        Ok(self.read_listing(playlist_id).await?.tracks)
    }

    /// Retrieves a playlist's track listing page by page.
    ///
    /// Requests pages of [`PAGE_SIZE`] items starting at offset 0 and stops at
    /// the first page holding fewer than [`PAGE_SIZE`] items. A playlist whose
    /// length is an exact multiple of the page size therefore costs one extra,
    /// empty request.
    ///
    /// # Errors
    ///
    /// - [`Error::Unauthenticated`](crate::errors::Error::Unauthenticated) if no token was obtained
    /// - [`Error::Api`](crate::errors::Error::Api) for any non-2xx page response
    pub async fn read_listing(&mut self, playlist_id: &str) -> Res<TrackListing> {
        let url = self.tracks_url(playlist_id);
        let mut listing = TrackListing::default();
        let mut offset = 0;

        loop {
            let token = self.bearer().await?;
            let response = self
                .http
                .get(&url)
                .query(&[("fields", TRACK_FIELDS)])
                .query(&[("limit", PAGE_SIZE), ("offset", offset)])
                .bearer_auth(token)
                .send()
                .await?;

            let context = format!("reading playlist {} at offset {}", playlist_id, offset);
            let page = ensure_success(response, &context)
                .await?
                .json::<PlaylistTracksPage>()
                .await?;

            let page_len = page.items.len();
            for item in page.items {
                match item.track {
                    Some(track) => listing.tracks.push(track.uri),
                    None => listing.skipped += 1,
                }
            }

            if page_len < PAGE_SIZE {
                break;
            }
            offset += PAGE_SIZE;
        }

        if listing.skipped > 0 {
            warning!(
                "Playlist {} has {} unavailable entries that will be left untouched",
                playlist_id,
                listing.skipped
            );
        }

        Ok(listing)
    }

    /// Removes the given tracks from a playlist, at most [`PAGE_SIZE`] per call.
    ///
    /// Tracks are removed by URI rather than wiping the playlist, so items
    /// added elsewhere in the meantime survive. Chunks already sent stay
    /// removed if a later chunk fails; the error then reports how many tracks
    /// were removed (see [`crate::errors::Error::applied`]).
    pub async fn clear_tracks(&mut self, playlist_id: &str, tracks: &[String]) -> Res<()> {
        let mut removed = 0;

        for (index, chunk) in tracks.chunks(PAGE_SIZE).enumerate() {
            self.remove_chunk(playlist_id, index, chunk)
                .await
                .map_err(|e| e.incomplete(removed, tracks.len()))?;
            removed += chunk.len();
        }

        Ok(())
    }

    /// Appends tracks to a playlist in order, at most [`PAGE_SIZE`] per call.
    ///
    /// Each chunk carries an explicit `position` equal to the number of tracks
    /// written before it, so the chunks land contiguously.
    pub async fn append_tracks(&mut self, playlist_id: &str, tracks: &[String]) -> Res<()> {
        let mut position = 0;

        for chunk in tracks.chunks(PAGE_SIZE) {
            self.insert_chunk(playlist_id, position, chunk)
                .await
                .map_err(|e| e.incomplete(position, tracks.len()))?;
            position += chunk.len();
        }

        Ok(())
    }

    async fn remove_chunk(&mut self, playlist_id: &str, index: usize, chunk: &[String]) -> Res<()> {
        let url = self.tracks_url(playlist_id);
        let body = RemoveTracksRequest {
            tracks: chunk
                .iter()
                .map(|uri| TrackRef { uri: uri.clone() })
                .collect(),
        };

        let token = self.bearer().await?;
        let response = self
            .http
            .delete(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let context = format!("removing chunk {} from playlist {}", index, playlist_id);
        ensure_success(response, &context).await?;
        Ok(())
    }

    async fn insert_chunk(
        &mut self,
        playlist_id: &str,
        position: usize,
        chunk: &[String],
    ) -> Res<()> {
        let url = self.tracks_url(playlist_id);
        let body = AddTracksRequest {
            uris: chunk.to_vec(),
            position,
        };

        let token = self.bearer().await?;
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let context = format!(
            "adding tracks at position {} to playlist {}",
            position, playlist_id
        );
        ensure_success(response, &context).await?;
        Ok(())
    }
}
