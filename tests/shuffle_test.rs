mod common;

use common::*;
use playlist_shuffler::{
    errors::{Error, PlaylistStage},
    management::{randomize_playlists, shuffle_tracks},
};

fn letters(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_shuffle_preserves_multiset() {
    let original = letters(&["a", "b", "a", "c", "d", "d", "e"]);

    for _ in 0..50 {
        let mut tracks = original.clone();
        shuffle_tracks(&mut tracks, &mut rand::rng());
        assert_eq!(sorted(tracks), sorted(original.clone()));
    }
}

#[test]
fn test_shuffle_changes_order() {
    let original = track_uris(10);
    let mut unchanged = 0;

    for _ in 0..200 {
        let mut tracks = original.clone();
        shuffle_tracks(&mut tracks, &mut rand::rng());
        if tracks == original {
            unchanged += 1;
        }
    }

    // 1 in 10! per trial
    assert!(unchanged < 3, "order unchanged in {} of 200 trials", unchanged);
}

#[test]
fn test_shuffle_small_lists() {
    let mut empty: Vec<String> = Vec::new();
    shuffle_tracks(&mut empty, &mut rand::rng());
    assert!(empty.is_empty());

    let mut single = letters(&["only"]);
    shuffle_tracks(&mut single, &mut rand::rng());
    assert_eq!(single, letters(&["only"]));
}

#[tokio::test]
async fn test_randomize_five_known_tracks() {
    let original = letters(&["A", "B", "C", "D", "E"]);
    let fake = fake_with_playlist("pl", original.clone());
    let base = spawn(fake.clone()).await;
    let mut client = authorized_client(&base);

    let reports = randomize_playlists(&mut client, &["pl".to_string()])
        .await
        .unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].playlist_id, "pl");
    assert_eq!(reports[0].tracks, 5);
    assert_eq!(reports[0].skipped, 0);
    assert_eq!(reports[0].stage, PlaylistStage::Done);

    let after = client.read_all_tracks("pl").await.unwrap();
    assert_eq!(after.len(), 5);
    assert_eq!(sorted(after), original);
}

#[tokio::test]
async fn test_randomize_keeps_duplicates() {
    let original = letters(&["A", "B", "A", "C", "B", "A"]);
    let fake = fake_with_playlist("pl", original.clone());
    let base = spawn(fake.clone()).await;
    let mut client = authorized_client(&base);

    randomize_playlists(&mut client, &["pl".to_string()])
        .await
        .unwrap();

    assert_eq!(sorted(playlist(&fake, "pl")), sorted(original));
}

#[tokio::test]
async fn test_randomize_large_playlist_batches_every_stage() {
    let original = track_uris(250);
    let fake = fake_with_playlist("pl", original.clone());
    let base = spawn(fake.clone()).await;
    let mut client = authorized_client(&base);

    randomize_playlists(&mut client, &["pl".to_string()])
        .await
        .unwrap();

    let after = playlist(&fake, "pl");
    assert_ne!(after, original);
    assert_eq!(sorted(after), original);

    let fake = fake.lock().unwrap();
    assert_eq!(fake.page_requests, vec![(100, 0), (100, 100), (100, 200)]);
    assert_eq!(fake.delete_sizes, vec![100, 100, 50]);
    assert_eq!(fake.insert_calls, vec![(0, 100), (100, 100), (200, 50)]);
}

#[tokio::test]
async fn test_randomize_processes_playlists_in_order() {
    let fake = fake_with_playlist("first", track_uris(3));
    fake.lock()
        .unwrap()
        .playlists
        .insert("second".to_string(), track_uris(4));
    let base = spawn(fake.clone()).await;
    let mut client = authorized_client(&base);

    let reports = randomize_playlists(&mut client, &["first".to_string(), "second".to_string()])
        .await
        .unwrap();

    let ids: Vec<&str> = reports.iter().map(|r| r.playlist_id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second"]);
    assert_eq!(reports[1].tracks, 4);
}

#[tokio::test]
async fn test_randomize_stops_at_first_failing_playlist() {
    let fake = fake_with_playlist("second", track_uris(4));
    let base = spawn(fake.clone()).await;
    let mut client = authorized_client(&base);

    let result =
        randomize_playlists(&mut client, &["missing".to_string(), "second".to_string()]).await;

    match result {
        Err(Error::Playlist {
            playlist_id, stage, ..
        }) => {
            assert_eq!(playlist_id, "missing");
            assert_eq!(stage, PlaylistStage::Pending);
        }
        other => panic!("expected a playlist error, got {:?}", other),
    }
    assert_eq!(fake.lock().unwrap().page_requests.len(), 1);
    assert_eq!(playlist(&fake, "second"), track_uris(4));
}

#[tokio::test]
async fn test_randomize_reports_stage_when_rewrite_fails() {
    let fake = fake_with_playlist("pl", track_uris(5));
    fake.lock().unwrap().fail_inserts = true;
    let base = spawn(fake.clone()).await;
    let mut client = authorized_client(&base);

    let result = randomize_playlists(&mut client, &["pl".to_string()]).await;

    match result {
        Err(Error::Playlist { stage, source, .. }) => {
            assert_eq!(stage, PlaylistStage::Shuffled);
            assert!(matches!(*source, Error::Api { status: 500, .. }));
        }
        other => panic!("expected a playlist error, got {:?}", other),
    }
    // no rollback: the playlist stays cleared
    assert!(playlist(&fake, "pl").is_empty());
}

#[tokio::test]
async fn test_randomize_without_login_is_unauthenticated() {
    let fake = fake_with_playlist("pl", track_uris(5));
    let base = spawn(fake.clone()).await;
    let mut client = client(&base, None);

    let result = randomize_playlists(&mut client, &["pl".to_string()]).await;

    let err = result.unwrap_err();
    assert!(err.is_unauthenticated());
    assert_eq!(playlist(&fake, "pl"), track_uris(5));
}

#[tokio::test]
async fn test_randomize_reports_partially_cleared_playlist() {
    let original = track_uris(250);
    let fake = fake_with_playlist("pl", original.clone());
    fake.lock().unwrap().fail_delete_call = Some(2);
    let base = spawn(fake.clone()).await;
    let mut client = authorized_client(&base);

    let result = randomize_playlists(&mut client, &["pl".to_string()]).await;

    match result {
        Err(Error::Playlist { stage, source, .. }) => {
            assert_eq!(stage, PlaylistStage::PartiallyCleared);
            assert_eq!(source.applied(), 100);
        }
        other => panic!("expected a playlist error, got {:?}", other),
    }
    assert_eq!(playlist(&fake, "pl"), original[100..].to_vec());
    assert!(fake.lock().unwrap().insert_calls.is_empty());
}

#[tokio::test]
async fn test_randomize_untouched_playlist_stays_pending_when_clear_fails() {
    let fake = fake_with_playlist("pl", track_uris(5));
    fake.lock().unwrap().fail_delete_call = Some(1);
    let base = spawn(fake.clone()).await;
    let mut client = authorized_client(&base);

    let result = randomize_playlists(&mut client, &["pl".to_string()]).await;

    match result {
        Err(Error::Playlist { stage, .. }) => assert_eq!(stage, PlaylistStage::Pending),
        other => panic!("expected a playlist error, got {:?}", other),
    }
    assert_eq!(playlist(&fake, "pl"), track_uris(5));
}

#[test]
fn test_stage_transitions() {
    let mut stage = PlaylistStage::Pending;
    let mut seen = Vec::new();
    for _ in 0..4 {
        stage = stage.next();
        seen.push(stage);
    }

    assert_eq!(
        seen,
        vec![
            PlaylistStage::Cleared,
            PlaylistStage::Shuffled,
            PlaylistStage::Rewritten,
            PlaylistStage::Done,
        ]
    );
    assert_eq!(PlaylistStage::PartiallyCleared.next(), PlaylistStage::Cleared);
    assert_eq!(PlaylistStage::Done.next(), PlaylistStage::Done);
}
