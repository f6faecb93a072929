//! Integration tests for photo and album deletion
//!
//! These tests verify:
//! - Remote delete strictly before the matching metadata delete
//! - Zero remote calls for photos without a remote file
//! - "Not found" remote answers treated as success
//! - Album record deleted last, and partial deletion reported

mod common;

use common::{jpeg, session, Harness};
use core_album::{AlbumError, DeleteOutcome, PreconditionError, Session};
use core_runtime::events::{AlbumEvent, CoreEvent};
use serde_json::json;

/// Create an album and upload `count` photos into it.
async fn album_with_photos(harness: &Harness, count: usize) -> (String, Vec<String>) {
    let album = harness.catalog.create_album("Ceremonia").await.unwrap();
    let files = (1..=count).map(|i| jpeg(&format!("{}.jpg", i))).collect();
    let summary = harness
        .uploads
        .upload_batch(&session(), files, &album.id)
        .await
        .unwrap();
    let photo_ids = summary.photos.into_iter().map(|p| p.id).collect();
    harness.clear_calls();
    (album.id, photo_ids)
}

#[tokio::test]
async fn test_delete_photo_remote_then_local() {
    let harness = Harness::new();
    let (_, photo_ids) = album_with_photos(&harness, 1).await;

    let deletion = harness
        .reconciler
        .delete_photo(&session(), &photo_ids[0])
        .await
        .unwrap();

    assert_eq!(deletion.remote, Some(DeleteOutcome::Deleted));
    let drive_id = deletion.photo.drive_id.clone().unwrap();
    assert_eq!(
        harness.calls(),
        vec![
            format!("drive:delete:{}", drive_id),
            format!("store:delete:photos:{}", photo_ids[0]),
        ]
    );
    assert!(harness.drive.files().is_empty());
}

#[tokio::test]
async fn test_delete_photo_without_drive_id_skips_gateway() {
    let harness = Harness::new();
    use bridge_traits::document::DocumentStore;
    harness
        .store
        .set(
            "photos",
            "legacy-1",
            json!({
                "albumId": "a1",
                "url": "https://example.test/old.jpg",
                "uploadedAt": "2024-02-01T10:00:00Z"
            }),
        )
        .await
        .unwrap();
    harness.clear_calls();

    // No credential needed when nothing remote is touched
    let deletion = harness
        .reconciler
        .delete_photo(&Session::signed_out(), "legacy-1")
        .await
        .unwrap();

    assert!(deletion.remote.is_none());
    assert!(harness.calls_matching("drive:").is_empty());
    assert_eq!(harness.calls(), vec!["store:delete:photos:legacy-1"]);
}

#[tokio::test]
async fn test_delete_missing_photo_is_not_found() {
    let harness = Harness::new();
    let err = harness
        .reconciler
        .delete_photo(&session(), "nope")
        .await
        .unwrap_err();
    assert!(matches!(err, AlbumError::NotFound { .. }));
}

#[tokio::test]
async fn test_delete_photo_requires_credential_for_remote_file() {
    let harness = Harness::new();
    let (_, photo_ids) = album_with_photos(&harness, 1).await;

    let err = harness
        .reconciler
        .delete_photo(&Session::signed_out(), &photo_ids[0])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AlbumError::Precondition(PreconditionError::MissingCredential)
    ));
    assert!(harness.calls().is_empty());
    assert_eq!(harness.store.count("photos"), 1);
}

#[tokio::test]
async fn test_remote_not_found_counts_as_success() {
    let harness = Harness::new();
    let (_, photo_ids) = album_with_photos(&harness, 1).await;
    let drive_id = harness.drive.files()[0].id.clone();
    harness
        .drive
        .missing_files
        .lock()
        .unwrap()
        .insert(drive_id);

    let deletion = harness
        .reconciler
        .delete_photo(&session(), &photo_ids[0])
        .await
        .unwrap();

    assert_eq!(deletion.remote, Some(DeleteOutcome::AlreadyGone));
    assert_eq!(harness.store.count("photos"), 0);
}

#[tokio::test]
async fn test_remote_failure_is_best_effort() {
    let harness = Harness::new();
    let (_, photo_ids) = album_with_photos(&harness, 1).await;
    let drive_id = harness.drive.files()[0].id.clone();
    harness
        .drive
        .failing_deletes
        .lock()
        .unwrap()
        .insert(drive_id.clone());

    let deletion = harness
        .reconciler
        .delete_photo(&session(), &photo_ids[0])
        .await
        .unwrap();

    match deletion.remote {
        Some(DeleteOutcome::Skipped(error)) => assert_eq!(error.file_id, drive_id),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(harness.store.count("photos"), 0);
}

#[tokio::test]
async fn test_delete_album_orders_album_delete_last() {
    let harness = Harness::new();
    let (album_id, photo_ids) = album_with_photos(&harness, 3).await;
    let mut events = harness.event_bus.subscribe();

    let deletion = harness
        .reconciler
        .delete_album(&session(), &album_id)
        .await
        .unwrap();

    assert_eq!(deletion.photos_removed, 3);
    assert!(deletion.remote_skipped.is_empty());

    let calls = harness.calls();
    assert_eq!(harness.calls_matching("drive:delete").len(), 3);
    assert_eq!(harness.calls_matching("store:delete:photos").len(), 3);
    assert_eq!(harness.calls_matching("store:delete:albums").len(), 1);
    assert_eq!(
        calls.last().unwrap(),
        &format!("store:delete:albums:{}", album_id)
    );

    // Each remote delete precedes its own record delete
    for (i, photo_id) in photo_ids.iter().enumerate() {
        assert!(calls[2 * i].starts_with("drive:delete:"));
        assert_eq!(calls[2 * i + 1], format!("store:delete:photos:{}", photo_id));
    }

    assert_eq!(harness.store.count("albums"), 0);
    assert_eq!(harness.store.count("photos"), 0);

    let mut photo_events = 0;
    let mut album_deleted = false;
    while let Ok(event) = events.try_recv() {
        match event {
            CoreEvent::Album(AlbumEvent::PhotoDeleted { .. }) => photo_events += 1,
            CoreEvent::Album(AlbumEvent::AlbumDeleted { photos_removed, .. }) => {
                assert_eq!(photos_removed, 3);
                album_deleted = true;
            }
            _ => {}
        }
    }
    assert_eq!(photo_events, 3);
    assert!(album_deleted);
}

#[tokio::test]
async fn test_delete_album_keeps_going_when_remote_is_gone() {
    let harness = Harness::new();
    let (album_id, _) = album_with_photos(&harness, 2).await;
    for file in harness.drive.files() {
        harness.drive.missing_files.lock().unwrap().insert(file.id);
    }

    let deletion = harness
        .reconciler
        .delete_album(&session(), &album_id)
        .await
        .unwrap();

    assert_eq!(deletion.photos_removed, 2);
    assert!(deletion.remote_skipped.is_empty());
}

#[tokio::test]
async fn test_delete_album_partial_failure_reports_consistency() {
    let harness = Harness::new();
    let (album_id, photo_ids) = album_with_photos(&harness, 3).await;
    harness
        .store
        .failing_deletes
        .lock()
        .unwrap()
        .insert(photo_ids[1].clone());

    let err = harness
        .reconciler
        .delete_album(&session(), &album_id)
        .await
        .unwrap_err();

    match err {
        AlbumError::Consistency {
            album_id: failed_album,
            photos_removed,
            source,
        } => {
            assert_eq!(failed_album, album_id);
            assert_eq!(photos_removed, 1);
            assert!(matches!(*source, AlbumError::Store(_)));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // First photo stays removed; the album record is untouched
    assert_eq!(harness.store.count("photos"), 2);
    assert_eq!(harness.store.count("albums"), 1);
    assert!(harness.calls_matching("store:delete:albums").is_empty());
}

#[tokio::test]
async fn test_delete_album_ignores_malformed_records_of_other_albums() {
    use bridge_traits::document::DocumentStore;
    let harness = Harness::new();
    let (album_id, _) = album_with_photos(&harness, 2).await;
    harness
        .store
        .set("photos", "legacy", json!({ "albumId": "other", "driveId": "x" }))
        .await
        .unwrap();

    let deletion = harness
        .reconciler
        .delete_album(&session(), &album_id)
        .await
        .unwrap();

    assert_eq!(deletion.photos_removed, 2);
    assert_eq!(harness.store.count("albums"), 0);
    // The foreign record is left alone
    assert_eq!(harness.store.count("photos"), 1);
    assert!(harness.calls_matching("drive:delete:x").is_empty());
}

#[tokio::test]
async fn test_delete_album_requires_credential_before_anything() {
    let harness = Harness::new();
    let (album_id, _) = album_with_photos(&harness, 2).await;

    let err = harness
        .reconciler
        .delete_album(&Session::signed_out(), &album_id)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AlbumError::Precondition(PreconditionError::MissingCredential)
    ));
    assert!(harness.calls().is_empty());
}

#[tokio::test]
async fn test_delete_empty_album() {
    let harness = Harness::new();
    let album = harness.catalog.create_album("Vacía").await.unwrap();
    harness.clear_calls();

    let deletion = harness
        .reconciler
        .delete_album(&Session::signed_out(), &album.id)
        .await
        .unwrap();

    assert_eq!(deletion.photos_removed, 0);
    assert_eq!(
        harness.calls(),
        vec![format!("store:delete:albums:{}", album.id)]
    );
}

#[tokio::test]
async fn test_delete_unknown_album_is_not_found() {
    let harness = Harness::new();
    let err = harness
        .reconciler
        .delete_album(&session(), "missing")
        .await
        .unwrap_err();
    assert!(matches!(err, AlbumError::NotFound { .. }));
    assert!(harness.calls().is_empty());
}
