mod common;

use capture_core::constants::BYTES_PER_MB;
use capture_core::models::{CaptureStatus, UploadedFile};
use capture_core::{AppError, ErrorMetadata};
use capture_storage::CaptureStorage;
use common::{harness, one_mib_video, video};

#[tokio::test]
async fn ingest_returns_one_processing_record_per_file_in_order() {
    let h = harness(100).await;
    let files = vec![
        video("first.mp4", b"one"),
        video("second.mov", b"two"),
        video("third", b"three"),
    ];

    let captures = h
        .ingestion
        .ingest(1, "owner@example.com", &files)
        .await
        .unwrap();

    assert_eq!(captures.len(), 3);
    for capture in &captures {
        assert_eq!(capture.status, CaptureStatus::Processing);
        assert!(!capture.location.is_empty());
        assert!(capture.is_persisted());
        assert_eq!(capture.owner_id, 1);
    }
    assert!(captures[0].location.ends_with(".mp4"));
    assert!(captures[1].location.ends_with(".mov"));
    assert!(!captures[2].location.contains('.'));

    let ids: Vec<_> = captures.iter().map(|c| c.id.unwrap()).collect();
    let notified: Vec<_> = h
        .dispatcher
        .notifications()
        .iter()
        .map(|n| n.capture_id)
        .collect();
    assert_eq!(notified, ids);

    let first = h.storage.load(&captures[0].location).await.unwrap();
    assert_eq!(first.data.as_ref(), b"one");
}

#[tokio::test]
async fn ingest_dispatches_owner_and_location() {
    let h = harness(100).await;
    let captures = h
        .ingestion
        .ingest(42, "someone@example.com", &[video("clip.mp4", b"frames")])
        .await
        .unwrap();

    let notifications = h.dispatcher.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].owner_id, 42);
    assert_eq!(notifications[0].owner_email, "someone@example.com");
    assert_eq!(notifications[0].location, captures[0].location);
}

#[tokio::test]
async fn empty_batch_has_no_side_effects() {
    let h = harness(100).await;

    let captures = h.ingestion.ingest(1, "owner@example.com", &[]).await.unwrap();

    assert!(captures.is_empty());
    assert_eq!(h.storage.stores(), 0);
    assert_eq!(h.repository.saves(), 0);
    assert!(h.dispatcher.notifications().is_empty());
}

#[tokio::test]
async fn oversized_file_is_rejected_before_persistence_or_dispatch() {
    let h = harness(1).await;
    let mut file = video("big.mp4", b"declared larger than it is");
    file.size_bytes = 2 * BYTES_PER_MB;

    let err = h
        .ingestion
        .ingest(1, "owner@example.com", &[file])
        .await
        .unwrap_err();

    assert!(matches!(err.root(), AppError::InvalidInput(_)));
    assert_eq!(h.repository.saves(), 0);
    assert!(h.dispatcher.notifications().is_empty());
    assert_eq!(std::fs::read_dir(h.dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn file_at_the_limit_is_accepted() {
    let h = harness(1).await;
    let mut file = one_mib_video("edge.mp4");
    // Truncated to whole MiB, anything below 2 MiB counts as 1.
    file.size_bytes = 2 * BYTES_PER_MB - 1;

    let captures = h
        .ingestion
        .ingest(1, "owner@example.com", &[file])
        .await
        .unwrap();
    assert_eq!(captures.len(), 1);
}

#[tokio::test]
async fn non_video_file_is_invalid_input() {
    let h = harness(100).await;
    let file = UploadedFile::new("notes.txt", "text/plain", &b"hello"[..]);

    let err = h
        .ingestion
        .ingest(1, "owner@example.com", &[file])
        .await
        .unwrap_err();

    assert!(matches!(err.root(), AppError::InvalidInput(_)));
    assert_eq!(err.http_status_code(), 400);
}

#[tokio::test]
async fn missing_content_type_is_invalid_input() {
    let h = harness(100).await;
    let mut file = video("clip.mp4", b"frames");
    file.content_type = None;

    let err = h
        .ingestion
        .ingest(1, "owner@example.com", &[file])
        .await
        .unwrap_err();
    assert!(matches!(err.root(), AppError::InvalidInput(_)));
}

#[tokio::test]
async fn mixed_batch_aborts_on_wrong_type_and_keeps_earlier_capture() {
    let h = harness(100).await;
    let files = vec![
        one_mib_video("a.mp4"),
        UploadedFile::new("b.jpg", "image/jpeg", &b"jpeg bytes"[..]),
    ];

    let err = h
        .ingestion
        .ingest(1, "owner@example.com", &files)
        .await
        .unwrap_err();

    match &err {
        AppError::BatchAborted { file_name, source } => {
            assert_eq!(file_name, "b.jpg");
            assert!(matches!(source.as_ref(), AppError::InvalidInput(_)));
        }
        other => panic!("expected BatchAborted, got {:?}", other),
    }
    assert_eq!(err.http_status_code(), 400);
    assert!(err.client_message().contains("b.jpg"));

    let kept = h.access.list_for_owner(1).await.unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].status, CaptureStatus::Processing);
    assert_eq!(h.dispatcher.notifications().len(), 1);

    let id = kept[0].id.unwrap();
    let downloaded = h.access.download(id, 1).await.unwrap();
    assert_eq!(downloaded.data.len() as u64, BYTES_PER_MB);
}

#[tokio::test]
async fn persistence_failure_aborts_without_dispatch_or_rollback() {
    let h = harness(100).await;
    h.repository.fail_saves();

    let err = h
        .ingestion
        .ingest(1, "owner@example.com", &[video("clip.mp4", b"frames"), video("next.mp4", b"more")])
        .await
        .unwrap_err();

    assert!(matches!(err.root(), AppError::Internal(_)));
    assert_eq!(err.http_status_code(), 500);
    assert_eq!(h.repository.saves(), 1);
    assert_eq!(h.storage.stores(), 1);
    assert!(h.dispatcher.notifications().is_empty());
    // The stored bytes stay behind.
    assert_eq!(std::fs::read_dir(h.dir.path()).unwrap().count(), 1);
}
