//! Integration tests for the ingestion pipeline
//!
//! These tests drive the ingestor, store actor and broadcaster together
//! without the HTTP layer.

use std::collections::HashSet;

use alertify::{
    broadcast::ChannelEvent,
    ingest::{CheckSubmission, IngestError},
    monitors::CheckStatus,
    seed::demo_store,
    storage::schema::{AlertSeverity, AlertStatus, AlertTransition},
};
use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use crate::helpers::{create_ingestor, create_ingestor_with_store, monitor_submission};

#[tokio::test]
async fn test_only_registered_subscribers_receive_alerts() {
    let ingestor = create_ingestor();
    let broadcaster = ingestor.broadcaster();

    let mut first = broadcaster.register().await;
    let mut second = broadcaster.register().await;
    broadcaster.mark_open(first.id).await;
    broadcaster.mark_open(second.id).await;
    broadcaster.unregister(second.id).await;

    let outcome = ingestor
        .submit_monitor(monitor_submission(1, Some(503)))
        .await
        .unwrap();
    let alert = outcome.alert.unwrap();

    assert_matches!(first.events.recv().await, Some(ChannelEvent::Alert { data }) if data == alert);
    assert_matches!(second.events.recv().await, None);
}

#[tokio::test]
async fn test_seeded_store_receives_new_alerts_first() {
    let ingestor = create_ingestor_with_store(demo_store());

    let before = ingestor.store().list_alerts(None, None).await.unwrap();
    assert_eq!(before.len(), 4);

    let outcome = ingestor
        .submit_monitor(monitor_submission(1, Some(500)))
        .await
        .unwrap();
    let alert = outcome.alert.unwrap();
    assert_eq!(alert.id, 5);

    let by_site = ingestor.store().alerts_by_site(1, None).await.unwrap();
    let ids: Vec<_> = by_site.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![5, 1]);
}

#[tokio::test]
async fn test_check_submission_with_error_text() {
    let ingestor = create_ingestor();

    let outcome = ingestor
        .submit_check(CheckSubmission {
            site_id: Some(3),
            status_code: None,
            response_time: None,
            success: Some(false),
            error: Some("connection refused".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(outcome.check_result.status, CheckStatus::Error);
    let alert = outcome.alert.unwrap();
    assert_eq!(alert.severity, AlertSeverity::Error);
    assert_eq!(alert.message, "connection refused");
}

#[tokio::test]
async fn test_slow_response_raises_warning() {
    let ingestor = create_ingestor();
    let mut submission = monitor_submission(2, Some(200));
    submission.response_time = Some(2500);

    let outcome = ingestor.submit_monitor(submission).await.unwrap();

    assert_eq!(outcome.check_result.status, CheckStatus::Warning);
    assert!(!outcome.check_result.success);
    assert_eq!(outcome.alert.unwrap().severity, AlertSeverity::Warning);
}

#[tokio::test]
async fn test_rejected_submission_leaves_store_untouched() {
    let ingestor = create_ingestor_with_store(demo_store());
    let before = ingestor.store().counts().await.unwrap();

    let mut submission = monitor_submission(1, Some(503));
    submission.site_id = None;

    assert_matches!(
        ingestor.submit_monitor(submission).await,
        Err(IngestError::InvalidInput(_))
    );
    assert_eq!(ingestor.store().counts().await.unwrap(), before);
}

#[tokio::test]
async fn test_alert_lifecycle_through_store_handle() {
    let ingestor = create_ingestor();
    let alert = ingestor
        .submit_monitor(monitor_submission(1, Some(502)))
        .await
        .unwrap()
        .alert
        .unwrap();

    let acked = ingestor
        .store()
        .transition_alert(
            alert.id,
            AlertTransition {
                status: AlertStatus::Acknowledged,
                acknowledged_by: Some(7),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(acked.acknowledged_by, Some(7));

    let resolved = ingestor
        .store()
        .transition_alert(
            alert.id,
            AlertTransition {
                status: AlertStatus::Resolved,
                acknowledged_by: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(resolved.resolved_at.is_some());

    let active = ingestor.store().list_alerts(Some(AlertStatus::Active), None).await.unwrap();
    assert!(active.is_empty());
}

#[tokio::test]
async fn test_concurrent_submissions_get_unique_ids() {
    let ingestor = create_ingestor();
    let mut sub = ingestor.broadcaster().register().await;
    ingestor.broadcaster().mark_open(sub.id).await;

    let mut handles = vec![];
    for i in 0..20u64 {
        let ingestor = ingestor.clone();
        handles.push(tokio::spawn(async move {
            ingestor
                .submit_monitor(monitor_submission(i % 4 + 1, Some(500)))
                .await
                .unwrap()
        }));
    }

    let mut check_ids = HashSet::new();
    let mut alert_ids = HashSet::new();
    for handle in handles {
        let outcome = handle.await.unwrap();
        check_ids.insert(outcome.check_result.id);
        alert_ids.insert(outcome.alert.unwrap().id);
    }

    assert_eq!(check_ids.len(), 20);
    assert_eq!(alert_ids.len(), 20);

    let mut received = 0;
    while let Ok(ChannelEvent::Alert { .. }) = sub.events.try_recv() {
        received += 1;
    }
    assert_eq!(received, 20);
}
