//! Member history and timeline reconstruction scenarios.
//!
//! Drives real request flows through the service, then checks the
//! synthesized activity timeline: stage order, event ids, notes, filters,
//! and cross-kind merging.

use chrono::{DateTime, Days, Utc};

use libris_core::enums::{ActivityStage, RequestKind};
use libris_core::timeline::TimelineFilter;
use libris_db::service::CirculationService;

async fn test_service() -> CirculationService {
    CirculationService::new_local(":memory:", None).await.unwrap()
}

fn next_week() -> DateTime<Utc> {
    Utc::now() + Days::new(7)
}

#[tokio::test]
async fn member_history_orders_each_kind_newest_first() {
    let svc = test_service().await;
    let first = svc
        .create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
        .await
        .unwrap();
    let second = svc
        .create_borrow("mem-1", "12", "Dune", "Frank Herbert")
        .await
        .unwrap();
    let donation = svc
        .create_donation("mem-1", "Le Petit Prince", "Antoine de Saint-Exupery")
        .await
        .unwrap();
    svc.create_borrow("mem-2", "7", "The Hobbit", "J.R.R. Tolkien")
        .await
        .unwrap();

    let history = svc.member_history("mem-1").await.unwrap();
    assert_eq!(history.borrows.len(), 2);
    assert_eq!(history.borrows[0].id, second.id);
    assert_eq!(history.borrows[1].id, first.id);
    assert_eq!(history.donations.len(), 1);
    assert_eq!(history.donations[0].id, donation.id);
}

#[tokio::test]
async fn completed_borrow_replays_all_four_stages() {
    let svc = test_service().await;
    let req = svc
        .create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
        .await
        .unwrap();
    svc.approve_borrow(&req.id).await.unwrap();
    let due = next_week();
    svc.handover_borrow(&req.id, Some(due)).await.unwrap();
    svc.return_borrow(&req.id).await.unwrap();

    let events = svc
        .member_timeline("mem-1", &TimelineFilter::default())
        .await
        .unwrap();
    let stages: Vec<ActivityStage> = events.iter().map(|e| e.stage).collect();
    assert_eq!(
        stages,
        vec![
            ActivityStage::Completed,
            ActivityStage::Collected,
            ActivityStage::Approved,
            ActivityStage::Pending,
        ]
    );

    assert_eq!(events[0].id, format!("{}-completed", req.id));
    assert_eq!(events[3].id, format!("{}-pending", req.id));
    assert_eq!(
        events[1].note.as_deref(),
        Some(format!("Due by {}", due.format("%Y-%m-%d")).as_str())
    );
    assert!(events.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
}

#[tokio::test]
async fn return_requested_stage_survives_the_full_flow() {
    let svc = test_service().await;
    let req = svc
        .create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
        .await
        .unwrap();
    svc.approve_borrow(&req.id).await.unwrap();
    svc.handover_borrow(&req.id, Some(next_week())).await.unwrap();
    svc.request_return(&req.id).await.unwrap();
    svc.return_borrow(&req.id).await.unwrap();

    let events = svc
        .member_timeline("mem-1", &TimelineFilter::default())
        .await
        .unwrap();
    let stages: Vec<ActivityStage> = events.iter().map(|e| e.stage).collect();
    assert_eq!(
        stages,
        vec![
            ActivityStage::Completed,
            ActivityStage::ReturnRequested,
            ActivityStage::Collected,
            ActivityStage::Approved,
            ActivityStage::Pending,
        ]
    );
}

#[tokio::test]
async fn rejected_borrow_shows_pending_and_rejected_only() {
    let svc = test_service().await;
    let req = svc
        .create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
        .await
        .unwrap();
    svc.reject_borrow(&req.id, Some("All copies are out"))
        .await
        .unwrap();

    let events = svc
        .member_timeline("mem-1", &TimelineFilter::default())
        .await
        .unwrap();
    let stages: Vec<ActivityStage> = events.iter().map(|e| e.stage).collect();
    assert_eq!(stages, vec![ActivityStage::Rejected, ActivityStage::Pending]);
    assert_eq!(events[0].note.as_deref(), Some("All copies are out"));
}

#[tokio::test]
async fn donation_timeline_replays_three_stages() {
    let svc = test_service().await;
    let req = svc
        .create_donation("mem-1", "Le Petit Prince", "Antoine de Saint-Exupery")
        .await
        .unwrap();
    svc.approve_donation(&req.id).await.unwrap();
    svc.complete_donation(&req.id).await.unwrap();

    let events = svc
        .member_timeline("mem-1", &TimelineFilter::default())
        .await
        .unwrap();
    let stages: Vec<ActivityStage> = events.iter().map(|e| e.stage).collect();
    assert_eq!(
        stages,
        vec![
            ActivityStage::Completed,
            ActivityStage::Approved,
            ActivityStage::Pending,
        ]
    );
    assert!(events.iter().all(|e| e.source_type == RequestKind::Donation));
}

#[tokio::test]
async fn timeline_merges_kinds_newest_first() {
    let svc = test_service().await;
    let borrow = svc
        .create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
        .await
        .unwrap();
    let donation = svc
        .create_donation("mem-1", "Dune", "Frank Herbert")
        .await
        .unwrap();

    let events = svc
        .member_timeline("mem-1", &TimelineFilter::default())
        .await
        .unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, format!("{}-pending", donation.id));
    assert_eq!(events[1].id, format!("{}-pending", borrow.id));
}

#[tokio::test]
async fn book_id_filter_keeps_only_that_borrow() {
    let svc = test_service().await;
    let hobbit = svc
        .create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
        .await
        .unwrap();
    svc.approve_borrow(&hobbit.id).await.unwrap();
    svc.handover_borrow(&hobbit.id, Some(next_week())).await.unwrap();
    svc.return_borrow(&hobbit.id).await.unwrap();
    svc.create_borrow("mem-1", "12", "Dune", "Frank Herbert")
        .await
        .unwrap();
    // Same title as the borrow, but donations carry no catalog book id, so a
    // book id filter excludes them.
    svc.create_donation("mem-1", "The Hobbit", "J.R.R. Tolkien")
        .await
        .unwrap();

    let events = svc
        .member_timeline(
            "mem-1",
            &TimelineFilter {
                book_id: Some("7".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(events.len(), 4);
    assert!(events.iter().all(|e| e.id.starts_with(&hobbit.id)));
}

#[tokio::test]
async fn title_filter_matches_across_kinds() {
    let svc = test_service().await;
    svc.create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
        .await
        .unwrap();
    svc.create_donation("mem-1", "The Hobbit", "J.R.R. Tolkien")
        .await
        .unwrap();
    svc.create_borrow("mem-1", "12", "Dune", "Frank Herbert")
        .await
        .unwrap();

    let events = svc
        .member_timeline(
            "mem-1",
            &TimelineFilter {
                title: Some("The Hobbit".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.book_title == "The Hobbit"));
}

#[tokio::test]
async fn timeline_is_scoped_to_the_member() {
    let svc = test_service().await;
    svc.create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
        .await
        .unwrap();
    svc.create_borrow("mem-2", "12", "Dune", "Frank Herbert")
        .await
        .unwrap();

    let events = svc
        .member_timeline("mem-1", &TimelineFilter::default())
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].book_title, "The Hobbit");
}
