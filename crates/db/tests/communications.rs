//! Communication scheduling, segments and dispatch claims.

mod common;

use chrono::{Duration, Utc};
use common::{create_client, ALAJUELA, SAN_JOSE};
use ingetech_core::audience::SegmentFilter;
use ingetech_db::models::communication::{CreateCommunication, UpdateCommunication};
use ingetech_db::repositories::{CommunicationRepo, DispatchRepo, SegmentRepo};
use sqlx::PgPool;

fn new_communication(title: &str, scheduled_in_secs: Option<i64>) -> CreateCommunication {
    CreateCommunication {
        title: title.to_string(),
        body: format!("Body of {title}"),
        scheduled_at: scheduled_in_secs.map(|s| Utc::now() + Duration::seconds(s)),
        created_by: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_due_returns_only_past_unsent(pool: PgPool) {
    let past = CommunicationRepo::create(&pool, &new_communication("past", Some(-60)))
        .await
        .unwrap();
    let _future = CommunicationRepo::create(&pool, &new_communication("future", Some(3600)))
        .await
        .unwrap();
    let _draft = CommunicationRepo::create(&pool, &new_communication("draft", None))
        .await
        .unwrap();
    let sent = CommunicationRepo::create(&pool, &new_communication("sent", Some(-120)))
        .await
        .unwrap();
    assert!(CommunicationRepo::mark_sent(&pool, sent.id, Utc::now()).await.unwrap());

    let due = CommunicationRepo::list_due(&pool, Utc::now()).await.unwrap();
    let ids: Vec<i64> = due.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![past.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_sent_only_stamps_once(pool: PgPool) {
    let c = CommunicationRepo::create(&pool, &new_communication("once", Some(-1)))
        .await
        .unwrap();

    assert!(CommunicationRepo::mark_sent(&pool, c.id, Utc::now()).await.unwrap());
    assert!(!CommunicationRepo::mark_sent(&pool, c.id, Utc::now()).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sent_communications_cannot_be_edited_or_unscheduled(pool: PgPool) {
    let c = CommunicationRepo::create(&pool, &new_communication("locked", Some(-1)))
        .await
        .unwrap();
    CommunicationRepo::mark_sent(&pool, c.id, Utc::now()).await.unwrap();

    let update = UpdateCommunication {
        title: Some("changed".to_string()),
        body: None,
        scheduled_at: None,
    };
    assert!(CommunicationRepo::update_unsent(&pool, c.id, &update)
        .await
        .unwrap()
        .is_none());
    assert!(!CommunicationRepo::cancel_schedule(&pool, c.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancel_schedule_turns_item_into_draft(pool: PgPool) {
    let c = CommunicationRepo::create(&pool, &new_communication("later", Some(3600)))
        .await
        .unwrap();

    assert!(CommunicationRepo::cancel_schedule(&pool, c.id).await.unwrap());
    let reloaded = CommunicationRepo::find_by_id(&pool, c.id).await.unwrap().unwrap();
    assert!(reloaded.scheduled_at.is_none());
    assert!(!CommunicationRepo::cancel_schedule(&pool, c.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn replace_segments_overwrites_previous_set(pool: PgPool) {
    let c = CommunicationRepo::create(&pool, &new_communication("segments", None))
        .await
        .unwrap();

    SegmentRepo::replace(&pool, c.id, &[SegmentFilter::province(SAN_JOSE)])
        .await
        .unwrap();
    let replaced = SegmentRepo::replace(
        &pool,
        c.id,
        &[
            SegmentFilter::province(ALAJUELA),
            SegmentFilter {
                province_id: None,
                user_type_id: None,
            },
        ],
    )
    .await
    .unwrap();
    assert_eq!(replaced.len(), 1);

    let stored = SegmentRepo::list_for_communication(&pool, c.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].province_id, Some(ALAJUELA));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dispatch_claim_is_exclusive_per_recipient(pool: PgPool) {
    let user = create_client(&pool, "recipient", SAN_JOSE).await;
    let c = CommunicationRepo::create(&pool, &new_communication("claim", Some(-1)))
        .await
        .unwrap();

    assert!(!DispatchRepo::exists(&pool, c.id, user.id).await.unwrap());
    let first = DispatchRepo::claim(&pool, c.id, user.id).await.unwrap();
    assert!(first.is_some());
    let second = DispatchRepo::claim(&pool, c.id, user.id).await.unwrap();
    assert!(second.is_none());

    assert!(DispatchRepo::exists(&pool, c.id, user.id).await.unwrap());
    assert_eq!(DispatchRepo::count_for_communication(&pool, c.id).await.unwrap(), 1);

    let inbox = DispatchRepo::list_for_recipient(&pool, user.id).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].id, c.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_communication_cascades(pool: PgPool) {
    let user = create_client(&pool, "cascade", SAN_JOSE).await;
    let c = CommunicationRepo::create(&pool, &new_communication("cascade", None))
        .await
        .unwrap();
    SegmentRepo::replace(&pool, c.id, &[SegmentFilter::province(SAN_JOSE)])
        .await
        .unwrap();
    DispatchRepo::claim(&pool, c.id, user.id).await.unwrap();

    assert!(CommunicationRepo::delete(&pool, c.id).await.unwrap());
    assert!(SegmentRepo::list_for_communication(&pool, c.id)
        .await
        .unwrap()
        .is_empty());
    assert!(DispatchRepo::list_for_recipient(&pool, user.id)
        .await
        .unwrap()
        .is_empty());
}
