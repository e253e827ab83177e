//! Runs against a real database: `DATABASE_URL=... cargo test -- --ignored`.

use group_access::subscriptions::{
    PgSubscriptionStore, SubscriptionStore,
    model::{Action, GroupStatus, Lookup, ProcessOutcome, SubmitOutcome},
};
use sqlx::PgPool;
use time::{Date, Month};

async fn seeded(pool: PgPool) -> PgSubscriptionStore {
    let store = PgSubscriptionStore::from_pool(pool);
    store
        .register_subscriber("alice")
        .await
        .expect("failed to seed subscriber");
    store
        .create_group("FIN_DAILY", "Daily finance reports")
        .await
        .expect("failed to seed group");
    store
        .create_group("RISK_WEEKLY", "Weekly risk reports")
        .await
        .expect("failed to seed group");
    store
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn request_approve_revoke_round(pool: PgPool) {
    let store = seeded(pool).await;

    assert_eq!(
        store.submit_request("alice", "RISK_WEEKLY").await.unwrap(),
        SubmitOutcome::Submitted
    );
    assert_eq!(
        store.submit_request("alice", "RISK_WEEKLY").await.unwrap(),
        SubmitOutcome::DuplicateOrPending
    );

    let Lookup::Found(groups) = store.groups_for_subscriber("alice").await.unwrap() else {
        panic!("alice should exist");
    };
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].status, GroupStatus::Unsubscribed);
    assert_eq!(groups[1].status, GroupStatus::Pending);

    let request_id = store.pending_requests().await.unwrap()[0].id;
    assert_eq!(
        store.process(request_id, Action::Approve).await.unwrap(),
        ProcessOutcome::Processed
    );
    assert_eq!(
        store.process(request_id, Action::Approve).await.unwrap(),
        ProcessOutcome::IdentifierNotFound
    );
    assert!(store.pending_requests().await.unwrap().is_empty());

    let approved = store.approved_subscriptions().await.unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(
        store.submit_request("alice", "RISK_WEEKLY").await.unwrap(),
        SubmitOutcome::DuplicateOrPending
    );

    assert_eq!(
        store.process(approved[0].id, Action::Revoke).await.unwrap(),
        ProcessOutcome::Processed
    );
    assert!(store.approved_subscriptions().await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn unknown_subscriber_group_and_ids(pool: PgPool) {
    let store = seeded(pool).await;

    assert_eq!(
        store.groups_for_subscriber("mallory").await.unwrap(),
        Lookup::NotFound
    );
    assert_eq!(
        store.submit_request("mallory", "FIN_DAILY").await.unwrap(),
        SubmitOutcome::UnknownSubscriber
    );
    assert_eq!(
        store.submit_request("alice", "NO_SUCH_GROUP").await.unwrap(),
        SubmitOutcome::UnknownGroup
    );
    assert_eq!(
        store.process(404, Action::Reject).await.unwrap(),
        ProcessOutcome::IdentifierNotFound
    );
    assert_eq!(
        store.process(404, Action::Revoke).await.unwrap(),
        ProcessOutcome::IdentifierNotFound
    );
    assert!(
        store
            .create_group("FIN_DAILY", "duplicate")
            .await
            .unwrap()
            .is_none()
    );
    store.ping().await.unwrap();
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn dates_come_from_the_store_clock(pool: PgPool) {
    let day = Date::from_calendar_date(2025, Month::March, 14).unwrap();
    let store = seeded(pool).await.with_clock(move || day);

    store.submit_request("alice", "FIN_DAILY").await.unwrap();
    let pending = store.pending_requests().await.unwrap();
    assert_eq!(pending[0].requested_date, day);

    store.process(pending[0].id, Action::Approve).await.unwrap();
    let approved = store.approved_subscriptions().await.unwrap();
    assert_eq!(approved[0].subscription_date, day);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn resubmitting_during_approval_leaves_no_stale_request(pool: PgPool) {
    let store = seeded(pool).await;

    for _ in 0..25 {
        assert_eq!(
            store.submit_request("alice", "FIN_DAILY").await.unwrap(),
            SubmitOutcome::Submitted
        );
        let request_id = store.pending_requests().await.unwrap()[0].id;

        let (approved, resubmitted) = tokio::join!(
            store.process(request_id, Action::Approve),
            store.submit_request("alice", "FIN_DAILY"),
        );
        assert_eq!(approved.unwrap(), ProcessOutcome::Processed);
        assert_eq!(resubmitted.unwrap(), SubmitOutcome::DuplicateOrPending);
        assert!(store.pending_requests().await.unwrap().is_empty());

        let subscription = store.approved_subscriptions().await.unwrap();
        assert_eq!(subscription.len(), 1);
        store
            .process(subscription[0].id, Action::Revoke)
            .await
            .unwrap();
    }
}
