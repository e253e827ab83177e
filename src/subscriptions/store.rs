//! Storage seam for the subscription workflow.
//!
//! Handlers only talk to [`SubscriptionStore`]; the request lifecycle
//! (pending -> approved/rejected, approved -> revoked) is enforced by the
//! implementations.

use std::sync::Arc;

use async_trait::async_trait;
use time::{Date, OffsetDateTime};

use super::model::{
    Action, ApprovedSubscription, GroupStatusEntry, Lookup, PendingRequest, ProcessOutcome,
    ReportGroup, SubmitOutcome, Subscriber,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Source of the calendar date stamped on new requests and subscriptions.
pub type Clock = Arc<dyn Fn() -> Date + Send + Sync>;

/// Dates are UTC, whatever the host or database session time zone.
pub fn utc_today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Every catalogue group with the subscriber's status, ordered by group id.
    ///
    /// Returns [`Lookup::NotFound`] when the subscriber is unknown.
    async fn groups_for_subscriber(
        &self,
        username: &str,
    ) -> StoreResult<Lookup<Vec<GroupStatusEntry>>>;

    /// Records a pending request unless the subscriber already holds or awaits the group.
    async fn submit_request(
        &self,
        username: &str,
        group_name: &str,
    ) -> StoreResult<SubmitOutcome>;

    async fn pending_requests(&self) -> StoreResult<Vec<PendingRequest>>;

    async fn approved_subscriptions(&self) -> StoreResult<Vec<ApprovedSubscription>>;

    /// Applies an admin decision.
    ///
    /// `Revoke` takes a subscription id, `Approve` and `Reject` take a pending
    /// request id. The pending request is consumed either way.
    async fn process(&self, id: i64, action: Action) -> StoreResult<ProcessOutcome>;

    /// `None` when a group with that name already exists.
    async fn create_group(
        &self,
        group_name: &str,
        description: &str,
    ) -> StoreResult<Option<ReportGroup>>;

    /// `None` when the username is taken.
    async fn register_subscriber(&self, username: &str) -> StoreResult<Option<Subscriber>>;

    async fn ping(&self) -> StoreResult<()>;
}
