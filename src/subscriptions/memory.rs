use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use time::Date;
use tokio::sync::RwLock;

use super::model::{
    Action, ApprovedSubscription, GroupStatus, GroupStatusEntry, Lookup, PendingRequest,
    ProcessOutcome, ReportGroup, SubmitOutcome, Subscriber,
};
use super::store::{Clock, StoreResult, SubscriptionStore, utc_today};

#[derive(Default)]
struct Tables {
    groups: BTreeMap<i64, ReportGroup>,
    subscribers: BTreeMap<i64, Subscriber>,
    requests: BTreeMap<i64, PendingRequest>,
    subscriptions: BTreeMap<i64, ApprovedSubscription>,
    last_group_id: i64,
    last_subscriber_id: i64,
    last_request_id: i64,
    last_subscription_id: i64,
}

impl Tables {
    fn has_subscriber(&self, username: &str) -> bool {
        self.subscribers.values().any(|s| s.username == username)
    }

    fn has_group(&self, group_name: &str) -> bool {
        self.groups.values().any(|g| g.group_name == group_name)
    }

    fn is_subscribed(&self, username: &str, group_name: &str) -> bool {
        self.subscriptions
            .values()
            .any(|s| s.subscriber_username == username && s.group_name == group_name)
    }

    fn is_pending(&self, username: &str, group_name: &str) -> bool {
        self.requests
            .values()
            .any(|r| r.subscriber_username == username && r.group_name == group_name)
    }
}

/// In-process store, used when no database is configured and by the tests.
pub struct MemorySubscriptionStore {
    tables: RwLock<Tables>,
    today: Clock,
}

impl Default for MemorySubscriptionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySubscriptionStore {
    pub fn new() -> Self {
        Self::with_clock(utc_today)
    }

    pub fn with_clock(today: impl Fn() -> Date + Send + Sync + 'static) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            today: Arc::new(today),
        }
    }
}

#[async_trait]
impl SubscriptionStore for MemorySubscriptionStore {
    async fn groups_for_subscriber(
        &self,
        username: &str,
    ) -> StoreResult<Lookup<Vec<GroupStatusEntry>>> {
        let tables = self.tables.read().await;
        if !tables.has_subscriber(username) {
            return Ok(Lookup::NotFound);
        }

        let entries = tables
            .groups
            .values()
            .map(|group| GroupStatusEntry {
                group_id: group.id,
                username: username.to_string(),
                group_name: group.group_name.clone(),
                description: group.description.clone(),
                status: GroupStatus::resolve(
                    tables.is_subscribed(username, &group.group_name),
                    tables.is_pending(username, &group.group_name),
                ),
            })
            .collect();

        Ok(Lookup::Found(entries))
    }

    async fn submit_request(
        &self,
        username: &str,
        group_name: &str,
    ) -> StoreResult<SubmitOutcome> {
        let mut tables = self.tables.write().await;
        if !tables.has_subscriber(username) {
            return Ok(SubmitOutcome::UnknownSubscriber);
        }
        if !tables.has_group(group_name) {
            return Ok(SubmitOutcome::UnknownGroup);
        }
        if tables.is_subscribed(username, group_name) || tables.is_pending(username, group_name) {
            return Ok(SubmitOutcome::DuplicateOrPending);
        }

        tables.last_request_id += 1;
        let id = tables.last_request_id;
        tables.requests.insert(
            id,
            PendingRequest {
                id,
                subscriber_username: username.to_string(),
                group_name: group_name.to_string(),
                requested_date: (self.today)(),
            },
        );

        Ok(SubmitOutcome::Submitted)
    }

    async fn pending_requests(&self) -> StoreResult<Vec<PendingRequest>> {
        let tables = self.tables.read().await;
        Ok(tables.requests.values().cloned().collect())
    }

    async fn approved_subscriptions(&self) -> StoreResult<Vec<ApprovedSubscription>> {
        let tables = self.tables.read().await;
        Ok(tables.subscriptions.values().cloned().collect())
    }

    async fn process(&self, id: i64, action: Action) -> StoreResult<ProcessOutcome> {
        let mut tables = self.tables.write().await;

        let request = match action {
            Action::Request => return Ok(ProcessOutcome::UnsupportedAction),
            Action::Revoke => {
                return Ok(match tables.subscriptions.remove(&id) {
                    Some(_) => ProcessOutcome::Processed,
                    None => ProcessOutcome::IdentifierNotFound,
                });
            }
            Action::Approve | Action::Reject => match tables.requests.remove(&id) {
                Some(request) => request,
                None => return Ok(ProcessOutcome::IdentifierNotFound),
            },
        };

        if action == Action::Approve
            && !tables.is_subscribed(&request.subscriber_username, &request.group_name)
        {
            tables.last_subscription_id += 1;
            let id = tables.last_subscription_id;
            tables.subscriptions.insert(
                id,
                ApprovedSubscription {
                    id,
                    subscriber_username: request.subscriber_username,
                    group_name: request.group_name,
                    subscription_date: (self.today)(),
                },
            );
        }

        Ok(ProcessOutcome::Processed)
    }

    async fn create_group(
        &self,
        group_name: &str,
        description: &str,
    ) -> StoreResult<Option<ReportGroup>> {
        let mut tables = self.tables.write().await;
        if tables.has_group(group_name) {
            return Ok(None);
        }

        tables.last_group_id += 1;
        let group = ReportGroup {
            id: tables.last_group_id,
            group_name: group_name.to_string(),
            description: description.to_string(),
        };
        tables.groups.insert(group.id, group.clone());

        Ok(Some(group))
    }

    async fn register_subscriber(&self, username: &str) -> StoreResult<Option<Subscriber>> {
        let mut tables = self.tables.write().await;
        if tables.has_subscriber(username) {
            return Ok(None);
        }

        tables.last_subscriber_id += 1;
        let subscriber = Subscriber {
            id: tables.last_subscriber_id,
            username: username.to_string(),
        };
        tables.subscribers.insert(subscriber.id, subscriber.clone());

        Ok(Some(subscriber))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
