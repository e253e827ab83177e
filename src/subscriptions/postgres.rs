use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction, postgres::PgPoolOptions};
use time::Date;

use super::model::{
    Action, ApprovedSubscription, GroupStatus, GroupStatusEntry, Lookup, PendingRequest,
    ProcessOutcome, ReportGroup, SubmitOutcome, Subscriber,
};
use super::store::{Clock, StoreResult, SubscriptionStore, utc_today};

#[derive(sqlx::FromRow)]
struct GroupStatusRow {
    id: i64,
    group_name: String,
    description: String,
    subscribed: bool,
    pending: bool,
}

#[derive(sqlx::FromRow)]
struct PendingRequestRow {
    id: i64,
    subscriber_username: String,
    group_name: String,
    requested_date: Date,
}

#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    id: i64,
    subscriber_username: String,
    group_name: String,
    subscription_date: Date,
}

#[derive(sqlx::FromRow)]
struct RequestOwnerRow {
    subscriber_username: String,
}

#[derive(sqlx::FromRow)]
struct ConsumedRequestRow {
    subscriber_username: String,
    group_name: String,
}

#[derive(sqlx::FromRow)]
struct ReportGroupRow {
    id: i64,
    group_name: String,
    description: String,
}

#[derive(sqlx::FromRow)]
struct SubscriberRow {
    id: i64,
    username: String,
}

pub struct PgSubscriptionStore {
    db: PgPool,
    today: Clock,
}

impl PgSubscriptionStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::from_pool(db))
    }

    pub fn from_pool(db: PgPool) -> Self {
        Self {
            db,
            today: Arc::new(utc_today),
        }
    }

    /// Replaces the UTC clock used to date requests and subscriptions.
    pub fn with_clock(mut self, today: impl Fn() -> Date + Send + Sync + 'static) -> Self {
        self.today = Arc::new(today);
        self
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.db).await?;
        Ok(())
    }

    async fn subscriber_exists(&self, username: &str) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM subscribers WHERE username = $1)"#,
        )
        .bind(username)
        .fetch_one(&self.db)
        .await?;
        Ok(exists)
    }

    /// Row lock serialising submissions and decisions for one subscriber.
    /// Taken before touching the subscriber's requests; `false` when unknown.
    async fn lock_subscriber(
        tx: &mut Transaction<'static, Postgres>,
        username: &str,
    ) -> StoreResult<bool> {
        let locked = sqlx::query_scalar::<_, i64>(
            r#"SELECT id FROM subscribers WHERE username = $1 FOR UPDATE"#,
        )
        .bind(username)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(locked.is_some())
    }

    async fn revoke(&self, subscription_id: i64) -> StoreResult<ProcessOutcome> {
        let result = sqlx::query(
            r#"
            DELETE FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(subscription_id)
        .execute(&self.db)
        .await?;

        Ok(if result.rows_affected() == 1 {
            ProcessOutcome::Processed
        } else {
            ProcessOutcome::IdentifierNotFound
        })
    }

    async fn decide(&self, request_id: i64, approve: bool) -> StoreResult<ProcessOutcome> {
        let mut tx = self.db.begin().await?;

        let owner = sqlx::query_as::<_, RequestOwnerRow>(
            r#"SELECT subscriber_username FROM subscription_requests WHERE id = $1"#,
        )
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(owner) = owner else {
            return Ok(ProcessOutcome::IdentifierNotFound);
        };
        Self::lock_subscriber(&mut tx, &owner.subscriber_username).await?;

        // DELETE .. RETURNING lets only one concurrent decision consume the request.
        let consumed = sqlx::query_as::<_, ConsumedRequestRow>(
            r#"
            DELETE FROM subscription_requests
            WHERE id = $1
            RETURNING subscriber_username, group_name
            "#,
        )
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = consumed else {
            return Ok(ProcessOutcome::IdentifierNotFound);
        };

        if approve {
            sqlx::query(
                r#"
                INSERT INTO subscriptions (subscriber_username, group_name, subscription_date)
                VALUES ($1, $2, $3)
                ON CONFLICT (subscriber_username, group_name) DO NOTHING
                "#,
            )
            .bind(&request.subscriber_username)
            .bind(&request.group_name)
            .bind((self.today)())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(ProcessOutcome::Processed)
    }
}

#[async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    async fn groups_for_subscriber(
        &self,
        username: &str,
    ) -> StoreResult<Lookup<Vec<GroupStatusEntry>>> {
        if !self.subscriber_exists(username).await? {
            return Ok(Lookup::NotFound);
        }

        let rows = sqlx::query_as::<_, GroupStatusRow>(
            r#"
            SELECT
                g.id,
                g.group_name,
                g.description,
                EXISTS (
                    SELECT 1 FROM subscriptions s
                    WHERE s.subscriber_username = $1 AND s.group_name = g.group_name
                ) AS subscribed,
                EXISTS (
                    SELECT 1 FROM subscription_requests r
                    WHERE r.subscriber_username = $1 AND r.group_name = g.group_name
                ) AS pending
            FROM report_groups g
            ORDER BY g.id
            "#,
        )
        .bind(username)
        .fetch_all(&self.db)
        .await?;

        Ok(Lookup::Found(
            rows.into_iter()
                .map(|row| GroupStatusEntry {
                    group_id: row.id,
                    username: username.to_string(),
                    group_name: row.group_name,
                    description: row.description,
                    status: GroupStatus::resolve(row.subscribed, row.pending),
                })
                .collect(),
        ))
    }

    async fn submit_request(
        &self,
        username: &str,
        group_name: &str,
    ) -> StoreResult<SubmitOutcome> {
        let mut tx = self.db.begin().await?;

        if !Self::lock_subscriber(&mut tx, username).await? {
            return Ok(SubmitOutcome::UnknownSubscriber);
        }

        let group_exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM report_groups WHERE group_name = $1)"#,
        )
        .bind(group_name)
        .fetch_one(&mut *tx)
        .await?;
        if !group_exists {
            return Ok(SubmitOutcome::UnknownGroup);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO subscription_requests (subscriber_username, group_name, requested_date)
            SELECT $1, $2, $3
            WHERE NOT EXISTS (
                SELECT 1 FROM subscriptions
                WHERE subscriber_username = $1 AND group_name = $2
            )
            ON CONFLICT (subscriber_username, group_name) DO NOTHING
            "#,
        )
        .bind(username)
        .bind(group_name)
        .bind((self.today)())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(if result.rows_affected() == 1 {
            SubmitOutcome::Submitted
        } else {
            SubmitOutcome::DuplicateOrPending
        })
    }

    async fn pending_requests(&self) -> StoreResult<Vec<PendingRequest>> {
        let rows = sqlx::query_as::<_, PendingRequestRow>(
            r#"
            SELECT id, subscriber_username, group_name, requested_date
            FROM subscription_requests
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| PendingRequest {
                id: r.id,
                subscriber_username: r.subscriber_username,
                group_name: r.group_name,
                requested_date: r.requested_date,
            })
            .collect())
    }

    async fn approved_subscriptions(&self) -> StoreResult<Vec<ApprovedSubscription>> {
        let rows = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, subscriber_username, group_name, subscription_date
            FROM subscriptions
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ApprovedSubscription {
                id: r.id,
                subscriber_username: r.subscriber_username,
                group_name: r.group_name,
                subscription_date: r.subscription_date,
            })
            .collect())
    }

    async fn process(&self, id: i64, action: Action) -> StoreResult<ProcessOutcome> {
        match action {
            Action::Request => Ok(ProcessOutcome::UnsupportedAction),
            Action::Revoke => self.revoke(id).await,
            Action::Approve => self.decide(id, true).await,
            Action::Reject => self.decide(id, false).await,
        }
    }

    async fn create_group(
        &self,
        group_name: &str,
        description: &str,
    ) -> StoreResult<Option<ReportGroup>> {
        let row = sqlx::query_as::<_, ReportGroupRow>(
            r#"
            INSERT INTO report_groups (group_name, description)
            VALUES ($1, $2)
            ON CONFLICT (group_name) DO NOTHING
            RETURNING id, group_name, description
            "#,
        )
        .bind(group_name)
        .bind(description)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|r| ReportGroup {
            id: r.id,
            group_name: r.group_name,
            description: r.description,
        }))
    }

    async fn register_subscriber(&self, username: &str) -> StoreResult<Option<Subscriber>> {
        let row = sqlx::query_as::<_, SubscriberRow>(
            r#"
            INSERT INTO subscribers (username)
            VALUES ($1)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|r| Subscriber {
            id: r.id,
            username: r.username,
        }))
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await?;
        Ok(())
    }
}
