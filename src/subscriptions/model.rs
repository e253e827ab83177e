use std::{fmt, str::FromStr};

use serde::Serialize;
use time::Date;
use utoipa::ToSchema;

/// Where a subscriber stands with respect to one catalogue group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum GroupStatus {
    Subscribed,
    Unsubscribed,
    Pending,
}

impl GroupStatus {
    /// An active subscription wins over a pending request.
    pub fn resolve(subscribed: bool, pending: bool) -> Self {
        if subscribed {
            GroupStatus::Subscribed
        } else if pending {
            GroupStatus::Pending
        } else {
            GroupStatus::Unsubscribed
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportGroup {
    pub id: i64,
    pub group_name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStatusEntry {
    pub group_id: i64,
    pub username: String,
    pub group_name: String,
    pub description: String,
    pub status: GroupStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: i64,
    pub subscriber_username: String,
    pub group_name: String,
    pub requested_date: Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedSubscription {
    pub id: i64,
    pub subscriber_username: String,
    pub group_name: String,
    pub subscription_date: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Request,
    Approve,
    Reject,
    Revoke,
}

impl Action {
    /// Approve, reject and revoke are the decisions an admin can apply to an id.
    pub fn is_admin_decision(self) -> bool {
        !matches!(self, Action::Request)
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Request => "Request",
            Action::Approve => "Approve",
            Action::Reject => "Reject",
            Action::Revoke => "Revoke",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "request" => Ok(Action::Request),
            "approve" => Ok(Action::Approve),
            "reject" => Ok(Action::Reject),
            "revoke" => Ok(Action::Revoke),
            _ => Err(UnknownAction(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    DuplicateOrPending,
    UnknownGroup,
    UnknownSubscriber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    Processed,
    IdentifierNotFound,
    UnsupportedAction,
}
