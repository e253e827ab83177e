use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::subscriptions::model::{
    ApprovedSubscription, GroupStatus, GroupStatusEntry, PendingRequest, ReportGroup, Subscriber,
};

/// Body shared by `/request` and `/admin/process-request`.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequestBody {
    /// Pending request id (approve/reject) or subscription id (revoke).
    #[serde(alias = "requestId")]
    pub id: Option<i64>,
    #[serde(alias = "subscriberUsername")]
    pub username: Option<String>,
    pub group_name: Option<String>,
    /// One of `approve`, `reject`, `revoke`, any case.
    pub action: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupStatusDto {
    pub id: i64,
    pub username: String,
    pub group_name: String,
    pub description: String,
    pub status: GroupStatus,
}

impl From<GroupStatusEntry> for GroupStatusDto {
    fn from(entry: GroupStatusEntry) -> Self {
        Self {
            id: entry.group_id,
            username: entry.username,
            group_name: entry.group_name,
            description: entry.description,
            status: entry.status,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequestDto {
    /// Sent back as `requestId` to approve or reject.
    pub request_id: i64,
    pub subscriber_username: String,
    pub group_name: String,
    /// ISO date, `YYYY-MM-DD`.
    pub requested_date: String,
}

impl From<PendingRequest> for PendingRequestDto {
    fn from(request: PendingRequest) -> Self {
        Self {
            request_id: request.id,
            subscriber_username: request.subscriber_username,
            group_name: request.group_name,
            requested_date: request.requested_date.to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedSubscriptionDto {
    pub id: i64,
    pub subscriber_username: String,
    pub group_name: String,
    /// ISO date, `YYYY-MM-DD`.
    pub subscription_date: String,
}

impl From<ApprovedSubscription> for ApprovedSubscriptionDto {
    fn from(subscription: ApprovedSubscription) -> Self {
        Self {
            id: subscription.id,
            subscriber_username: subscription.subscriber_username,
            group_name: subscription.group_name,
            subscription_date: subscription.subscription_date.to_string(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub group_name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportGroupDto {
    pub id: i64,
    pub group_name: String,
    pub description: String,
}

impl From<ReportGroup> for ReportGroupDto {
    fn from(group: ReportGroup) -> Self {
        Self {
            id: group.id,
            group_name: group.group_name,
            description: group.description,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterSubscriberRequest {
    pub username: String,
}

#[derive(Serialize, ToSchema)]
pub struct SubscriberDto {
    pub id: i64,
    pub username: String,
}

impl From<Subscriber> for SubscriberDto {
    fn from(subscriber: Subscriber) -> Self {
        Self {
            id: subscriber.id,
            username: subscriber.username,
        }
    }
}
