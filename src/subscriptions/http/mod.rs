use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

mod dto;
pub(crate) mod handlers;

pub use dto::{
    ApprovedSubscriptionDto, CreateGroupRequest, GroupStatusDto, PendingRequestDto,
    RegisterSubscriberRequest, ReportGroupDto, SubscriberDto, SubscriptionRequestBody,
};
pub use handlers::{
    create_group, list_approved_subscriptions, list_groups, list_pending_requests,
    process_request, register_subscriber, request_subscription,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups/{username}", get(list_groups))
        .route("/request", post(request_subscription))
        .route("/admin/requests", get(list_pending_requests))
        .route(
            "/admin/approved-subscriptions",
            get(list_approved_subscriptions),
        )
        .route("/admin/process-request", post(process_request))
        .route("/admin/groups", post(create_group))
        .route("/admin/subscribers", post(register_subscriber))
}
