use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Group Access API",
        description = "Subscription requests for report groups and their admin review"
    ),
    paths(
        crate::core::http::handlers::health,
        crate::core::http::handlers::db_health
    ),
    components(schemas(crate::error::ErrorBody)),
    tags(
        (name = "Core", description = "Service endpoints"),
        (name = "Subscriber", description = "Group status and subscription requests"),
        (name = "Admin", description = "Request review and catalogue management")
    )
)]
pub struct ApiDoc;

/// Subscription endpoints; their paths are relative to the configured prefix.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::subscriptions::http::handlers::list_groups,
        crate::subscriptions::http::handlers::request_subscription,
        crate::subscriptions::http::handlers::list_pending_requests,
        crate::subscriptions::http::handlers::list_approved_subscriptions,
        crate::subscriptions::http::handlers::process_request,
        crate::subscriptions::http::handlers::create_group,
        crate::subscriptions::http::handlers::register_subscriber
    ),
    components(schemas(
        crate::subscriptions::model::GroupStatus,
        crate::subscriptions::http::SubscriptionRequestBody,
        crate::subscriptions::http::GroupStatusDto,
        crate::subscriptions::http::PendingRequestDto,
        crate::subscriptions::http::ApprovedSubscriptionDto,
        crate::subscriptions::http::CreateGroupRequest,
        crate::subscriptions::http::ReportGroupDto,
        crate::subscriptions::http::RegisterSubscriberRequest,
        crate::subscriptions::http::SubscriberDto
    ))
)]
pub struct SubscriptionsApi;

/// The served document, with subscription paths under `api_prefix`.
pub fn api_doc(api_prefix: &str) -> utoipa::openapi::OpenApi {
    ApiDoc::openapi().nest(api_prefix, SubscriptionsApi::openapi())
}
