use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    subscriptions::model::{Action, Lookup, ProcessOutcome, SubmitOutcome},
};

use super::dto::{
    ApprovedSubscriptionDto, CreateGroupRequest, GroupStatusDto, PendingRequestDto,
    RegisterSubscriberRequest, ReportGroupDto, SubscriberDto, SubscriptionRequestBody,
};

const ALREADY_SUBSCRIBED_OR_PENDING: &str =
    "Failed to send request. Already subscribed or pending.";
const GROUP_NOT_FOUND: &str = "Failed to send request. Group not found.";
const SUBSCRIBER_NOT_FOUND: &str = "Failed to send request. Subscriber not found.";
const ID_AND_ACTION_REQUIRED: &str = "ID (Request or Subscription) and action are required.";
const ID_NOT_FOUND: &str = "Failed to process action. ID not found.";

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn unsupported_action(raw: &str) -> ApiError {
    ApiError::BadRequest(format!(
        "Unsupported action: {raw}. Expected approve, reject or revoke."
    ))
}

#[utoipa::path(
    get,
    path = "/groups/{username}",
    params(
        ("username" = String, Path, description = "Subscriber username")
    ),
    responses(
        (status = 200, description = "Catalogue groups with the subscriber's status", body = [GroupStatusDto]),
        (status = 404, description = "Unknown subscriber"),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    tag = "Subscriber"
)]
pub async fn list_groups(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<Vec<GroupStatusDto>>> {
    let lookup = state
        .store
        .groups_for_subscriber(&username)
        .await
        .map_err(ApiError::Store)?;

    match lookup {
        Lookup::Found(entries) => Ok(Json(entries.into_iter().map(Into::into).collect())),
        Lookup::NotFound => Err(ApiError::NotFound),
    }
}

#[utoipa::path(
    post,
    path = "/request",
    request_body = SubscriptionRequestBody,
    responses(
        (status = 200, description = "Request recorded", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing fields, unknown group or subscriber, or already subscribed/pending", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    tag = "Subscriber"
)]
pub async fn request_subscription(
    State(state): State<AppState>,
    Json(request): Json<SubscriptionRequestBody>,
) -> ApiResult<String> {
    let username = non_blank(request.username.as_deref())
        .ok_or_else(|| ApiError::BadRequest("Username is required.".to_string()))?;
    let group_name = non_blank(request.group_name.as_deref())
        .ok_or_else(|| ApiError::BadRequest("Group name is required.".to_string()))?;

    let outcome = state
        .store
        .submit_request(username, group_name)
        .await
        .map_err(ApiError::Store)?;

    match outcome {
        SubmitOutcome::Submitted => {
            tracing::info!(%username, %group_name, "subscription requested");
            Ok(format!("Subscription request sent for: {group_name}"))
        }
        SubmitOutcome::DuplicateOrPending => Err(ApiError::BadRequest(
            ALREADY_SUBSCRIBED_OR_PENDING.to_string(),
        )),
        SubmitOutcome::UnknownGroup => Err(ApiError::BadRequest(GROUP_NOT_FOUND.to_string())),
        SubmitOutcome::UnknownSubscriber => {
            Err(ApiError::BadRequest(SUBSCRIBER_NOT_FOUND.to_string()))
        }
    }
}

#[utoipa::path(
    get,
    path = "/admin/requests",
    responses(
        (status = 200, description = "Requests awaiting a decision", body = [PendingRequestDto]),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn list_pending_requests(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PendingRequestDto>>> {
    let requests = state
        .store
        .pending_requests()
        .await
        .map_err(ApiError::Store)?;

    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/admin/approved-subscriptions",
    responses(
        (status = 200, description = "Active subscriptions", body = [ApprovedSubscriptionDto]),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn list_approved_subscriptions(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ApprovedSubscriptionDto>>> {
    let subscriptions = state
        .store
        .approved_subscriptions()
        .await
        .map_err(ApiError::Store)?;

    Ok(Json(subscriptions.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/admin/process-request",
    request_body = SubscriptionRequestBody,
    responses(
        (status = 200, description = "Action applied", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing id or action, unsupported action, or unknown id", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn process_request(
    State(state): State<AppState>,
    Json(request): Json<SubscriptionRequestBody>,
) -> ApiResult<String> {
    let (Some(id), Some(raw_action)) = (request.id, non_blank(request.action.as_deref())) else {
        return Err(ApiError::BadRequest(ID_AND_ACTION_REQUIRED.to_string()));
    };

    let action: Action = raw_action
        .parse()
        .map_err(|_| unsupported_action(raw_action))?;
    if !action.is_admin_decision() {
        return Err(unsupported_action(raw_action));
    }

    let outcome = state
        .store
        .process(id, action)
        .await
        .map_err(ApiError::Store)?;

    match outcome {
        ProcessOutcome::Processed => {
            tracing::info!(id, %action, "admin action processed");
            Ok(format!("{} processed successfully.", action.label()))
        }
        ProcessOutcome::IdentifierNotFound => {
            Err(ApiError::BadRequest(ID_NOT_FOUND.to_string()))
        }
        ProcessOutcome::UnsupportedAction => Err(unsupported_action(raw_action)),
    }
}

#[utoipa::path(
    post,
    path = "/admin/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group added to the catalogue", body = ReportGroupDto),
        (status = 400, description = "Blank group name", body = String, content_type = "text/plain"),
        (status = 409, description = "Group name taken", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> ApiResult<(StatusCode, Json<ReportGroupDto>)> {
    let group_name = request.group_name.trim();
    if group_name.is_empty() {
        return Err(ApiError::BadRequest("Group name is required.".to_string()));
    }

    let group = state
        .store
        .create_group(group_name, request.description.trim())
        .await
        .map_err(ApiError::Store)?
        .ok_or_else(|| ApiError::Conflict(format!("Group {group_name} already exists.")))?;

    tracing::info!(group_id = group.id, %group_name, "group created");
    Ok((StatusCode::CREATED, Json(group.into())))
}

#[utoipa::path(
    post,
    path = "/admin/subscribers",
    request_body = RegisterSubscriberRequest,
    responses(
        (status = 201, description = "Subscriber registered", body = SubscriberDto),
        (status = 400, description = "Blank username", body = String, content_type = "text/plain"),
        (status = 409, description = "Username taken", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    tag = "Admin"
)]
pub async fn register_subscriber(
    State(state): State<AppState>,
    Json(request): Json<RegisterSubscriberRequest>,
) -> ApiResult<(StatusCode, Json<SubscriberDto>)> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(ApiError::BadRequest("Username is required.".to_string()));
    }

    let subscriber = state
        .store
        .register_subscriber(username)
        .await
        .map_err(ApiError::Store)?
        .ok_or_else(|| ApiError::Conflict(format!("Subscriber {username} already exists.")))?;

    Ok((StatusCode::CREATED, Json(subscriber.into())))
}
