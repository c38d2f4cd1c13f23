/// Circle membership endpoints
///
/// # Endpoints
///
/// - `POST /api/circles/:id/members` - Request to join (requires session)
/// - `PUT /api/circles/:id/members/:user_id` - Change membership status
/// - `DELETE /api/circles/:id/members/:user_id` - Leave or remove a member
///
/// Joining creates a `pending` membership; approval flips it to `active`.
/// The circle's `memberCount` counts only active members and is recomputed
/// after every membership write.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use badfinder_shared::models::{
    circle::Circle,
    member::{CircleMember, MemberStatus},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::CurrentUser,
    response::{created, ok},
    routes::circles::circle_not_found,
};

/// Membership status change request
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    /// New status
    pub status: MemberStatus,
}

/// Request to join a circle
///
/// # Errors
///
/// - `401 Unauthorized`: no valid session
/// - `404 Not Found`: no such circle
/// - `409 Conflict`: already a member (or pending)
pub async fn join_circle(
    State(state): State<AppState>,
    Path(circle_id): Path<Uuid>,
    user: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    if Circle::find_by_id(&state.db, circle_id).await?.is_none() {
        return Err(circle_not_found());
    }

    let member =
        CircleMember::create(&state.db, circle_id, user.user_id, MemberStatus::Pending).await?;

    Circle::refresh_member_count(&state.db, circle_id).await?;

    Ok(created(member, "Join request submitted"))
}

/// Change a membership's status
///
/// # Errors
///
/// - `401 Unauthorized`: no valid session
/// - `404 Not Found`: no such membership
pub async fn update_member_status(
    State(state): State<AppState>,
    Path((circle_id, user_id)): Path<(Uuid, Uuid)>,
    _user: CurrentUser,
    Json(req): Json<UpdateMemberRequest>,
) -> ApiResult<impl IntoResponse> {
    let member = CircleMember::update_status(&state.db, circle_id, user_id, req.status)
        .await?
        .ok_or_else(member_not_found)?;

    Circle::refresh_member_count(&state.db, circle_id).await?;

    Ok(ok(member, "Membership updated successfully"))
}

/// Leave a circle, or remove one of its members
///
/// # Errors
///
/// - `401 Unauthorized`: no valid session
/// - `404 Not Found`: no such membership
pub async fn remove_member(
    State(state): State<AppState>,
    Path((circle_id, user_id)): Path<(Uuid, Uuid)>,
    _user: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    if !CircleMember::remove(&state.db, circle_id, user_id).await? {
        return Err(member_not_found());
    }

    Circle::refresh_member_count(&state.db, circle_id).await?;

    Ok(ok((), "Member removed successfully"))
}

fn member_not_found() -> ApiError {
    ApiError::NotFound("Membership not found".to_string())
}
