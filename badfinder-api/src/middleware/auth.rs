/// Session authentication for handlers
///
/// Handlers that require a logged-in user take a [`CurrentUser`] argument;
/// the extractor pulls the session token from the `Authorization: Bearer`
/// header or the session cookie, validates it, and rejects with 401 when
/// neither yields a valid session.
///
/// # Example
///
/// ```ignore
/// async fn create_review(
///     State(state): State<AppState>,
///     user: CurrentUser,
///     Json(req): Json<CreateReviewRequest>,
/// ) -> ApiResult<impl IntoResponse> {
///     // user.user_id is the authenticated user's ID
/// }
/// ```

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use badfinder_shared::auth::session::{token_from_headers, validate_session_token};
use uuid::Uuid;

use crate::{app::AppState, error::ApiError};

/// The authenticated user behind the current request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Email from the session claims
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        let claims = validate_session_token(&token, state.jwt_secret())
            .map_err(|_| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

        Ok(CurrentUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}
