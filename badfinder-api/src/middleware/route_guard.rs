/// Route guard middleware
///
/// Runs once per request, before the downstream handler. The path is
/// classified and the guard decision table applied:
///
/// - protected paths without a valid session redirect to the login page,
///   carrying the original path in `callbackUrl`;
/// - the login/signup pages redirect an already-authenticated client to the
///   dashboard;
/// - everything else passes through untouched.
///
/// The decision logic itself lives in `badfinder_shared::auth::guard` and is
/// pure; this middleware only contributes token extraction and verification.
/// A token that fails verification for any reason is treated exactly like an
/// absent token.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use badfinder_shared::auth::{
    guard::{self, GuardDecision},
    session,
};

use crate::app::AppState;

/// Applies the guard decision table to one request
pub async fn route_guard(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    // Verification failure degrades to "no session"; the guard never errors
    let has_session = session::token_from_headers(req.headers())
        .map(|token| session::validate_session_token(&token, state.jwt_secret()).is_ok())
        .unwrap_or(false);

    match guard::evaluate(&path, has_session) {
        GuardDecision::Allow => next.run(req).await,
        GuardDecision::RedirectToLogin { location } => redirect(&location),
        GuardDecision::RedirectToDashboard => redirect(guard::AFTER_LOGIN_PATH),
    }
}

fn redirect(location: &str) -> Response {
    match header::HeaderValue::from_str(location) {
        Ok(value) => {
            (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, value)]).into_response()
        }
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}
