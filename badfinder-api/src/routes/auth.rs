/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/signup` - Register a new user
/// - `POST /api/auth/login` - Login and receive a session token
/// - `POST /api/auth/logout` - Clear the session cookie
///
/// Login issues the token twice: in the response body for API clients and
/// as an HttpOnly `session_token` cookie for the browser flow the route
/// guard watches. OAuth sign-in is handled by external identity providers;
/// accounts created that way have no password hash and cannot log in here.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use badfinder_shared::{
    auth::{
        password,
        session::{create_session_token, SessionClaims, SESSION_COOKIE},
    },
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::{created, ok},
};

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Session token (also set as a cookie)
    pub token: String,

    /// The authenticated user
    pub user: User,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/signup
/// Content-Type: application/json
///
/// { "name": "山田太郎", "email": "user@example.com", "password": "secret123" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed (field detail in `errors`)
/// - `409 Conflict`: email already registered; no row is created
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    // Checked up front for a clean message; the unique constraint still
    // backstops concurrent signups.
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email is already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash: Some(password_hash),
        },
    )
    .await?;

    Ok(created(user, "User created successfully"))
}

/// Login with email and password
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "secret123" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `401 Unauthorized`: unknown email, OAuth-only account, or wrong
///   password — all three are indistinguishable to the caller
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(invalid)?;

    // OAuth-only accounts have no hash and cannot use credential login
    let hash = user.password_hash.as_deref().ok_or_else(invalid)?;

    if !password::verify_password(&req.password, hash)? {
        return Err(invalid());
    }

    User::update_last_login(&state.db, user.id).await?;

    let claims = SessionClaims::new(user.id, &user.email);
    let token = create_session_token(&claims, state.jwt_secret())?;

    let cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age=2592000"
    );

    let (status, body) = ok(LoginResponse { token, user }, "Logged in successfully");

    Ok((status, [(header::SET_COOKIE, cookie)], body))
}

/// Logout
///
/// Clears the session cookie. The token itself stays valid until expiry;
/// there is no server-side session to revoke.
pub async fn logout() -> impl IntoResponse {
    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    let (_, body) = ok((), "Logged out successfully");

    (StatusCode::OK, [(header::SET_COOKIE, cookie)], body)
}
