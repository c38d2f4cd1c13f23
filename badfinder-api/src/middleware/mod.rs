/// Request middleware
///
/// - `route_guard`: per-request path gating with login/dashboard redirects
/// - `auth`: session extraction for handlers that require a logged-in user

pub mod auth;
pub mod route_guard;
