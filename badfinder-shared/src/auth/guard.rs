/// Route guard: path classification and redirect decisions
///
/// Every incoming request path falls into one of three non-overlapping
/// classes:
///
/// - **protected** — requires a valid session (`/dashboard`,
///   `/manage-circle`, `/profile`)
/// - **auth-only** — the login/signup pages, which a logged-in user is
///   redirected away from (`/auth/login`, `/auth/signup`)
/// - **public** — everything else (the implicit default)
///
/// The decision logic here is pure: token verification happens in the
/// middleware that calls [`evaluate`], and an invalid or expired token is
/// passed in as `has_session = false`. That keeps the full decision table
/// unit-testable without an identity provider.
///
/// # Decision table
///
/// | path class | valid session | action                                    |
/// |------------|---------------|-------------------------------------------|
/// | protected  | no            | redirect to login with `callbackUrl` set  |
/// | protected  | yes           | pass through                              |
/// | auth-only  | yes           | redirect to the dashboard                 |
/// | auth-only  | no            | pass through                              |
/// | public     | either        | pass through                              |

use serde::Serialize;

/// Paths that require a valid session
pub const PROTECTED_PATHS: &[&str] = &["/dashboard", "/manage-circle", "/profile"];

/// Login/signup pages; inaccessible while logged in
pub const AUTH_ONLY_PATHS: &[&str] = &["/auth/login", "/auth/signup"];

/// Where unauthenticated users are sent
pub const LOGIN_PATH: &str = "/auth/login";

/// Where authenticated users land after login (and when hitting auth pages)
pub const AFTER_LOGIN_PATH: &str = "/dashboard";

/// Classification of a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathClass {
    /// Requires a valid session
    Protected,

    /// Login/signup; must not be visited with a valid session
    AuthOnly,

    /// No restriction
    Public,
}

/// Outcome of the guard for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through to the downstream handler
    Allow,

    /// Send the client to the login page, remembering where it wanted to go
    RedirectToLogin {
        /// Fully-formed redirect target, e.g. `/auth/login?callbackUrl=/dashboard`
        location: String,
    },

    /// Send an already-authenticated client to the dashboard
    RedirectToDashboard,
}

/// Classifies a request path
///
/// Matching is by path segment prefix: `/profile` and `/profile/settings`
/// are protected, `/profiles` is not. Auth-only paths are checked first so
/// that a path listed in both sets behaves as auth-only.
pub fn classify(path: &str) -> PathClass {
    if AUTH_ONLY_PATHS.iter().any(|p| segment_match(path, p)) {
        PathClass::AuthOnly
    } else if PROTECTED_PATHS.iter().any(|p| segment_match(path, p)) {
        PathClass::Protected
    } else {
        PathClass::Public
    }
}

/// Applies the decision table to a classified path
///
/// `has_session` must already reflect token verification; verification
/// failures degrade to `false` rather than erroring.
pub fn evaluate(path: &str, has_session: bool) -> GuardDecision {
    match (classify(path), has_session) {
        (PathClass::AuthOnly, true) => GuardDecision::RedirectToDashboard,
        (PathClass::Protected, false) => GuardDecision::RedirectToLogin {
            location: login_redirect(path),
        },
        _ => GuardDecision::Allow,
    }
}

/// Builds the login redirect target for a protected path
///
/// The originally requested path is preserved in the `callbackUrl` query
/// parameter so the login flow can return the user afterwards.
pub fn login_redirect(requested_path: &str) -> String {
    format!(
        "{}?callbackUrl={}",
        LOGIN_PATH,
        encode_query_value(requested_path)
    )
}

/// True when `path` equals `prefix` or continues past it with a `/`
fn segment_match(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Percent-encodes a query parameter value
///
/// Unreserved characters and `/` pass through so callback paths stay
/// readable; everything else (including `?`, `&`, `#`, `%`) is encoded.
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
