/// Shared test helpers
///
/// Builds the full router against a lazily-connected pool: no connection is
/// attempted until a query actually runs, so the route guard, validation,
/// and error-mapping paths are exercised end-to-end without a database.

use axum::{body::Body, response::Response, Router};
use badfinder_api::{
    app::{build_router, AppState},
    config::{ApiConfig, AuthConfig, Config, DatabaseConfig},
};
use badfinder_shared::auth::session::{create_session_token, SessionClaims};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

/// Signing secret used by every test token
pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Builds the application router with test configuration
pub fn test_app() -> Router {
    let config = Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://localhost/badfinder_test".to_string(),
            max_connections: 2,
        },
        auth: AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
        },
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_lazy(&config.database.url)
        .expect("lazy pool should build");

    build_router(AppState::new(pool, config))
}

/// Creates a valid session token for a random user
pub fn valid_token() -> String {
    let claims = SessionClaims::new(Uuid::new_v4(), "test@example.com");
    create_session_token(&claims, TEST_SECRET).expect("token should sign")
}

/// Formats a session cookie header value for the given token
pub fn session_cookie(token: &str) -> String {
    format!("session_token={token}")
}

/// Reads a response body as JSON
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
