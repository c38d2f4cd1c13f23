/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use badfinder_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{config::Config, error::ApiError, middleware::route_guard, routes};

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; `Arc`
/// keeps the clone cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the session token signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.auth.jwt_secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /api/
///     ├── /auth/
///     │   ├── POST /signup
///     │   ├── POST /login
///     │   └── POST /logout
///     └── /circles/
///         ├── GET    /                 # Search/listing
///         ├── POST   /                 # Create
///         ├── GET    /:id
///         ├── PUT    /:id
///         ├── DELETE /:id
///         ├── GET    /:id/reviews
///         ├── POST   /:id/reviews      # Requires session
///         ├── POST   /:id/members      # Requires session
///         ├── PUT    /:id/members/:user_id
///         └── DELETE /:id/members/:user_id
/// ```
///
/// The route guard wraps the whole router (including the fallback), so page
/// paths such as `/dashboard` are gated even though no handler serves them
/// here. Session-requiring handlers use the `CurrentUser` extractor.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout));

    let circle_routes = Router::new()
        .route(
            "/",
            get(routes::circles::list_circles).post(routes::circles::create_circle),
        )
        .route(
            "/:id",
            get(routes::circles::get_circle)
                .put(routes::circles::update_circle)
                .delete(routes::circles::delete_circle),
        )
        .route(
            "/:id/reviews",
            get(routes::reviews::list_reviews).post(routes::reviews::create_review),
        )
        .route("/:id/members", post(routes::members::join_circle))
        .route(
            "/:id/members/:user_id",
            put(routes::members::update_member_status).delete(routes::members::remove_member),
        );

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/circles", circle_routes);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            route_guard::route_guard,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state))
        .with_state(state)
}

/// Configures CORS from the configured origins; `*` means permissive
fn cors_layer(state: &AppState) -> CorsLayer {
    if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    }
}

/// Envelope-shaped 404 for unmatched paths
async fn not_found() -> ApiError {
    ApiError::NotFound("Resource not found".to_string())
}
