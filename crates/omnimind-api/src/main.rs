//! omnimind-api - HTTP API server for the OmniMind backend.

mod auth;
mod handlers;
mod validate;

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use governor::{Quota, RateLimiter};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use omnimind_db::Database;
use omnimind_inference::OpenAiBackend;
use omnimind_jobs::{
    AiService, ExtractTasksHandler, JobWorker, OptimizeScheduleHandler, SummarizeMeetingHandler,
    WorkerConfig,
};
use omnimind_mailer::Mailer;

use auth::AuthKeys;
use handlers::{ai, auth as auth_handlers, meetings, notifications, projects, tasks};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful for
/// log correlation and debugging production incidents.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Global rate limiter type (direct quota, no keyed bucketing).
type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub ai: Arc<AiService>,
    pub mailer: Arc<Mailer>,
    pub auth: AuthKeys,
    /// Global rate limiter (None if rate limiting is disabled).
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
    /// Frontend origin, used for CORS and links in emails.
    pub client_url: String,
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    Database(omnimind_core::Error),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    /// Upstream dependency (LLM, SMTP) failure; message is the fixed
    /// client-facing text, detail is already server-logged.
    Upstream(String),
    Internal(String),
    RateLimited,
}

impl From<omnimind_core::Error> for ApiError {
    fn from(err: omnimind_core::Error) -> Self {
        match &err {
            omnimind_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            omnimind_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            omnimind_core::Error::Conflict(msg) => ApiError::Conflict(msg.clone()),
            omnimind_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg.clone()),
            omnimind_core::Error::Forbidden(msg) => ApiError::Forbidden(msg.clone()),
            omnimind_core::Error::Database(sqlx_err) => {
                let msg = sqlx_err.to_string();
                if msg.contains("duplicate key") || msg.contains("unique constraint") {
                    return ApiError::Conflict("Resource already exists".to_string());
                }
                ApiError::Database(err)
            }
            _ => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Database(err) => {
                // Full detail stays server-side.
                error!(error = %err, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                error!(error = %msg, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests, please try again later".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

/// Global request rate limiting.
async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            return Err(ApiError::RateLimited);
        }
    }
    Ok(next.run(request).await)
}

// =============================================================================
// HEALTH
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// STARTUP
// =============================================================================

fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   RUST_LOG    - standard env filter
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "omnimind_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("omnimind-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(non_blocking),
                )
                .init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );
    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    // Configuration is read once at startup; no hot reload.
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/omnimind".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);
    let client_url =
        std::env::var("CLIENT_URL").unwrap_or_else(|_| "http://localhost:3001".to_string());

    let auth_keys = AuthKeys::from_env()?;

    // Rate limiting configuration.
    // RATE_LIMIT_REQUESTS: requests per period (default: 100)
    // RATE_LIMIT_PERIOD_SECS: period in seconds (default: 60)
    let rate_limit_requests: u32 = std::env::var("RATE_LIMIT_REQUESTS")
        .unwrap_or_else(|_| "100".to_string())
        .parse()
        .unwrap_or(100);
    let rate_limit_period_secs: u64 = std::env::var("RATE_LIMIT_PERIOD_SECS")
        .unwrap_or_else(|_| "60".to_string())
        .parse()
        .unwrap_or(60);
    let rate_limit_enabled: bool = std::env::var("RATE_LIMIT_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(true);

    info!(
        "Rate limiting: {} ({} requests per {} seconds)",
        if rate_limit_enabled { "enabled" } else { "disabled" },
        rate_limit_requests,
        rate_limit_period_secs
    );

    // Connect to database and run migrations.
    info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;
    info!("Database connected");

    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // Inference backend and orchestration service.
    let backend = Arc::new(OpenAiBackend::from_env()?);
    info!("Inference backend initialized: {}", backend.config().model);
    let ai = Arc::new(AiService::new(db.clone(), backend));

    // Email dispatch.
    let mailer = Arc::new(Mailer::from_env()?);

    // Create and start the job worker.
    let worker_config = WorkerConfig::from_env();
    let _worker_handle = if worker_config.enabled {
        info!("Starting job worker...");
        let worker = JobWorker::new(db.clone(), worker_config);
        worker
            .register_handler(ExtractTasksHandler::new(ai.clone()))
            .await;
        worker
            .register_handler(SummarizeMeetingHandler::new(ai.clone()))
            .await;
        worker
            .register_handler(OptimizeScheduleHandler::new(ai.clone()))
            .await;
        let handle = worker.start();
        info!("Job worker started");
        Some(handle)
    } else {
        info!("Job worker disabled");
        None
    };

    // Create rate limiter if enabled.
    let rate_limiter = if rate_limit_enabled {
        let quota = Quota::with_period(std::time::Duration::from_secs(rate_limit_period_secs))
            .expect("Rate limit period must be non-zero")
            .allow_burst(NonZeroU32::new(rate_limit_requests.max(1)).expect("non-zero"));
        Some(Arc::new(RateLimiter::direct(quota)))
    } else {
        None
    };

    let state = AppState {
        db,
        ai,
        mailer,
        auth: auth_keys,
        rate_limiter,
        client_url: client_url.clone(),
    };

    // CORS: single allowed origin from CLIENT_URL.
    let cors = CorsLayer::new()
        .allow_origin(
            client_url
                .parse::<HeaderValue>()
                .map(AllowOrigin::exact)
                .unwrap_or_else(|_| AllowOrigin::any()),
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    // Build router.
    let app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Auth
        .route("/api/v1/auth/register", post(auth_handlers::register))
        .route("/api/v1/auth/login", post(auth_handlers::login))
        .route("/api/v1/auth/me", get(auth_handlers::me))
        .route("/api/v1/auth/profile", put(auth_handlers::update_profile))
        .route("/api/v1/auth/refresh", post(auth_handlers::refresh_token))
        // Projects
        .route(
            "/api/v1/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route("/api/v1/projects/stats", get(projects::project_stats))
        .route(
            "/api/v1/projects/:id",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        // Tasks
        .route(
            "/api/v1/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route("/api/v1/tasks/upcoming", get(tasks::upcoming_tasks))
        .route(
            "/api/v1/tasks/:id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/api/v1/tasks/:id/complete", patch(tasks::complete_task))
        // Meetings
        .route("/api/v1/meetings", post(meetings::create_meeting))
        .route("/api/v1/meetings/:id", get(meetings::get_meeting))
        // Notifications
        .route(
            "/api/v1/notifications",
            get(notifications::list_notifications)
                .post(notifications::create_notification)
                .delete(notifications::clear_all_notifications),
        )
        .route(
            "/api/v1/notifications/preferences",
            get(notifications::get_preferences).put(notifications::update_preferences),
        )
        .route(
            "/api/v1/notifications/test",
            post(notifications::send_test_notification),
        )
        .route(
            "/api/v1/notifications/read-all",
            post(notifications::mark_all_read),
        )
        .route(
            "/api/v1/notifications/:id/read",
            patch(notifications::mark_read),
        )
        .route(
            "/api/v1/notifications/:id",
            delete(notifications::delete_notification),
        )
        // AI: synchronous endpoints
        .route("/api/v1/ai/extract-tasks", post(ai::extract_tasks))
        .route("/api/v1/ai/summarize-meeting", post(ai::summarize_meeting))
        .route("/api/v1/ai/optimize-schedule", post(ai::optimize_schedule))
        .route("/api/v1/ai/productivity", get(ai::productivity))
        .route("/api/v1/ai/conflicts", get(ai::conflicts))
        // AI: job queue
        .route("/api/v1/ai/jobs", get(ai::list_jobs).post(ai::enqueue_job))
        .route("/api/v1/ai/jobs/stats", get(ai::job_stats))
        .route("/api/v1/ai/jobs/:id", get(ai::get_job))
        // Middleware
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(RequestBodyLimitLayer::new(10 * 1024 * 1024)) // 10 MB
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!("OmniMind API listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (
                ApiError::BadRequest("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Unauthorized("no".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("dup".into()), StatusCode::CONFLICT),
            (ApiError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (
                ApiError::Upstream("Failed to extract tasks".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = err.into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = omnimind_core::Error::NotFound("Task not found".into()).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = omnimind_core::Error::InvalidInput("bad field".into()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = omnimind_core::Error::Conflict("Email already registered".into()).into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = omnimind_core::Error::Inference("model exploded".into()).into();
        assert!(matches!(err, ApiError::Database(_)));
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let response =
            ApiError::Internal("connection pool exhausted at 10.0.0.1".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // The body carries only the generic message; detail is logged.
    }
}
