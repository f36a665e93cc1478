use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers::{subscription, todos, webhooks};
use crate::identity::RoleLookup;
use crate::middleware::{auth, gate};

/// Application state assembled by the composition root and cloned into
/// handlers. The pool is the only shared resource; `PgPool` is internally
/// reference-counted, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: PgPool,
    pub roles: Arc<dyn RoleLookup>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Protected API
        .merge(todo_routes())
        .merge(subscription_routes())
        // Provider-originated (signed, public)
        .merge(webhook_routes())
        // Global middleware: identity resolution runs before the gate
        .layer(axum::middleware::from_fn_with_state(state.clone(), gate::gatekeeper))
        .layer(axum::middleware::from_fn_with_state(state.clone(), auth::resolve_identity))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/api/todos", get(todos::list).post(todos::create))
        .route("/api/todos/:id", put(todos::update).delete(todos::remove))
}

fn subscription_routes() -> Router<AppState> {
    Router::new().route(
        "/api/subscription",
        get(subscription::status).post(subscription::activate),
    )
}

fn webhook_routes() -> Router<AppState> {
    Router::new().route("/api/webhooks/register", post(webhooks::register))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Taskify API",
        "version": version,
        "description": "SaaS to-do list API with subscription-gated entitlements",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "todos": "GET|POST /api/todos, PUT|DELETE /api/todos/:id (protected)",
            "subscription": "GET|POST /api/subscription (protected)",
            "webhooks": "POST /api/webhooks/register (signed, provider-originated)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
