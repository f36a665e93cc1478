use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};

use crate::app::AppState;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::identity::UserRole;

/// Paths reachable without a resolved identity.
pub const PUBLIC_PATHS: [&str; 4] = ["/", "/api/webhooks/register", "/sign-in", "/sign-up"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Public,
    Api,
    Admin,
    Dashboard,
    Health,
    Other,
}

/// Partition a request path for the gate's decision table. The webhook
/// intake path sits under /api but is on the public allow-list, so the
/// allow-list is checked first.
pub fn classify(path: &str) -> PathClass {
    if path == "/health" {
        PathClass::Health
    } else if PUBLIC_PATHS.contains(&path) {
        PathClass::Public
    } else if path.starts_with("/api") {
        PathClass::Api
    } else if path.starts_with("/admin") {
        PathClass::Admin
    } else if path == "/dashboard" {
        PathClass::Dashboard
    } else {
        PathClass::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Admin,
    Member,
    /// Authenticated, but the external role lookup failed.
    RoleUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Unauthorized,
    Redirect(&'static str),
}

/// The gatekeeper's decision table. API paths answer 401 directly (their
/// callers expect JSON, not a sign-in page); everything else redirects.
pub fn decide(auth: AuthState, class: PathClass) -> Decision {
    match (auth, class) {
        (_, PathClass::Health) => Decision::Allow,
        (AuthState::Anonymous, PathClass::Public) => Decision::Allow,
        (AuthState::Anonymous, PathClass::Api) => Decision::Unauthorized,
        (AuthState::Anonymous, _) => Decision::Redirect("/sign-in"),
        (AuthState::RoleUnavailable, _) => Decision::Redirect("/error"),
        (AuthState::Admin, PathClass::Dashboard | PathClass::Public) => {
            Decision::Redirect("/admin/dashboard")
        }
        (AuthState::Member, PathClass::Admin | PathClass::Public) => {
            Decision::Redirect("/dashboard")
        }
        _ => Decision::Allow,
    }
}

/// Route gatekeeper: intercepts every request, denies unauthenticated
/// access to non-public paths, and redirects authenticated callers to the
/// role-appropriate dashboard.
pub async fn gatekeeper(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Response {
    let class = classify(request.uri().path());
    if class == PathClass::Health {
        return next.run(request).await;
    }

    let auth_state = match &current.0 {
        None => AuthState::Anonymous,
        Some(user) => match state.roles.role_for(&user.id).await {
            Ok(UserRole::Admin) => AuthState::Admin,
            Ok(UserRole::Member) => AuthState::Member,
            Err(err) => {
                tracing::warn!(user = %user.id, "role lookup failed: {}", err);
                AuthState::RoleUnavailable
            }
        },
    };

    match decide(auth_state, class) {
        Decision::Allow => next.run(request).await,
        Decision::Unauthorized => ApiError::unauthorized("Unauthorized").into_response(),
        Decision::Redirect(target) => Redirect::temporary(target).into_response(),
    }
}
