use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{self, AuthUser, CurrentUser};

/// Identity middleware: resolves the caller from a Bearer session token and
/// attaches `CurrentUser` to the request. Absent or invalid tokens resolve
/// to anonymous; rejection is the gatekeeper's and the handlers' decision.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let current = match bearer_token(request.headers()) {
        Some(token) => match auth::decode_token(&state.config.identity.jwt_secret, token) {
            Ok(claims) => CurrentUser(Some(AuthUser { id: claims.sub })),
            Err(err) => {
                tracing::debug!("rejected bearer token: {}", err);
                CurrentUser(None)
            }
        },
        None => CurrentUser(None),
    };

    request.extensions_mut().insert(current);
    next.run(request).await
}

/// Extract the token from an `Authorization: Bearer ...` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
