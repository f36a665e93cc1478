use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::users::Users;
use crate::error::ApiError;
use crate::webhook::{IdentityEvent, SignatureVerifier};

/// POST /api/webhooks/register - signed identity-provider event intake
///
/// Verifies the delivery signature over the exact raw body before touching
/// anything else; only a `user.created` event reaches persistence, where it
/// creates the account row for a first sign-up. Every other event type is
/// acknowledged and ignored.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let Some(secret) = state.config.webhook.secret.as_deref() else {
        return Err(ApiError::internal("Webhook secret not set"));
    };
    let verifier = SignatureVerifier::new(secret).map_err(|err| {
        tracing::error!("webhook secret rejected: {}", err);
        ApiError::internal("Webhook secret not set")
    })?;

    let (Some(msg_id), Some(timestamp), Some(signature)) = (
        header_str(&headers, "svix-id"),
        header_str(&headers, "svix-timestamp"),
        header_str(&headers, "svix-signature"),
    ) else {
        return Err(ApiError::bad_request("Missing svix headers"));
    };

    verifier
        .verify(msg_id, timestamp, signature, &body, Utc::now())
        .map_err(|err| {
            tracing::warn!("webhook signature rejected: {}", err);
            ApiError::bad_request("Invalid signature")
        })?;

    let event: IdentityEvent = serde_json::from_slice(&body)
        .map_err(|_| ApiError::bad_request("Invalid payload"))?;

    if event.event_type == "user.created" {
        let Some(user_id) = event.data.id.as_deref() else {
            return Err(ApiError::bad_request("User id missing"));
        };
        let Some(email) = event.data.primary_email() else {
            return Err(ApiError::bad_request("Primary email not found"));
        };

        match Users::new(&state.pool).create(user_id, email).await {
            Ok(true) => tracing::info!(user = %user_id, "user created from webhook"),
            // Replayed sign-up event: the row already exists
            Ok(false) => tracing::debug!(user = %user_id, "duplicate user.created ignored"),
            Err(err) => {
                tracing::error!("user creation failed: {}", err);
                return Err(ApiError::internal("Error creating user"));
            }
        }
    }

    Ok(Json(json!({ "message": "Webhook received" })))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
