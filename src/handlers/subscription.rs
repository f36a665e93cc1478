use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Months, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::CurrentUser;
use crate::database::users::Users;
use crate::error::ApiError;

/// End of the period granted by an activation: one calendar month out,
/// clamped at month end (Jan 31 + 1 month = Feb 28/29).
fn subscription_end_from(now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    now.checked_add_months(Months::new(1))
}

/// POST /api/subscription - activate a subscription for the caller
///
/// Payment capture is stubbed; activation is unconditional and resets the
/// period regardless of prior state.
pub async fn activate(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, ApiError> {
    let user = current.require()?;

    let until = subscription_end_from(Utc::now())
        .ok_or_else(|| ApiError::internal("subscription end out of range"))?;

    if !Users::new(&state.pool).start_subscription(&user.id, until).await? {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(Json(json!({ "message": "Subscription successful" })))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub is_subscribed: bool,
    pub subscription_ends: Option<DateTime<Utc>>,
}

/// GET /api/subscription - read subscription state with lazy expiry
///
/// A past end date flips the flag and clears the date as a side effect of
/// this read; no background job re-checks it.
pub async fn status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<SubscriptionStatus>, ApiError> {
    let user = current.require()?;
    let users = Users::new(&state.pool);

    let account = users
        .find(&user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let expired = account.is_subscribed
        && account.subscription_ends.is_some_and(|ends| ends < Utc::now());
    if expired {
        users.end_subscription(&user.id).await?;
        return Ok(Json(SubscriptionStatus {
            is_subscribed: false,
            subscription_ends: None,
        }));
    }

    Ok(Json(SubscriptionStatus {
        is_subscribed: account.is_subscribed,
        subscription_ends: account.subscription_ends,
    }))
}
