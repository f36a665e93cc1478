use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::CurrentUser;
use crate::database::models::Todo;
use crate::database::todos::{self, Todos};
use crate::database::users::Users;
use crate::entitlement::{may_create_todo, FREE_TIER_TODO_LIMIT};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPage {
    pub todos: Vec<Todo>,
    pub current_page: i64,
    pub total_pages: i64,
}

/// GET /api/todos?page=&search= - list the caller's todos
///
/// Fixed page size of 5, newest first, case-insensitive substring match on
/// the title. An out-of-range page returns an empty slice.
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TodoPage>, ApiError> {
    let user = current.require()?;
    let page = query.page.unwrap_or(1).max(1);
    let search = query.search.unwrap_or_default();

    let (items, total) = Todos::new(&state.pool)
        .page_for_user(&user.id, &search, page)
        .await?;

    Ok(Json(TodoPage {
        todos: items,
        current_page: page,
        total_pages: todos::total_pages(total),
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    pub title: Option<String>,
}

/// POST /api/todos - create a todo for the caller
///
/// A missing or empty title is rejected before any persistence access.
/// Non-subscribed users are capped by the free-tier entitlement.
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let user = current.require()?;

    let title = payload.title.as_deref().unwrap_or("");
    if title.is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }

    let account = Users::new(&state.pool)
        .find(&user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let todos = Todos::new(&state.pool);
    let owned = todos.count_for_user(&user.id).await?;
    if !may_create_todo(account.is_subscribed, owned) {
        return Err(ApiError::forbidden(format!(
            "Upgrade to premium to create more than {} todos",
            FREE_TIER_TODO_LIMIT
        )));
    }

    let todo = todos.insert(&user.id, title).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

/// PUT /api/todos/:id - update title and/or completed
///
/// Only fields present in the body are overwritten. A wrong-owner id is
/// indistinguishable from a missing one (404 either way).
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTodo>,
) -> Result<Json<Value>, ApiError> {
    let user = current.require()?;

    let updated = Todos::new(&state.pool)
        .update_owned(&id, &user.id, payload.title.as_deref(), payload.completed)
        .await?;

    match updated {
        Some(_) => Ok(Json(json!({ "message": "Todo updated" }))),
        None => Err(ApiError::not_found("Todo not found")),
    }
}

/// DELETE /api/todos/:id - delete a todo owned by the caller
pub async fn remove(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user = current.require()?;

    if Todos::new(&state.pool).delete_owned(&id, &user.id).await? {
        Ok(Json(json!({ "message": "Todo deleted" })))
    } else {
        Err(ApiError::not_found("Todo not found"))
    }
}
