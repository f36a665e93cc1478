use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Todo;

/// Fixed listing page size.
pub const PAGE_SIZE: i64 = 5;

const COLUMNS: &str = "id, title, completed, user_id, created_at";

/// Queries over the todos table. Ownership is enforced inside each
/// statement: a wrong-owner id behaves exactly like a missing row.
pub struct Todos<'a> {
    pool: &'a PgPool,
}

impl<'a> Todos<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of the caller's todos matching the search string, newest
    /// first, plus the total match count. An out-of-range page yields an
    /// empty slice.
    pub async fn page_for_user(
        &self,
        user_id: &str,
        search: &str,
        page: i64,
    ) -> Result<(Vec<Todo>, i64), sqlx::Error> {
        let pattern = format!("%{}%", escape_like(search));
        let offset = PAGE_SIZE * (page - 1);

        let sql = format!(
            "SELECT {COLUMNS} FROM todos \
             WHERE user_id = $1 AND title ILIKE $2 \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        );
        let todos = sqlx::query_as::<_, Todo>(&sql)
            .bind(user_id)
            .bind(&pattern)
            .bind(PAGE_SIZE)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM todos WHERE user_id = $1 AND title ILIKE $2",
        )
        .bind(user_id)
        .bind(&pattern)
        .fetch_one(self.pool)
        .await?;

        Ok((todos, total))
    }

    /// Number of todos the user currently owns (entitlement input).
    pub async fn count_for_user(&self, user_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM todos WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool)
            .await
    }

    pub async fn insert(&self, user_id: &str, title: &str) -> Result<Todo, sqlx::Error> {
        let sql = format!(
            "INSERT INTO todos (id, title, user_id) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&sql)
            .bind(Uuid::new_v4().to_string())
            .bind(title)
            .bind(user_id)
            .fetch_one(self.pool)
            .await
    }

    /// Partial patch: only supplied fields overwrite the stored row.
    /// Returns None when the id does not exist under this owner.
    pub async fn update_owned(
        &self,
        id: &str,
        user_id: &str,
        title: Option<&str>,
        completed: Option<bool>,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let sql = format!(
            "UPDATE todos SET title = COALESCE($3, title), completed = COALESCE($4, completed) \
             WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(title)
            .bind(completed)
            .fetch_optional(self.pool)
            .await
    }

    /// Returns false when the id does not exist under this owner.
    pub async fn delete_owned(&self, id: &str, user_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Derived page count: ceil(total / PAGE_SIZE).
pub fn total_pages(total: i64) -> i64 {
    (total + PAGE_SIZE - 1) / PAGE_SIZE
}

/// Escape LIKE metacharacters so the search string matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
