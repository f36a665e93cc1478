use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::models::User;

/// Queries over the users table.
pub struct Users<'a> {
    pool: &'a PgPool,
}

impl<'a> Users<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, is_subscribed, subscription_ends FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
    }

    /// Insert a freshly signed-up user. Duplicate deliveries of the same
    /// sign-up event are a clean no-op; returns false when the row
    /// already existed.
    pub async fn create(&self, id: &str, email: &str) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO users (id, email) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING")
                .bind(id)
                .bind(email)
                .execute(self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark the user subscribed until the given instant, regardless of
    /// prior state. Returns false when the user row is missing.
    pub async fn start_subscription(
        &self,
        id: &str,
        until: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET is_subscribed = TRUE, subscription_ends = $2 WHERE id = $1")
                .bind(id)
                .bind(until)
                .execute(self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Lazy expiry: clear the subscription flag and end date.
    pub async fn end_subscription(&self, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET is_subscribed = FALSE, subscription_ends = NULL WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
