//! Repository for the `form_webhooks` table.

use sqlx::PgPool;

use gradlink_core::types::DbId;

use crate::models::webhook::{CreateFormWebhook, FormWebhook};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, form_id, tally_webhook_id, callback_url, signing_secret, is_active, \
                       delivery_count, error_count, last_error, last_synced_at, created_at, \
                       updated_at";

/// Provides CRUD operations for webhook registrations.
pub struct WebhookRepo;

impl WebhookRepo {
    /// Insert a new webhook registration, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateFormWebhook,
    ) -> Result<FormWebhook, sqlx::Error> {
        let query = format!(
            "INSERT INTO form_webhooks (form_id, tally_webhook_id, callback_url, signing_secret)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormWebhook>(&query)
            .bind(input.form_id)
            .bind(&input.tally_webhook_id)
            .bind(&input.callback_url)
            .bind(&input.signing_secret)
            .fetch_one(pool)
            .await
    }

    /// Find the active registration for a form, if any.
    pub async fn find_active_by_form(
        pool: &PgPool,
        form_id: DbId,
    ) -> Result<Option<FormWebhook>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM form_webhooks WHERE form_id = $1 AND is_active = true");
        sqlx::query_as::<_, FormWebhook>(&query)
            .bind(form_id)
            .fetch_optional(pool)
            .await
    }

    /// Record the outcome of a delivery attempt.
    ///
    /// Success bumps `delivery_count` and refreshes `last_synced_at`;
    /// failure bumps `error_count` and stores the message in `last_error`.
    /// Both are atomic single-row increments and neither erases the other's
    /// history.
    pub async fn record_delivery(
        pool: &PgPool,
        id: DbId,
        success: bool,
        message: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        if success {
            sqlx::query(
                "UPDATE form_webhooks
                 SET delivery_count = delivery_count + 1,
                     last_synced_at = NOW(),
                     updated_at = NOW()
                 WHERE id = $1",
            )
            .bind(id)
            .execute(pool)
            .await?;
        } else {
            sqlx::query(
                "UPDATE form_webhooks
                 SET error_count = error_count + 1,
                     last_error = $2,
                     updated_at = NOW()
                 WHERE id = $1",
            )
            .bind(id)
            .bind(message)
            .execute(pool)
            .await?;
        }
        Ok(())
    }

    /// Deactivate a registration. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE form_webhooks SET is_active = false, updated_at = NOW()
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
