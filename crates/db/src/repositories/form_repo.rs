//! Repository for the `forms` table.

use sqlx::PgPool;

use gradlink_core::types::DbId;

use crate::models::form::{CreateForm, Form};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, job_id, tally_form_id, title, is_active, submission_count, created_at, updated_at";

/// Provides CRUD operations for application forms.
pub struct FormRepo;

impl FormRepo {
    /// Insert a new form, returning the created row.
    ///
    /// Fails with a unique violation (`uq_forms_active_per_job`) when the
    /// job already has an active form.
    pub async fn create(pool: &PgPool, input: &CreateForm) -> Result<Form, sqlx::Error> {
        let query = format!(
            "INSERT INTO forms (job_id, tally_form_id, title)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(input.job_id)
            .bind(&input.tally_form_id)
            .bind(&input.title)
            .fetch_one(pool)
            .await
    }

    /// Find a form by id, active or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Form>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forms WHERE id = $1");
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the active form for a job, if any.
    pub async fn find_active_by_job(
        pool: &PgPool,
        job_id: DbId,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forms WHERE job_id = $1 AND is_active = true");
        sqlx::query_as::<_, Form>(&query)
            .bind(job_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active form by its provider-side id.
    ///
    /// Inactive forms are deliberately invisible here: deliveries for a
    /// replaced form are rejected as unknown.
    pub async fn find_active_by_tally_id(
        pool: &PgPool,
        tally_form_id: &str,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM forms WHERE tally_form_id = $1 AND is_active = true");
        sqlx::query_as::<_, Form>(&query)
            .bind(tally_form_id)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a form (forms are never hard-deleted).
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE forms SET is_active = false, updated_at = NOW()
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically bump the submission counter.
    pub async fn increment_submission_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE forms SET submission_count = submission_count + 1, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
