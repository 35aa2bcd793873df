//! Repository for the `submissions` table.
//!
//! `tally_submission_id` is the idempotency key for webhook deliveries.
//! Inserts go through `ON CONFLICT DO NOTHING` so a concurrent duplicate
//! delivery can never produce a second row; the loser of the race reads
//! the winner's row back and reports it as its own success.

use sqlx::PgPool;

use gradlink_core::types::DbId;

use crate::models::submission::{CreateSubmission, Submission};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, form_id, tally_submission_id, applicant_id, applicant_role, \
                       applicant_email, applicant_name, payload, status, reviewed_by, \
                       reviewed_at, notes, submitted_at, created_at, updated_at";

/// Provides CRUD operations for submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Insert a submission if none exists for its provider-side id.
    ///
    /// Returns `Some(row)` when this call created the record and `None`
    /// when another delivery already had; callers treat `None` as the
    /// duplicate-success path and look the existing row up.
    pub async fn create_if_absent(
        pool: &PgPool,
        input: &CreateSubmission,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "INSERT INTO submissions (form_id, tally_submission_id, applicant_id, applicant_role,
                                      applicant_email, applicant_name, payload)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (tally_submission_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(input.form_id)
            .bind(&input.tally_submission_id)
            .bind(input.applicant_id)
            .bind(&input.applicant_role)
            .bind(&input.applicant_email)
            .bind(&input.applicant_name)
            .bind(&input.payload)
            .fetch_optional(pool)
            .await
    }

    /// Find a submission by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions WHERE id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a submission by its provider-side id (the idempotency gate).
    pub async fn find_by_tally_id(
        pool: &PgPool,
        tally_submission_id: &str,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions WHERE tally_submission_id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(tally_submission_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an applicant's submission on a form by their email snapshot.
    ///
    /// Backs the "already applied" short-circuit in session issuance.
    pub async fn find_by_email_and_form(
        pool: &PgPool,
        email: &str,
        form_id: DbId,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM submissions
             WHERE applicant_email = $1 AND form_id = $2
             ORDER BY submitted_at ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(email)
            .bind(form_id)
            .fetch_optional(pool)
            .await
    }

    /// List all submissions for a form, newest first.
    pub async fn list_for_form(
        pool: &PgPool,
        form_id: DbId,
    ) -> Result<Vec<Submission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM submissions
             WHERE form_id = $1
             ORDER BY submitted_at DESC"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(form_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a review update, returning the updated row.
    ///
    /// When `reviewer` is `Some`, the reviewer id and timestamp are
    /// stamped (the handler passes it on the first transition away from
    /// `unread`); otherwise the existing stamp is preserved.
    pub async fn update_review(
        pool: &PgPool,
        id: DbId,
        status: &str,
        notes: Option<&str>,
        reviewer: Option<DbId>,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "UPDATE submissions
             SET status = $2,
                 notes = COALESCE($3, notes),
                 reviewed_by = COALESCE($4, reviewed_by),
                 reviewed_at = CASE WHEN $4 IS NOT NULL THEN NOW() ELSE reviewed_at END,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .bind(status)
            .bind(notes)
            .bind(reviewer)
            .fetch_optional(pool)
            .await
    }
}
