//! Repository for the `application_nonces` table.
//!
//! The nonce ledger is one of the two pieces of shared mutable state in the
//! ingestion path, so writes are per-key conditional updates rather than
//! read-modify-write: `mark_used` only flips rows that are still pending,
//! which closes the window where two concurrent deliveries could both
//! consume the same nonce.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gradlink_core::roles::ApplicantRole;
use gradlink_core::types::DbId;

use crate::models::nonce::ApplicationNonce;

/// Column list for `application_nonces` queries.
const COLUMNS: &str = "nonce, status, applicant_id, applicant_role, job_id, expires_at, created_at";

/// Tracks single-use application nonces.
pub struct NonceRepo;

impl NonceRepo {
    /// Insert a fresh pending nonce.
    pub async fn create(
        pool: &PgPool,
        nonce: &str,
        applicant_id: DbId,
        applicant_role: ApplicantRole,
        job_id: DbId,
        expires_at: DateTime<Utc>,
    ) -> Result<ApplicationNonce, sqlx::Error> {
        let query = format!(
            "INSERT INTO application_nonces (nonce, applicant_id, applicant_role, job_id, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApplicationNonce>(&query)
            .bind(nonce)
            .bind(applicant_id)
            .bind(applicant_role.as_str())
            .bind(job_id)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Fetch a nonce row regardless of state.
    ///
    /// Returns the row even when used or expired so the caller can log a
    /// distinct rejection reason (not-found / already-used / expired).
    pub async fn find(pool: &PgPool, nonce: &str) -> Result<Option<ApplicationNonce>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM application_nonces WHERE nonce = $1");
        sqlx::query_as::<_, ApplicationNonce>(&query)
            .bind(nonce)
            .fetch_optional(pool)
            .await
    }

    /// Consume a nonce: `pending -> used`, exactly once.
    ///
    /// Single conditional update; returns `false` when the nonce was
    /// missing or already used, in which case the caller lost the race and
    /// must reject the delivery.
    pub async fn mark_used(pool: &PgPool, nonce: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE application_nonces SET status = 'used'
             WHERE nonce = $1 AND status = 'pending'",
        )
        .bind(nonce)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete nonces that expired before `cutoff`. Returns the count of
    /// deleted rows. Used + still-pending rows both qualify once expired.
    pub async fn delete_expired(
        pool: &PgPool,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM application_nonces WHERE expires_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
