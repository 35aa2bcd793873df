//! Submission entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use gradlink_core::types::{DbId, Timestamp};

/// A row from the `submissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: DbId,
    pub form_id: DbId,
    pub tally_submission_id: String,
    pub applicant_id: DbId,
    pub applicant_role: String,
    pub applicant_email: String,
    pub applicant_name: String,
    pub payload: serde_json::Value,
    pub status: String,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub submitted_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a submission from a validated webhook delivery.
#[derive(Debug, Clone)]
pub struct CreateSubmission {
    pub form_id: DbId,
    pub tally_submission_id: String,
    pub applicant_id: DbId,
    pub applicant_role: String,
    pub applicant_email: String,
    pub applicant_name: String,
    pub payload: serde_json::Value,
}

/// Request body for the review endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateReview {
    pub status: String,
    pub notes: Option<String>,
}
