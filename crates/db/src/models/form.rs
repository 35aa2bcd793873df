//! Form entity models and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use gradlink_core::types::{DbId, Timestamp};

/// A row from the `forms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Form {
    pub id: DbId,
    pub job_id: DbId,
    pub tally_form_id: String,
    pub title: String,
    pub is_active: bool,
    pub submission_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a form record after the provider has accepted it.
#[derive(Debug, Clone)]
pub struct CreateForm {
    pub job_id: DbId,
    pub tally_form_id: String,
    pub title: String,
}
