//! Job entity model.

use serde::Serialize;
use sqlx::FromRow;

use gradlink_core::types::{DbId, Timestamp};

/// A row from the `jobs` table.
///
/// Jobs are managed by the main platform service; this crate only reads
/// them to anchor form ownership and the one-active-form-per-job rule.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
