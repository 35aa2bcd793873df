//! Application nonce model.

use serde::Serialize;
use sqlx::FromRow;

use gradlink_core::types::{DbId, Timestamp};

/// A row from the `application_nonces` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApplicationNonce {
    pub nonce: String,
    pub status: String,
    pub applicant_id: DbId,
    pub applicant_role: String,
    pub job_id: DbId,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

impl ApplicationNonce {
    /// Whether this nonce is still consumable at `now`.
    pub fn is_pending_at(&self, now: Timestamp) -> bool {
        self.status == gradlink_core::nonces::NONCE_STATUS_PENDING && self.expires_at > now
    }
}
