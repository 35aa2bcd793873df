//! Submission review workflow statuses.
//!
//! Submissions arrive as `unread` and move through the review states below.
//! These must match the CHECK constraint on `submissions.status`.

use crate::error::CoreError;

pub const REVIEW_STATUS_UNREAD: &str = "unread";
pub const REVIEW_STATUS_REVIEWED: &str = "reviewed";
pub const REVIEW_STATUS_SHORTLISTED: &str = "shortlisted";
pub const REVIEW_STATUS_REJECTED: &str = "rejected";

/// All valid review statuses, in workflow order.
pub const REVIEW_STATUSES: [&str; 4] = [
    REVIEW_STATUS_UNREAD,
    REVIEW_STATUS_REVIEWED,
    REVIEW_STATUS_SHORTLISTED,
    REVIEW_STATUS_REJECTED,
];

/// Validate a review status coming from a request body.
pub fn validate_review_status(status: &str) -> Result<(), CoreError> {
    if REVIEW_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown review status: {status}"
        )))
    }
}
