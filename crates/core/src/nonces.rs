//! Application-nonce status constants.
//!
//! A nonce moves `pending -> used` exactly once; expired rows are purged by
//! the background sweep. These must match the CHECK constraint in
//! `application_nonces`.

pub const NONCE_STATUS_PENDING: &str = "pending";
pub const NONCE_STATUS_USED: &str = "used";
