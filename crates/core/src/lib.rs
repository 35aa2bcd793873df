//! GradLink domain core.
//!
//! Pure domain logic shared by the database and API crates: the error
//! taxonomy, applicant roles, webhook signature verification, and the
//! form-field conventions used by the Tally integration. Nothing in this
//! crate performs I/O.

pub mod error;
pub mod forms;
pub mod nonces;
pub mod review;
pub mod roles;
pub mod signature;
pub mod types;
