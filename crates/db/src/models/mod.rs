//! Database row structs and DTOs.

pub mod applicant;
pub mod form;
pub mod job;
pub mod nonce;
pub mod submission;
pub mod webhook;
