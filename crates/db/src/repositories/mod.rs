//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod alumni_repo;
pub mod form_repo;
pub mod job_repo;
pub mod member_repo;
pub mod nonce_repo;
pub mod submission_repo;
pub mod webhook_repo;

pub use alumni_repo::AlumniRepo;
pub use form_repo::FormRepo;
pub use job_repo::JobRepo;
pub use member_repo::MemberRepo;
pub use nonce_repo::NonceRepo;
pub use submission_repo::SubmissionRepo;
pub use webhook_repo::WebhookRepo;
