//! HTTP request handlers.

pub mod applications;
pub mod jobs;
pub mod sponsors;
