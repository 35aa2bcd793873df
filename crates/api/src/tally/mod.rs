//! Tally form-provider integration.
//!
//! - [`types`]: webhook payload DTOs.
//! - [`client`]: management-API client behind the [`client::FormProvider`] trait.
//! - [`pipeline`]: the webhook ingestion pipeline.

pub mod client;
pub mod pipeline;
pub mod types;

/// Header carrying the base64 HMAC-SHA256 digest of the raw delivery body.
pub const SIGNATURE_HEADER: &str = "tally-signature";
