//! Webhook payload signature verification.
//!
//! Tally signs every delivery with HMAC-SHA256 over the raw request body,
//! keyed by the per-webhook signing secret, and sends the base64-encoded
//! digest in the `tally-signature` header. Verification is fail-closed:
//! every malformed input returns `false` rather than an error, so the
//! caller cannot accidentally treat a broken header as accepted.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify the provider's signature over the raw webhook body.
///
/// Returns `false` when the header is absent, the secret is empty, the
/// header is not valid base64, the digest length does not match, or the
/// digests differ. The digest comparison itself is constant-time
/// ([`Mac::verify_slice`]).
pub fn verify_signature(payload: &[u8], header: Option<&str>, secret: &str) -> bool {
    let header = match header {
        Some(h) if !h.is_empty() => h,
        _ => return false,
    };
    if secret.is_empty() {
        return false;
    }

    let received = match BASE64.decode(header) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(payload);
    mac.verify_slice(&received).is_ok()
}

/// Compute the base64 HMAC-SHA256 digest the provider would send for a body.
///
/// Used when registering test deliveries and by the integration tests to
/// produce valid `tally-signature` headers.
pub fn sign_payload(payload: &[u8], secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload);
    BASE64.encode(mac.finalize().into_bytes())
}
