//! Form session token codec.
//!
//! When an applicant opens a job application, the server mints a short-lived
//! HS256 JWT binding the applicant's identity to a one-time nonce and the
//! job/form pair. The token rides inside the form as a hidden field and
//! comes back with the webhook delivery, where it is the only proof of who
//! actually filled the form in.
//!
//! Signed with `SESSION_TOKEN_SECRET`, which is deliberately distinct from
//! both the platform JWT secret and the per-webhook signing secrets: a leak
//! of one must not compromise the others.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use gradlink_core::roles::ApplicantRole;
use gradlink_core::types::DbId;

/// Claims carried by a form session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The applicant's internal database id.
    pub sub: DbId,
    /// Which profile store the applicant lives in.
    pub role: ApplicantRole,
    /// Email snapshot at issuance time.
    pub email: String,
    /// The job being applied to.
    pub job_id: DbId,
    /// The form the session was issued for.
    pub form_id: DbId,
    /// One-time nonce; consumed when the delivery is processed.
    pub nonce: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Why a session token was rejected.
///
/// The pipeline treats all three identically (reject the delivery), but
/// each is logged under its own reason.
#[derive(Debug, thiserror::Error)]
pub enum SessionTokenError {
    #[error("Session token expired")]
    Expired,

    #[error("Session token signature invalid")]
    InvalidSignature,

    #[error("Session token malformed: {0}")]
    Malformed(String),
}

/// Issue a signed session token for an application session.
pub fn issue(
    applicant_id: DbId,
    role: ApplicantRole,
    email: &str,
    job_id: DbId,
    form_id: DbId,
    nonce: &str,
    ttl_hours: i64,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = SessionClaims {
        sub: applicant_id,
        role,
        email: email.to_string(),
        job_id,
        form_id,
        nonce: nonce.to_string(),
        iat: now,
        exp: now + ttl_hours * 3600,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate and decode a session token.
///
/// No expiry leeway: the nonce TTL is the authoritative window and the
/// token must not outlive it.
pub fn decode_token(token: &str, secret: &str) -> Result<SessionClaims, SessionTokenError> {
    let mut validation = Validation::default(); // HS256
    validation.leeway = 0;

    match decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => Ok(data.claims),
        Err(err) => Err(match err.kind() {
            ErrorKind::ExpiredSignature => SessionTokenError::Expired,
            ErrorKind::InvalidSignature => SessionTokenError::InvalidSignature,
            other => SessionTokenError::Malformed(format!("{other:?}")),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SECRET: &str = "session-token-secret-for-tests";

    fn issue_test_token(nonce: &str, ttl_hours: i64) -> String {
        issue(
            7,
            ApplicantRole::Member,
            "m1@example.edu",
            3,
            5,
            nonce,
            ttl_hours,
            SECRET,
        )
        .expect("issuing should succeed")
    }

    #[test]
    fn round_trip_recovers_claims() {
        let token = issue_test_token("nonce-123", 24);
        let claims = decode_token(&token, SECRET).expect("decoding should succeed");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, ApplicantRole::Member);
        assert_eq!(claims.email, "m1@example.edu");
        assert_eq!(claims.job_id, 3);
        assert_eq!(claims.form_id, 5);
        assert_eq!(claims.nonce, "nonce-123");
    }

    #[test]
    fn expired_token_is_rejected() {
        // Negative TTL puts exp in the past; zero leeway makes it fail now.
        let token = issue_test_token("nonce-old", -1);
        assert_matches!(
            decode_token(&token, SECRET),
            Err(SessionTokenError::Expired)
        );
    }

    #[test]
    fn wrong_key_is_rejected() {
        let token = issue_test_token("nonce-123", 24);
        assert_matches!(
            decode_token(&token, "a-different-secret"),
            Err(SessionTokenError::InvalidSignature)
        );
    }

    #[test]
    fn missing_claims_are_rejected() {
        // A structurally valid JWT signed with the right key but lacking the
        // session claims (e.g. a platform access token) must not decode.
        #[derive(Serialize)]
        struct Partial {
            sub: i64,
            exp: i64,
        }
        let partial = Partial {
            sub: 1,
            exp: Utc::now().timestamp() + 600,
        };
        let token = encode(
            &Header::default(),
            &partial,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encoding should succeed");

        assert_matches!(
            decode_token(&token, SECRET),
            Err(SessionTokenError::Malformed(_))
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode_token("not-a-jwt", SECRET).is_err());
        assert!(decode_token("", SECRET).is_err());
    }
}
