//! Applicant role handling.
//!
//! Applicants come from two separate profile stores (members and alumni).
//! The role travels inside session tokens and submission rows as a plain
//! string, but everything past the parse boundary works with the closed
//! [`ApplicantRole`] enum so an unknown role is a typed rejection instead
//! of a silent fall-through.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Platform role names used by the job-owner side of the API.
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SPONSOR: &str = "sponsor";

/// The closed set of roles allowed to submit applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantRole {
    Member,
    Alumni,
}

impl ApplicantRole {
    /// The canonical string form stored in the database and token claims.
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicantRole::Member => "member",
            ApplicantRole::Alumni => "alumni",
        }
    }

    /// Parse a role string, rejecting anything outside the closed set.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "member" => Ok(ApplicantRole::Member),
            "alumni" => Ok(ApplicantRole::Alumni),
            other => Err(CoreError::Validation(format!(
                "Unknown applicant role: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for ApplicantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_roles() {
        assert_eq!(ApplicantRole::parse("member").unwrap(), ApplicantRole::Member);
        assert_eq!(ApplicantRole::parse("alumni").unwrap(), ApplicantRole::Alumni);
    }

    #[test]
    fn parse_rejects_unknown_roles() {
        for bad in ["sponsor", "admin", "Member", "", "alum"] {
            assert!(ApplicantRole::parse(bad).is_err(), "{bad:?} must be rejected");
        }
    }

    #[test]
    fn round_trips_through_string_form() {
        for role in [ApplicantRole::Member, ApplicantRole::Alumni] {
            assert_eq!(ApplicantRole::parse(role.as_str()).unwrap(), role);
        }
    }
}
