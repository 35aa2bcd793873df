//! JWT-based authentication extractor and ownership guard.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use gradlink_core::error::CoreError;
use gradlink_core::roles::ROLE_ADMIN;
use gradlink_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication. The webhook ingestion endpoint deliberately does not use
/// it; its caller is the form provider, authenticated by payload signature.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name (e.g. `"member"`, `"alumni"`, `"sponsor"`, `"admin"`).
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

/// Require that the current user owns the resource or is an admin.
///
/// Called explicitly at the top of each owner-scoped handler with the
/// resource's owner id, rather than wrapping handlers in interception
/// machinery, so the ownership contract is visible at the call site.
pub fn ensure_owner_or_admin(owner_id: DbId, auth: &AuthUser) -> Result<(), AppError> {
    if auth.role == ROLE_ADMIN || auth.user_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "You do not own this resource".into(),
        )))
    }
}
