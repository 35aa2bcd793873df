//! Authentication: platform access tokens and form session tokens.

pub mod jwt;
pub mod session_token;
