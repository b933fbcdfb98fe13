use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use crate::error::AppError;

/// The two request roles. A closed set: a route can only demand a role that
/// actually exists, so there is no runtime "unknown role" branch to
/// misconfigure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Admin,
}

/// Process-wide shared secrets, one per role, loaded from the environment at
/// startup. This is coarse role gating, not per-identity auth.
#[derive(Clone)]
pub struct RoleTokens {
    pub customer: String,
    pub admin: String,
}

impl RoleTokens {
    fn secret(&self, role: Role) -> &str {
        match role {
            Role::Customer => &self.customer,
            Role::Admin => &self.admin,
        }
    }
}

/// The Authorization header must equal, byte for byte, the secret configured
/// for `role`. A missing or mismatched token short-circuits with 401 before
/// the handler body runs.
pub fn authorize(tokens: &RoleTokens, role: Role, headers: &HeaderMap) -> Result<(), AppError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    if token != tokens.secret(role) {
        return Err(AppError::Unauthorized);
    }

    Ok(())
}
