// Authenticated-caller extractor for protected routes

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;
use uuid::Uuid;

use crate::auth::{error::AuthError, models::Role, repository::RolesRepository};

/// Cookie set by the identity provider's session flow
const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// The resolved caller of a request: identity plus role
///
/// Extracting this in a handler both authenticates the request and makes the
/// caller's role available for `require_role` checks. Handlers never parse
/// cookies or tokens themselves.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    /// Fail with 403 unless the caller's role is in the allowed set
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AuthError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden(format!(
                "Role {} is not allowed to access this resource",
                self.role
            )))
        }
    }
}

#[async_trait]
impl FromRequestParts<crate::AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &crate::AppState,
    ) -> Result<Self, Self::Rejection> {
        // Prefer the session cookie, fall back to a bearer header
        let jar = CookieJar::from_headers(&parts.headers);
        let token = match jar.get(ACCESS_TOKEN_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => parts
                .headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .ok_or(AuthError::MissingToken)?
                .to_string(),
        };

        let claims = state.tokens.validate_access_token(&token)?;

        let roles_repo = RolesRepository::new(state.db.clone());
        let role = roles_repo.find_role(claims.sub).await?;

        debug!(
            "Resolved caller: user_id={}, role={}",
            claims.sub, role
        );

        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "caller@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_role_allows_listed_role() {
        assert!(caller(Role::Admin)
            .require_role(&[Role::Admin, Role::Superadmin])
            .is_ok());
        assert!(caller(Role::Superadmin)
            .require_role(&[Role::Superadmin])
            .is_ok());
    }

    #[test]
    fn test_require_role_rejects_unlisted_role() {
        let result = caller(Role::User).require_role(&[Role::Admin, Role::Superadmin]);
        assert!(matches!(result, Err(AuthError::Forbidden(_))));
    }
}
