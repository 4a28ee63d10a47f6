// Access token validation for the identity provider's HS256 JWTs

use crate::auth::error::AuthError;
use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's UUID
    pub sub: Uuid,
    pub email: String,
    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,
}

/// Validates access tokens against the shared signing secret
#[derive(Clone)]
pub struct TokenService {
    secret: String,
}

impl TokenService {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Validate an access token and return its claims
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    fn issue_token(sub: Uuid, email: &str, exp: i64) -> String {
        let claims = Claims {
            sub,
            email: email.to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_is_accepted() {
        let service = TokenService::new(SECRET.to_string());
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, "shopper@example.com", Utc::now().timestamp() + 900);

        let claims = service.validate_access_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "shopper@example.com");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = TokenService::new(SECRET.to_string());
        let token = issue_token(Uuid::new_v4(), "shopper@example.com", Utc::now().timestamp() - 120);

        let result = service.validate_access_token(&token);
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let service = TokenService::new("a_completely_different_secret".to_string());
        let token = issue_token(Uuid::new_v4(), "shopper@example.com", Utc::now().timestamp() + 900);

        let result = service.validate_access_token(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = TokenService::new(SECRET.to_string());
        let result = service.validate_access_token("not.a.jwt");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
