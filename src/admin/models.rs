use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::auth::Role;

/// Dashboard counters for the admin home page
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminStats {
    pub total_products: i64,
    pub total_orders: i64,
    pub completed_orders: i64,
    pub pending_orders: i64,
    /// Sum of completed order amounts, smallest currency unit
    pub total_revenue: i64,
}

/// Request DTO for creating a user through the back-office
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Request DTO for changing a user's role
#[derive(Debug, Deserialize)]
pub struct ChangeRole {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_accepts_six_char_password() {
        let req: CreateUser = serde_json::from_str(
            r#"{"email": "staff@example.com", "password": "secret"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.role, Role::User);
    }

    #[test]
    fn test_create_user_rejects_short_password() {
        let req: CreateUser = serde_json::from_str(
            r#"{"email": "staff@example.com", "password": "short"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }
}
