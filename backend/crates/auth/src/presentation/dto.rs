//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::principal::Principal;
use crate::domain::entity::user::User;

// ============================================================================
// Create User
// ============================================================================

/// Create user request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
}

// ============================================================================
// User
// ============================================================================

/// Public view of an account; never carries the password hash
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.to_string(),
            email: user.email.to_string(),
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/session response
///
/// Unlike `/auth/me`, an anonymous caller gets a 200 with
/// `authenticated: false` instead of a 401.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

impl From<&Principal> for UserResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.user_id.to_string(),
            username: principal.username.to_string(),
            email: principal.email.to_string(),
            created_at: principal.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_camel_case() {
        let json = r#"{"email":"fakeUser@gmail.com","password":"fakeUserPwd"}"#;
        let req: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.email, "fakeUser@gmail.com");
        assert_eq!(req.password, "fakeUserPwd");
    }

    #[test]
    fn test_user_response_serialization() {
        let response = UserResponse {
            id: "00000000-0000-0000-0000-000000000001".to_string(),
            username: "fakeUser".to_string(),
            email: "fakeuser@gmail.com".to_string(),
            created_at: chrono::Utc::now(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("password"));
    }
}
