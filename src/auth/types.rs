//! Authentication request and response payloads.

use serde::{Deserialize, Serialize};

use crate::credentials::CredentialPair;

/// Body of `POST /auth/refresh-token`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Portal-specific role check (e.g. `ROLE_ADMIN`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_role: Option<String>,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Authenticated user profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub email_verified: bool,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }
}

/// Payload returned by login, register and refresh.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub user: Option<User>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl AuthResponse {
    pub fn credentials(&self) -> CredentialPair {
        CredentialPair::new(&self.access_token, &self.refresh_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_response_wire_format() {
        let auth: AuthResponse = serde_json::from_value(json!({
            "accessToken": "T1",
            "refreshToken": "R1",
            "user": {
                "id": "8d4c",
                "email": "admin@ecommerce.com",
                "fullName": "Admin",
                "roles": ["ROLE_ADMIN", "ROLE_STAFF"],
                "emailVerified": true
            }
        }))
        .unwrap();

        assert_eq!(auth.token_type, "Bearer");
        assert_eq!(auth.credentials(), CredentialPair::new("T1", "R1"));
        let user = auth.user.unwrap();
        assert!(user.has_role("ROLE_ADMIN"));
        assert!(user.has_any_role(&["ROLE_SELLER", "ROLE_STAFF"]));
        assert!(!user.has_any_role(&["ROLE_CUSTOMER"]));
    }

    #[test]
    fn test_login_request_omits_missing_role() {
        let req = LoginRequest {
            email: "a@b.c".into(),
            password: "pw".into(),
            expected_role: None,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "email": "a@b.c", "password": "pw" })
        );
    }
}
