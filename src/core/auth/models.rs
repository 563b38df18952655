//! Wire types shared by the auth client, the session store and the flows.

use serde::{Deserialize, Serialize};

/// User record as returned by the API and persisted under the `user` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Staff role selectable on sign-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[display("ADMIN")]
    Admin,
    #[display("PROFESSIONAL")]
    Professional,
    #[display("RECEPTIONIST")]
    Receptionist,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Professional, Role::Receptionist];

    /// Parse the wire name (`ADMIN`, `PROFESSIONAL`, `RECEPTIONIST`)
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.to_string() == value)
    }
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCredentials {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub clinic_id: String,
}

/// Session triple carried by a successful auth response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

/// Envelope returned by login and register
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    /// Absent on some unsuccessful responses
    #[serde(default)]
    pub data: Option<Session>,
}

/// Token pair issued by `POST /auth/refresh`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// Envelope returned by refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<TokenPair>,
}

/// Envelope returned by logout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Body of logout and refresh requests
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Error body the API sends with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_uses_camel_case_timestamps() {
        let user: User = serde_json::from_value(json!({
            "id": "1",
            "email": "a@b.com",
            "name": "Ana",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(user.created_at, "2024-01-01T00:00:00Z");
        assert_eq!(user.updated_at, "2024-01-02T00:00:00Z");

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), json!("ADMIN"));
        assert_eq!(
            serde_json::to_value(Role::Receptionist).unwrap(),
            json!("RECEPTIONIST")
        );
        assert_eq!(Role::Professional.to_string(), "PROFESSIONAL");
        assert_eq!(Role::parse("PROFESSIONAL"), Some(Role::Professional));
        assert_eq!(Role::parse("professional"), None);
        assert_eq!(Role::parse("OWNER"), None);
    }

    #[test]
    fn test_register_credentials_serialization() {
        let credentials = RegisterCredentials {
            name: "Ana".to_string(),
            email: "ana@clinic.com".to_string(),
            password: "secret1".to_string(),
            role: Role::Receptionist,
            clinic_id: "c-1".to_string(),
        };

        let value = serde_json::to_value(&credentials).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Ana",
                "email": "ana@clinic.com",
                "password": "secret1",
                "role": "RECEPTIONIST",
                "clinicId": "c-1"
            })
        );
    }

    #[test]
    fn test_auth_response_deserialization() {
        let response: AuthResponse = serde_json::from_value(json!({
            "success": true,
            "message": "ok",
            "data": {
                "user": {"id": "1", "email": "a@b.com", "name": "A", "createdAt": "", "updatedAt": ""},
                "token": "T1",
                "refreshToken": "R1"
            }
        }))
        .unwrap();

        let session = response.data.unwrap();
        assert_eq!(session.token, "T1");
        assert_eq!(session.refresh_token, "R1");
        assert_eq!(session.user.id, "1");
    }

    #[test]
    fn test_unsuccessful_response_without_data() {
        let response: AuthResponse =
            serde_json::from_value(json!({"success": false, "message": "nope"})).unwrap();

        assert!(!response.success);
        assert!(response.data.is_none());
    }

    #[test]
    fn test_refresh_request_serialization() {
        let request = RefreshRequest {
            refresh_token: "R1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"refreshToken": "R1"})
        );
    }
}
